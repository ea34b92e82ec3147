//! Terminal output for the command layer.

pub mod output;

pub use output::{Output, OutputMode};
