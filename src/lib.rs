//! # Stockroom
//!
//! An interactive, script-drivable manager for a collection of products kept
//! in a JSON file.
//!
//! ## Modules
//!
//! - [`validator`] - composable validation chains
//! - [`model`] - `Coordinates`, `Organization`, `Product` and their builders
//! - [`identity`] - deterministic fallback ids
//! - [`collection`] - the price-ordered collection and its key indices
//! - [`codec`] - JSON interchange format, load and save
//! - [`store`] - byte storage backends
//! - [`cmd`] - command parsing, prompting and the command loop
//! - [`config`], [`history`], [`logging`] - the supporting cast
//!
//! ## Example
//!
//! ```
//! use stockroom::collection::ProductCollection;
//! use stockroom::model::{CoordinatesBuilder, ProductBuilder};
//!
//! let mut coordinates = CoordinatesBuilder::new();
//! coordinates.set_y(Some("3")).unwrap();
//!
//! let mut builder = ProductBuilder::new();
//! builder.set_name(Some("Bolt")).unwrap();
//! builder.set_coordinates(Some(coordinates.build().unwrap())).unwrap();
//! builder.set_manufacture_cost(Some("0.5")).unwrap();
//! builder.set_price(Some("2.5")).unwrap();
//!
//! let mut collection = ProductCollection::new();
//! collection.add(builder.build().unwrap()).unwrap();
//! assert_eq!(collection.min().unwrap().name(), "Bolt");
//! ```

pub mod cli;
pub mod cmd;
pub mod codec;
pub mod collection;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod logging;
pub mod model;
pub mod store;
pub mod validator;
