//! Structured output for stockroom commands.
//!
//! Three modes:
//! - Human: plain text, colored prefixes on a terminal
//! - Json: one JSON event per line
//! - Quiet: command results and errors only, no prompts or confirmations
//!
//! The writer can be swapped out so tests can capture everything a session
//! prints.

use colored::{Color, Colorize};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::config::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Quiet => OutputMode::Quiet,
        }
    }
}

#[derive(Clone)]
pub struct Output {
    mode: OutputMode,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    is_tty: bool,
}

impl Output {
    /// Output on stdout.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            writer: Arc::new(Mutex::new(Box::new(io::stdout()))),
            is_tty: atty::is(atty::Stream::Stdout),
        }
    }

    /// Output on a custom writer (tests). Never colored.
    pub fn with_writer(mode: OutputMode, writer: Box<dyn Write + Send>) -> Self {
        Self {
            mode,
            writer: Arc::new(Mutex::new(writer)),
            is_tty: false,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// The text a command produced. Shown in every mode.
    pub fn result(&self, text: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Quiet => self.write_line(text),
            OutputMode::Json => self.write_json("result", text),
        }
    }

    /// A structured record. Human modes get `text`, Json gets `value`.
    pub fn record(&self, text: &str, value: Value) {
        match self.mode {
            OutputMode::Human | OutputMode::Quiet => self.write_line(text),
            OutputMode::Json => self.json(&json!({ "level": "record", "data": value })),
        }
    }

    /// "✓ {msg}" in green.
    pub fn success(&self, msg: &str) {
        self.prefixed("✓", Color::Green, "success", msg);
    }

    /// "⚠ {msg}" in yellow.
    pub fn warn(&self, msg: &str) {
        self.prefixed("⚠", Color::Yellow, "warning", msg);
    }

    /// "✗ {msg}" in red. Errors are shown even in quiet mode.
    pub fn error(&self, msg: &str) {
        match self.mode {
            OutputMode::Human => {
                let prefix = self.paint("✗", Color::Red);
                self.write_line(&format!("{} {}", prefix, msg));
            }
            OutputMode::Json => self.write_json("error", msg),
            OutputMode::Quiet => self.write_line(&format!("✗ {}", msg)),
        }
    }

    /// Field prompt without a trailing newline. Only shown to humans.
    pub fn prompt(&self, label: &str) {
        if self.mode != OutputMode::Human {
            return;
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = write!(writer, "  {}: ", label);
            let _ = writer.flush();
        }
    }

    pub fn json(&self, value: &Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
        }
    }

    fn prefixed(&self, prefix: &str, color: Color, level: &str, msg: &str) {
        match self.mode {
            OutputMode::Human => {
                let prefix = self.paint(prefix, color);
                self.write_line(&format!("{} {}", prefix, msg));
            }
            OutputMode::Json => self.write_json(level, msg),
            OutputMode::Quiet => {}
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.is_tty {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }

    fn write_json(&self, level: &str, msg: &str) {
        self.json(&json!({
            "level": level,
            "msg": msg,
        }));
    }
}
