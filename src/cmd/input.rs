//! Where command lines and field values come from.
//!
//! The session keeps a stack of [`LineSource`]s: the console at the bottom and
//! one [`ScriptInput`] per running `execute_script`. Commands and the field
//! prompts they trigger both read from the top of the stack, so a script
//! supplies the field values of an `add` on the lines that follow it.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use super::ui::Output;

pub trait LineSource {
    /// Next line without its terminator, or `None` at end of input.
    ///
    /// `prompt` is the field label when a field value is requested, `None`
    /// when a command is read.
    fn next_line(&mut self, prompt: Option<&str>, output: &Output) -> Result<Option<String>>;

    /// Whether a person is typing, so a rejected field can be asked again.
    fn is_interactive(&self) -> bool;

    /// The script file this source reads, if any.
    fn script(&self) -> Option<&Path> {
        None
    }

    /// Number of the line last returned, starting at 1.
    fn line_number(&self) -> usize;
}

/// Pick the console source for stdin: dialoguer prompts on a terminal, plain
/// line reads when stdin is piped.
pub fn console() -> Box<dyn LineSource> {
    if atty::is(atty::Stream::Stdin) {
        Box::new(TerminalInput::default())
    } else {
        Box::new(ReaderInput::new(io::stdin().lock(), false))
    }
}

/// Lines from any reader. Backs piped stdin and tests.
pub struct ReaderInput<R> {
    reader: R,
    interactive: bool,
    line: usize,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R, interactive: bool) -> Self {
        Self {
            reader,
            interactive,
            line: 0,
        }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn next_line(&mut self, prompt: Option<&str>, output: &Output) -> Result<Option<String>> {
        if let Some(label) = prompt {
            output.prompt(label);
        }
        let line = read_line(&mut self.reader)?;
        if line.is_some() {
            self.line += 1;
        }
        Ok(line)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

/// A person at a terminal.
#[derive(Default)]
pub struct TerminalInput {
    line: usize,
}

impl LineSource for TerminalInput {
    fn next_line(&mut self, prompt: Option<&str>, _output: &Output) -> Result<Option<String>> {
        let line = match prompt {
            Some(label) => Some(
                dialoguer::Input::<String>::new()
                    .with_prompt(format!("  {}", label))
                    .allow_empty(true)
                    .interact_text()
                    .with_context(|| format!("Failed to read {}", label))?,
            ),
            None => read_line(&mut io::stdin().lock())?,
        };
        if line.is_some() {
            self.line += 1;
        }
        Ok(line)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

/// The lines of a script file, read up front.
pub struct ScriptInput {
    path: PathBuf,
    lines: Vec<String>,
    next: usize,
}

impl ScriptInput {
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Ok(Self::from_text(path, &content))
    }

    pub fn from_text(path: &Path, content: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: content
                .lines()
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect(),
            next: 0,
        }
    }
}

impl LineSource for ScriptInput {
    fn next_line(&mut self, _prompt: Option<&str>, _output: &Output) -> Result<Option<String>> {
        let line = self.lines.get(self.next).cloned();
        if line.is_some() {
            self.next += 1;
        }
        Ok(line)
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn script(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn line_number(&self) -> usize {
        self.next
    }
}

fn read_line(reader: &mut dyn BufRead) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = reader.read_line(&mut buf).context("Failed to read input")?;
    if n == 0 {
        return Ok(None);
    }
    let trimmed = buf.trim_end_matches(['\n', '\r']).len();
    buf.truncate(trimmed);
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ui::OutputMode;
    use std::io::Cursor;

    fn quiet() -> Output {
        Output::with_writer(OutputMode::Quiet, Box::new(io::sink()))
    }

    #[test]
    fn test_reader_input_strips_terminators() {
        let mut input = ReaderInput::new(Cursor::new("add\r\n\nshow"), true);
        let out = quiet();
        assert_eq!(input.next_line(None, &out).unwrap().as_deref(), Some("add"));
        assert_eq!(input.next_line(None, &out).unwrap().as_deref(), Some(""));
        assert_eq!(input.next_line(None, &out).unwrap().as_deref(), Some("show"));
        assert_eq!(input.line_number(), 3);
        assert!(input.next_line(None, &out).unwrap().is_none());
        assert_eq!(input.line_number(), 3);
    }

    #[test]
    fn test_script_input_tracks_lines() {
        let path = Path::new("fill.txt");
        let mut input = ScriptInput::from_text(path, "add\nBolt\n");
        let out = quiet();
        assert!(!input.is_interactive());
        assert_eq!(input.script(), Some(path));
        assert_eq!(input.next_line(None, &out).unwrap().as_deref(), Some("add"));
        assert_eq!(
            input.next_line(Some("Name (String)"), &out).unwrap().as_deref(),
            Some("Bolt")
        );
        assert_eq!(input.line_number(), 2);
        assert!(input.next_line(None, &out).unwrap().is_none());
    }

    #[test]
    fn test_script_open_missing_file() {
        let err = ScriptInput::open(Path::new("/nonexistent/script.txt"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to read script"));
    }
}
