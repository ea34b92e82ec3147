//! A running command loop and everything it owns.

use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use super::dispatch::Execute;
use super::input::{LineSource, ScriptInput};
use super::prompts::Prompter;
use super::ui::Output;
use super::Command;
use crate::collection::ProductCollection;
use crate::config::Config;
use crate::history::History;
use crate::model::{Organization, Product};
use crate::store::Store;
use crate::validator::{Excluding, KeySet, NoKeys};

pub struct Session {
    pub(super) collection: ProductCollection,
    pub(super) store: Box<dyn Store>,
    pub(super) history: History,
    pub(super) output: Output,
    config: Config,
    inputs: Vec<Box<dyn LineSource>>,
    running: bool,
}

impl Session {
    pub fn new(
        collection: ProductCollection,
        store: Box<dyn Store>,
        config: Config,
        output: Output,
    ) -> Self {
        Self {
            collection,
            store,
            history: History::new(config.history.size),
            output,
            config,
            inputs: Vec::new(),
            running: true,
        }
    }

    pub fn collection(&self) -> &ProductCollection {
        &self.collection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(super) fn stop(&mut self) {
        self.running = false;
    }

    /// Read and execute commands from `console` until `exit` or end of input.
    ///
    /// Failed commands are reported and the loop continues.
    pub fn run(&mut self, console: Box<dyn LineSource>) -> Result<()> {
        self.inputs.push(console);
        let result = self.command_loop();
        self.inputs.pop();
        result
    }

    fn command_loop(&mut self) -> Result<()> {
        while self.running {
            let Some(line) = self.next_line(None)? else {
                break;
            };
            if let Err(err) = self.execute_line(&line) {
                self.output.error(&format!("{:#}", err));
            }
        }
        Ok(())
    }

    /// Parse and execute one line. Successful commands enter the history.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        let Some(command) = Command::parse(line)? else {
            return Ok(());
        };
        let name = command.name();
        debug!(command = name, "executing");
        command.execute(self)?;
        self.history.record(name);
        Ok(())
    }

    /// Run every line of a script. The first failing line aborts the script.
    ///
    /// A script may run other scripts, up to `scripts.max_depth` deep, but
    /// never one that is already running.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to open script {}", path.display()))?;

        let active: Vec<&Path> = self.inputs.iter().filter_map(|i| i.script()).collect();
        if active.iter().any(|p| *p == path) {
            bail!(
                "Script {} is already running; recursive scripts are not allowed",
                path.display()
            );
        }
        if active.len() >= self.config.scripts.max_depth {
            bail!(
                "Scripts nested deeper than {} levels",
                self.config.scripts.max_depth
            );
        }

        let script = ScriptInput::open(&path)?;
        info!(script = %path.display(), depth = active.len() + 1, "running script");
        self.inputs.push(Box::new(script));
        let result = self.script_loop(&path);
        self.inputs.pop();
        info!(script = %path.display(), ok = result.is_ok(), "script finished");
        result
    }

    fn script_loop(&mut self, path: &Path) -> Result<()> {
        while self.running {
            let Some(line) = self.next_line(None)? else {
                break;
            };
            let number = self.current_line_number();
            self.execute_line(&line)
                .with_context(|| format!("{}:{}: '{}' failed", path.display(), number, line))?;
        }
        Ok(())
    }

    fn next_line(&mut self, prompt: Option<&str>) -> Result<Option<String>> {
        let input = self
            .inputs
            .last_mut()
            .ok_or_else(|| anyhow!("No input source"))?;
        input.next_line(prompt, &self.output)
    }

    fn current_line_number(&self) -> usize {
        self.inputs.last().map_or(0, |i| i.line_number())
    }

    /// Ask for a product on the current input.
    ///
    /// With `seed` the product keeps the seed's id and creation date and may
    /// keep its part number. With `unique` false the part number is not
    /// checked against the collection at all.
    pub(super) fn prompt_product(&mut self, seed: Option<&Product>, unique: bool) -> Result<Product> {
        let Session {
            inputs,
            output,
            collection,
            ..
        } = self;
        let input = inputs
            .last_mut()
            .ok_or_else(|| anyhow!("No input source"))?;

        let own = seed.and_then(Product::part_number).map(str::to_string);
        let excluding = Excluding::new(collection.used_part_numbers(), own.as_ref());
        let part_numbers: &dyn KeySet<String> = if unique { &excluding } else { &NoKeys };

        Prompter::new(input.as_mut(), output).product(seed, part_numbers)
    }

    pub(super) fn prompt_organization(&mut self) -> Result<Organization> {
        let Session { inputs, output, .. } = self;
        let input = inputs
            .last_mut()
            .ok_or_else(|| anyhow!("No input source"))?;
        Prompter::new(input.as_mut(), output)
            .organization("Manufacturer", false)?
            .ok_or_else(|| anyhow!("A reference manufacturer is required"))
    }
}
