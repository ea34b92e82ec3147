//! CLI entry point for stockroom.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io;

use stockroom::cli::{Cli, Commands};
use stockroom::cmd::input;
use stockroom::cmd::session::Session;
use stockroom::cmd::ui::{Output, OutputMode};
use stockroom::codec;
use stockroom::config::Config;
use stockroom::logging;
use stockroom::store::FileStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "stockroom", &mut io::stdout());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    if let Some(file) = cli.file {
        config.store.path = file;
    }
    let store_path = shellexpand::tilde(&config.store.path.to_string_lossy()).into_owned();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        config.output.format.into()
    };
    let output = Output::new(mode);

    let store = FileStore::new(store_path);
    let loaded = codec::load(&store, config.store.skip_invalid)?;
    for skipped in &loaded.skipped {
        output.warn(&format!("Skipped {}", skipped));
    }

    let mut session = Session::new(loaded.collection, Box::new(store), config, output);

    if let Some(script) = cli.script {
        let result = session.run_script(&script);
        if cli.batch {
            return result;
        }
        if let Err(e) = result {
            session.output().error(&format!("{:#}", e));
        }
        if !session.is_running() {
            return Ok(());
        }
    }

    session.run(input::console())
}
