//! CLI argument definitions for stockroom.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version)]
#[command(about = "Manage a JSON-backed product collection", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(
    after_help = "Without arguments stockroom reads commands from stdin. Type 'help' for the command list.\n\nThe collection file is taken from --file, then STOCKROOM_FILE, then store.path in .stockroom/config.md."
)]
pub struct Cli {
    /// Collection file to load and save
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file to use instead of the global and project ones
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print command results and errors
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print one JSON event per line
    #[arg(long)]
    pub json: bool,

    /// Exit after running SCRIPT instead of continuing interactively
    #[arg(long, requires = "script")]
    pub batch: bool,

    /// Script to run before reading commands
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_script() {
        let cli = Cli::try_parse_from([
            "stockroom",
            "--file",
            "data.json",
            "--quiet",
            "--batch",
            "fill.txt",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("data.json")));
        assert!(cli.quiet);
        assert!(cli.batch);
        assert_eq!(cli.script, Some(PathBuf::from("fill.txt")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_batch_requires_script() {
        assert!(Cli::try_parse_from(["stockroom", "--batch"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_json() {
        assert!(Cli::try_parse_from(["stockroom", "--quiet", "--json"]).is_err());
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = Cli::try_parse_from(["stockroom", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }
}
