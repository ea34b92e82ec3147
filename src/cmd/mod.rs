//! The line-oriented command layer.
//!
//! A line is a command name followed by its arguments, separated by
//! whitespace. [`Command::parse`] turns a line into a [`Command`],
//! [`dispatch::Execute`] runs it against a [`session::Session`].

use std::path::PathBuf;

use crate::error::{StockError, StockResult};

pub mod dispatch;
pub mod input;
pub mod prompts;
pub mod session;
pub mod ui;

/// Every command with its argument synopsis and a one-line description, in
/// the order `help` lists them.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("help", "", "show the available commands"),
    ("info", "", "show the collection type, initialization date and size"),
    ("show", "", "print every product"),
    ("add", "{element}", "add a new product"),
    (
        "update_id",
        "id {element}",
        "replace the product with the given id, keeping its id and creation date",
    ),
    ("remove_by_id", "id", "remove the product with the given id"),
    ("clear", "", "remove every product"),
    ("save", "", "write the collection to the store file"),
    (
        "execute_script",
        "file_name",
        "run the commands in a file; field values follow the command line",
    ),
    ("exit", "", "quit without saving"),
    (
        "add_if_min",
        "{element}",
        "add a product if its price is lower than the current minimum",
    ),
    (
        "remove_lower",
        "{element}",
        "remove every product priced lower than the given one",
    ),
    ("history", "", "show the last distinct commands (without arguments)"),
    (
        "count_less_than_manufacturer",
        "{manufacturer}",
        "count products whose manufacturer is absent or has a lower annual turnover",
    ),
    ("print_ascending", "", "print every product, cheapest first"),
    (
        "print_field_descending_manufacturer",
        "",
        "print every manufacturer, highest annual turnover first",
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Info,
    Show,
    Add,
    UpdateId(i64),
    RemoveById(i64),
    Clear,
    Save,
    ExecuteScript(PathBuf),
    Exit,
    AddIfMin,
    RemoveLower,
    History,
    CountLessThanManufacturer,
    PrintAscending,
    PrintFieldDescendingManufacturer,
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> StockResult<Option<Command>> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let command = match name {
            "help" => Command::Help,
            "info" => Command::Info,
            "show" => Command::Show,
            "add" => Command::Add,
            "update_id" => Command::UpdateId(id_argument("update_id", rest)?),
            "remove_by_id" => Command::RemoveById(id_argument("remove_by_id", rest)?),
            "clear" => Command::Clear,
            "save" => Command::Save,
            "execute_script" => {
                if rest.is_empty() {
                    return Err(StockError::usage(
                        "execute_script",
                        "expected a script file name",
                    ));
                }
                let expanded = shellexpand::tilde(rest);
                Command::ExecuteScript(PathBuf::from(expanded.as_ref()))
            }
            "exit" => Command::Exit,
            "add_if_min" => Command::AddIfMin,
            "remove_lower" => Command::RemoveLower,
            "history" => Command::History,
            "count_less_than_manufacturer" => Command::CountLessThanManufacturer,
            "print_ascending" => Command::PrintAscending,
            "print_field_descending_manufacturer" => Command::PrintFieldDescendingManufacturer,
            other => return Err(StockError::UnknownCommand(other.to_string())),
        };

        if command.takes_no_arguments() && !rest.is_empty() {
            return Err(StockError::usage(
                command.name(),
                format!("takes no arguments, got '{}'", rest),
            ));
        }
        Ok(Some(command))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Info => "info",
            Command::Show => "show",
            Command::Add => "add",
            Command::UpdateId(_) => "update_id",
            Command::RemoveById(_) => "remove_by_id",
            Command::Clear => "clear",
            Command::Save => "save",
            Command::ExecuteScript(_) => "execute_script",
            Command::Exit => "exit",
            Command::AddIfMin => "add_if_min",
            Command::RemoveLower => "remove_lower",
            Command::History => "history",
            Command::CountLessThanManufacturer => "count_less_than_manufacturer",
            Command::PrintAscending => "print_ascending",
            Command::PrintFieldDescendingManufacturer => "print_field_descending_manufacturer",
        }
    }

    fn takes_no_arguments(&self) -> bool {
        !matches!(
            self,
            Command::UpdateId(_) | Command::RemoveById(_) | Command::ExecuteScript(_)
        )
    }
}

fn id_argument(command: &'static str, rest: &str) -> StockResult<i64> {
    let mut args = rest.split_whitespace();
    let raw = args
        .next()
        .ok_or_else(|| StockError::usage(command, "expected an id argument"))?;
    if args.next().is_some() {
        return Err(StockError::usage(command, "expected exactly one id argument"));
    }
    raw.parse::<i64>()
        .map_err(|_| StockError::input("id", "Id must be an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("  info  "), Command::Info);
        assert_eq!(
            parse("print_field_descending_manufacturer"),
            Command::PrintFieldDescendingManufacturer
        );
    }

    #[test]
    fn test_blank_line_is_nothing() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t").unwrap(), None);
    }

    #[test]
    fn test_parse_id_arguments() {
        assert_eq!(parse("update_id 42"), Command::UpdateId(42));
        assert_eq!(parse("remove_by_id   7"), Command::RemoveById(7));
    }

    #[test]
    fn test_id_argument_errors() {
        assert!(matches!(
            Command::parse("remove_by_id"),
            Err(StockError::Usage { command: "remove_by_id", .. })
        ));
        assert!(matches!(
            Command::parse("update_id abc"),
            Err(StockError::Input { field: "id", .. })
        ));
        assert!(matches!(
            Command::parse("update_id 1 2"),
            Err(StockError::Usage { .. })
        ));
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("fly away").unwrap_err();
        assert_eq!(err, StockError::UnknownCommand("fly".to_string()));
        assert!(err.to_string().contains("help"));
    }

    #[test]
    fn test_extra_arguments_rejected() {
        assert!(matches!(
            Command::parse("clear now"),
            Err(StockError::Usage { command: "clear", .. })
        ));
    }

    #[test]
    fn test_script_path_keeps_spaces() {
        assert_eq!(
            parse("execute_script my scripts/fill.txt"),
            Command::ExecuteScript(PathBuf::from("my scripts/fill.txt"))
        );
        assert!(Command::parse("execute_script").is_err());
    }

    #[test]
    fn test_help_table_covers_every_command() {
        for (name, _, _) in COMMANDS {
            let line = match *name {
                "update_id" | "remove_by_id" => format!("{} 1", name),
                "execute_script" => format!("{} x.txt", name),
                _ => name.to_string(),
            };
            assert_eq!(parse(&line).name(), *name);
        }
        assert_eq!(COMMANDS.len(), 16);
    }
}
