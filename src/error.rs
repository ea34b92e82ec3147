//! Error kinds raised by the collection core.
//!
//! Everything in here surfaces to the command layer, which reports it and
//! keeps the command loop running.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StockError {
    /// The value parsed but breaks a rule (positivity, uniqueness, ...).
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The literal could not be parsed as the type the field expects.
    #[error("{field}: {message}")]
    Input { field: &'static str, message: String },

    #[error("{entity} is incomplete: required field '{field}' was never set")]
    IncompleteEntity {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Collection is empty")]
    EmptyCollection,

    #[error("No such command '{0}'. Type \"help\" to see all commands")]
    UnknownCommand(String),

    #[error("No product with id {0}")]
    NotFound(i64),

    /// Wrong number or shape of command arguments.
    #[error("{command}: {message}")]
    Usage {
        command: &'static str,
        message: String,
    },

    /// A caller broke an internal contract. Never caused by user data.
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

impl StockError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StockError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn input(field: &'static str, message: impl Into<String>) -> Self {
        StockError::Input {
            field,
            message: message.into(),
        }
    }

    pub fn usage(command: &'static str, message: impl Into<String>) -> Self {
        StockError::Usage {
            command,
            message: message.into(),
        }
    }

    /// Field the error is attached to, for validation and input failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            StockError::Validation { field, .. } | StockError::Input { field, .. } => Some(field),
            StockError::IncompleteEntity { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether re-prompting for the same field can fix this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StockError::Validation { .. } | StockError::Input { .. }
        )
    }
}

pub type StockResult<T> = Result<T, StockError>;
