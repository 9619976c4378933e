use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage read error: {0}")]
    StorageRead(String),
    #[error("Storage write error: {0}")]
    StorageWrite(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl BudgetError {
    pub fn validation(message: impl Into<String>) -> Self {
        BudgetError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BudgetError::Validation(_))
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_wraps_core_error_transparently() {
        let err = CliError::from(BudgetError::validation("amount must not be negative"));
        assert_eq!(
            err.to_string(),
            "Invalid input: amount must not be negative"
        );
    }

    #[test]
    fn validation_helper_is_detected() {
        assert!(BudgetError::validation("x").is_validation());
        assert!(!BudgetError::StorageWrite("disk full".into()).is_validation());
    }
}
