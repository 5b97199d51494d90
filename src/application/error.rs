use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    #[error("Budget already exists for category: {0}")]
    BudgetAlreadyExists(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Reset not confirmed: type '{expected}' to confirm")]
    ResetNotConfirmed { expected: &'static str },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(_) => AppError::InvalidAmount(err.to_string()),
            LedgerError::MissingField(field) => AppError::MissingField(field.to_string()),
            LedgerError::TransactionNotFound(id) => AppError::TransactionNotFound(id.to_string()),
            LedgerError::BudgetNotFound(id) => AppError::BudgetNotFound(id.to_string()),
            LedgerError::GoalNotFound(id) => AppError::GoalNotFound(id.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidSetting(err.to_string())
    }
}
