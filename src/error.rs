// Bank Account Manager - Error Taxonomy
// Every failure an account operation can report, typed instead of string-matched

use std::path::PathBuf;
use thiserror::Error;

use crate::entities::account::{MAX_ACCOUNT, MIN_ACCOUNT};

/// Errors raised by the record store and the account service.
///
/// The `Display` text of the user-facing variants is the message the web
/// UI shows, so keep it short and human.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Account number must be between {} and {}", MIN_ACCOUNT, MAX_ACCOUNT)]
    InvalidAccountNumber(i64),

    #[error("First and last name are required")]
    MissingName,

    /// Names are stored as single whitespace-free tokens
    #[error("{field} must be a single word of printable characters")]
    InvalidName { field: &'static str },

    #[error("{field} must be at most {max} bytes")]
    NameTooLong { field: &'static str, max: usize },

    #[error("Amount must be a finite number")]
    InvalidAmount,

    #[error("Balance {0:.2} is outside the allowed range")]
    BalanceOutOfRange(f64),

    #[error("Account #{0} already exists")]
    AccountExists(u32),

    #[error("Account #{0} does not exist")]
    AccountNotFound(u32),

    #[error("No accounts found")]
    NoAccounts,

    #[error("Data file {} could not be opened", .0.display())]
    DataFileMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BankError {
    /// True for errors caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            BankError::Io(_) | BankError::Csv(_) | BankError::DataFileMissing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
