use thiserror::Error;

use crate::domain::{Cents, UnknownKindError};

/// Coarse classification for callers that need to tell user mistakes apart
/// from infrastructure failures (e.g. to pick an exit code or an HTTP
/// status: validation maps to a client error, io/storage to a server error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is invalid; retrying unchanged cannot succeed.
    Validation,
    /// The upload file is missing or unreadable.
    Io,
    /// The persistence layer failed; the same request may succeed later.
    Storage,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("cannot spend more than available (balance: {balance}, requested: {requested})")]
    InsufficientBalance { balance: Cents, requested: Cents },

    #[error("Invalid transaction value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    UnknownKind(#[from] UnknownKindError),

    #[error("Invalid CSV row at line {line}: {reason}")]
    InvalidCsvRow { line: usize, reason: String },

    #[error("Upload file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InsufficientBalance { .. }
            | AppError::InvalidValue(_)
            | AppError::UnknownKind(_)
            | AppError::InvalidCsvRow { .. } => ErrorKind::Validation,
            AppError::Io(_) => ErrorKind::Io,
            AppError::Database(_) => ErrorKind::Storage,
        }
    }
}
