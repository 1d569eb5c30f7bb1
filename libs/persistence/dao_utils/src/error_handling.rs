use std::error::Error as _;

use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Storage failure, already classified for the layers above.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate key violates unique constraint {constraint}")]
    Duplicate { constraint: String },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn duplicate(constraint: &str) -> Self {
        Self::Duplicate {
            constraint: constraint.to_string(),
        }
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            if *db_err.code() == SqlState::UNIQUE_VIOLATION {
                return Self::Duplicate {
                    constraint: db_err
                        .constraint()
                        .unwrap_or_default()
                        .to_string(),
                };
            }
            // Class 08: connection exception.
            if db_err.code().code().starts_with("08")
                || *db_err.code() == SqlState::ADMIN_SHUTDOWN
            {
                return Self::Unavailable(db_err.message().to_string());
            }
            return Self::Internal(db_err.message().to_string());
        }

        let io_failure = err
            .source()
            .is_some_and(|source| source.is::<std::io::Error>());
        if err.is_closed() || io_failure {
            Self::Unavailable(err.to_string())
        }
        else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Unavailable(err.to_string())
    }
}
