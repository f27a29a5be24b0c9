use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Error types for the identity module
#[derive(Error, Debug)]
pub enum IdentityError {
    /// One or more field rules failed; nothing was written
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A write hit a unique constraint that validation did not catch,
    /// typically a concurrent insert of the same email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The addressed record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A token did not authenticate against the stored digest
    #[error("Invalid token")]
    InvalidToken,

    /// A password reset token older than the reset window
    #[error("Token expired")]
    TokenExpired,

    /// Error from the password hashing primitive
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IdentityError {
    /// Classifies a failed insert or update, separating unique-constraint
    /// races from other database failures.
    pub(crate) fn from_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!("Unique constraint violated on write: {}", detail);
                IdentityError::Conflict("Email has already been taken".to_string())
            }
            _ => {
                error!(?err, "Database write failed");
                IdentityError::Database(err)
            }
        }
    }
}

/// Type alias for Result with IdentityError
pub type Result<T> = std::result::Result<T, IdentityError>;
