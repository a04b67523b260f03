//! Authentication error types.

use thiserror::Error;

use prostore_core::ValidationErrors;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// `Display` output is shown to the user, so internal variants stay vague.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input failed validation; messages joined with `". "`.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already registered.
    #[error("Email already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("Something went wrong")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("Something went wrong")]
    PasswordHash,
}
