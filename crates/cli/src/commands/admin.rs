//! User role management.
//!
//! Admins can read any order. There is no sign-up path to the admin role;
//! it is granted here.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use thiserror::Error;

use prostore_core::{Email, UserRole};
use prostore_storefront::db::{self, PgStore, RepositoryError, UserRepository};

/// Errors that can occur during role changes.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: user, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No account with that email.
    #[error("No user with email: {0}")]
    UserNotFound(String),

    /// Update failed.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Parse the command arguments before touching the database.
fn parse_args(email: &str, role: &str) -> Result<(Email, UserRole), AdminError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    Ok((email, role))
}

/// Set the role of the user with `email`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the user does not exist,
/// or the database is unreachable.
pub async fn set_role(email: &str, role: &str) -> Result<(), AdminError> {
    let (email, role) = parse_args(email, role)?;

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let store = PgStore::new(db::create_pool(&database_url).await?);

    store
        .set_user_role(&email, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Set role of {} to {}", email, role);
    Ok(())
}
