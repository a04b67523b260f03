//! Authentication service.
//!
//! Email and password accounts with Argon2id hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use tracing::instrument;

use prostore_core::{Email, UserRole, ValidationErrors};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{CurrentUser, NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length.
const MIN_NAME_LENGTH: usize = 3;

/// Sign-in form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-up form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

impl SignUpForm {
    /// Check every field, collecting all violations.
    fn validate(&self) -> Result<(String, Email), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_LENGTH {
            errors.push(format!("Name must be at least {MIN_NAME_LENGTH} characters"));
        }
        let email = Email::parse(&self.email)
            .map_err(|e| errors.push(e.to_string()))
            .ok();
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if self.password != self.confirm_password {
            errors.push("Passwords don't match");
        }

        match email {
            Some(email) if errors.is_empty() => Ok((name.to_owned(), email)),
            _ => Err(errors),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a, S> {
    users: &'a S,
}

impl<'a, S: UserRepository + Sync> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a S) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<User, AuthError> {
        let (name, email) = form.validate()?;
        let password_hash = hash_password(&form.password)?;

        let user = self
            .users
            .create_user(NewUser {
                name,
                email,
                password_hash,
                role: UserRole::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// An account still carrying the placeholder name is renamed to the
    /// local part of its email, and the new name is saved.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_in(&self, form: &SignInForm) -> Result<User, AuthError> {
        let email = Email::parse(&form.email).map_err(|_| AuthError::InvalidCredentials)?;

        let (mut user, password_hash) = self
            .users
            .user_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&form.password, &password_hash)?;

        if user.has_placeholder_name() {
            let name = user.email.local_part().to_owned();
            self.users.update_user_name(user.id, &name).await?;
            user.name = name;
        }

        tracing::info!(user_id = %user.id, "user signed in");
        Ok(user)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
