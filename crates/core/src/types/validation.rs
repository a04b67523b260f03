//! Accumulated field-level validation failures.

use core::fmt;

/// A non-empty list of human-readable validation messages.
///
/// Displayed as the messages joined with `". "`, which is what the API sends
/// back in `ActionResponse::message`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Record a violation.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Whether no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual messages, in the order they were recorded.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(())` if nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("Validation failed with unknown errors.");
        }
        f.write_str(&self.0.join(". "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<&str> for ValidationErrors {
    fn from(message: &str) -> Self {
        Self(vec![message.to_owned()])
    }
}
