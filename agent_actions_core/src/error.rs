//! Error types for the action framework.
//!
//! Handler failures are plain `anyhow::Error`s; the types here cover the
//! framework's own failure modes (bad input, bad registration, bad config,
//! exhausted retries).

use std::fmt;

use thiserror::Error;

/// A single problem found while validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Raw input did not satisfy an action's field contract.
///
/// Every issue found is kept, so the caller can fix all of them at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldIssue::new(field, reason)])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Toolkit assembly failed. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error(
        "duplicate action '{name}': provided by both '{first_provider}' and '{second_provider}'"
    )]
    DuplicateAction {
        name: String,
        first_provider: String,
        second_provider: String,
    },
    #[error("provider '{provider}' declares an action with an empty name")]
    EmptyName { provider: String },
    #[error("action '{action}' from provider '{provider}' has an invalid contract: {issue}")]
    InvalidContract {
        action: String,
        provider: String,
        issue: FieldIssue,
    },
}

/// A retried operation gave up.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every allowed attempt failed.
    #[error("operation failed after {attempts} attempts: {last_error}")]
    Exhausted {
        attempts: u32,
        #[source]
        last_error: E,
    },
    /// An attempt failed in a way that retrying cannot fix.
    #[error("operation failed after {attempts} attempts: {last_error}")]
    Aborted {
        attempts: u32,
        #[source]
        last_error: E,
    },
}

impl<E> RetryError<E> {
    /// Total number of attempts made, including the first.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Aborted { attempts, .. } => *attempts,
        }
    }

    pub fn last_error(&self) -> &E {
        match self {
            Self::Exhausted { last_error, .. } | Self::Aborted { last_error, .. } => last_error,
        }
    }

    pub fn into_last_error(self) -> E {
        match self {
            Self::Exhausted { last_error, .. } | Self::Aborted { last_error, .. } => last_error,
        }
    }
}

impl RetryError<anyhow::Error> {
    /// Folds the attempt count into the handler error chain.
    ///
    /// `anyhow::Error` is not a `std::error::Error`, so handlers that retry
    /// anyhow-returning operations use this instead of `?`.
    pub fn into_anyhow(self) -> anyhow::Error {
        let attempts = self.attempts();
        self.into_last_error()
            .context(format!("operation failed after {attempts} attempts"))
    }
}

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("unknown network id '{0}'")]
    UnknownNetwork(String),
}
