//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ComposeError;

/// Errors emitted by `ExamSession`.
///
/// Submitting outside a running exam, or starting twice, are not errors:
/// those calls report `false` instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("exam duration must be positive and within the clock's range")]
    InvalidDuration,
    #[error("no question paper configured")]
    NotConfigured,
    #[error("exam already started")]
    AlreadyStarted,
    #[error("no tokio runtime available for the exam timer")]
    NoRuntime,
}

impl SessionError {
    /// True when the caller passed bad topics, count or duration.
    #[must_use]
    pub fn is_invalid_configuration(&self) -> bool {
        match self {
            SessionError::Compose(err) => err.is_invalid_configuration(),
            SessionError::InvalidDuration => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, SessionError::Compose(err) if err.is_missing_resource())
    }
}
