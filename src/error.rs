use thiserror::Error;

use crate::models::record::RecordId;

/// Domain errors raised by the license tracker.
///
/// Services return `anyhow::Result`; these variants travel inside the
/// `anyhow::Error` so callers can `downcast_ref::<LicenseError>()` when they
/// need to branch on the failure kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseError {
    /// Expiry text that is not a real `YYYY-MM-DD` calendar date.
    #[error("invalid date format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("license record {0} not found")]
    RecordNotFound(RecordId),

    /// The record has not been persisted yet, so it has no id to key reminders on.
    #[error("license record has no id; save it before scheduling reminders")]
    UnsavedRecord,

    #[error("validation failed: {0}")]
    Validation(String),
}

impl LicenseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LicenseError::Validation(msg.into())
    }
}
