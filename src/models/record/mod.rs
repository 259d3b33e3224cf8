//! License record model.
//!
//! A record is the unit the tracker stores: who or what the license belongs
//! to, what kind of license it is, and the calendar day it lapses.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::LicenseError;
use crate::utils::date::{format_date, parse_date, CalendarDate};

/// Opaque identifier of a stored record (the SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A time-bound license record.
///
/// The expiry is kept as the persisted `YYYY-MM-DD` text rather than a parsed
/// date so that rows written before validation existed can still be loaded;
/// [`Record::expiry`] is the single place that turns it into a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<RecordId>,
    pub name: String,
    pub license_type: String,
    pub expiry_date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Local>>,
}

impl Record {
    /// Create a new, unsaved record.
    ///
    /// # Examples
    /// ```
    /// use license_keeper::models::record::Record;
    ///
    /// let record = Record::new("Alice Smith", "Forklift", "2025-06-01").unwrap();
    /// assert!(record.id.is_none());
    /// assert!(Record::new("Alice Smith", "Forklift", "June 1st").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        license_type: impl Into<String>,
        expiry_date: impl Into<String>,
    ) -> Result<Self, LicenseError> {
        let record = Self {
            id: None,
            name: name.into(),
            license_type: license_type.into(),
            expiry_date: expiry_date.into(),
            description: String::new(),
            created_at: None,
            updated_at: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Set the free-form description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the expiry from a calendar date.
    pub fn set_expiry(&mut self, date: CalendarDate) {
        self.expiry_date = format_date(date);
    }

    /// Check the fields a user must supply before the record may be saved.
    pub fn validate(&self) -> Result<(), LicenseError> {
        if self.name.trim().is_empty() {
            return Err(LicenseError::validation("License name cannot be empty"));
        }

        if self.license_type.trim().is_empty() {
            return Err(LicenseError::validation("License type cannot be empty"));
        }

        self.expiry()?;
        Ok(())
    }

    /// The parsed expiry date.
    pub fn expiry(&self) -> Result<CalendarDate, LicenseError> {
        parse_date(&self.expiry_date)
    }

    /// The id, or `UnsavedRecord` if the record was never persisted.
    pub fn require_id(&self) -> Result<RecordId, LicenseError> {
        self.id.ok_or(LicenseError::UnsavedRecord)
    }
}
