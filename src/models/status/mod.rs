//! Derived expiry status types.
//!
//! Nothing here is persisted. Statuses are recomputed from the expiry date
//! and the current day every time they are needed.

use serde::Serialize;

/// Lifecycle state of a record relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// The expiry day is in the past
    Expired,
    /// Expires today or within the warning window
    ExpiringSoon,
    /// Expires beyond the warning window
    Active,
}

impl ExpiryStatus {
    pub fn tier(self) -> StatusTier {
        match self {
            ExpiryStatus::Expired => StatusTier::Red,
            ExpiryStatus::ExpiringSoon => StatusTier::Amber,
            ExpiryStatus::Active => StatusTier::Green,
        }
    }
}

/// Presentation severity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Red,
    Amber,
    Green,
}

impl StatusTier {
    /// Hex colour used for badges.
    pub fn color(self) -> &'static str {
        match self {
            StatusTier::Red => "#EF4444",
            StatusTier::Amber => "#F59E0B",
            StatusTier::Green => "#10B981",
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            StatusTier::Red => "Expired",
            StatusTier::Amber => "Expiring Soon",
            StatusTier::Green => "Active",
        }
    }
}

/// Result of evaluating one valid expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: ExpiryStatus,
    /// Calendar days until expiry; negative once expired.
    pub days_remaining: i64,
}

impl StatusReport {
    pub fn tier(&self) -> StatusTier {
        self.status.tier()
    }

    /// Short countdown text such as "Today", "1 day" or "12 days".
    pub fn countdown_label(&self) -> String {
        countdown_label(self.status, self.days_remaining)
    }
}

/// Countdown text for a status and day count.
pub fn countdown_label(status: ExpiryStatus, days: i64) -> String {
    if status == ExpiryStatus::Expired || days < 0 {
        return "Expired".to_string();
    }

    match days {
        0 => "Today".to_string(),
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    }
}

/// Status of a stored record, which may carry an unparsable expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordStatus {
    Evaluated(StatusReport),
    /// The stored expiry text is not a valid `YYYY-MM-DD` date.
    InvalidDate { raw: String },
}

impl RecordStatus {
    pub fn report(&self) -> Option<&StatusReport> {
        match self {
            RecordStatus::Evaluated(report) => Some(report),
            RecordStatus::InvalidDate { .. } => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, RecordStatus::InvalidDate { .. })
    }

    /// Countdown text, or "Invalid date" when the expiry could not be read.
    pub fn countdown_label(&self) -> String {
        match self {
            RecordStatus::Evaluated(report) => report.countdown_label(),
            RecordStatus::InvalidDate { .. } => "Invalid date".to_string(),
        }
    }
}

/// Dashboard counters over a snapshot of records.
///
/// `active + expiring_soon + expired + invalid == total`; records with an
/// invalid date are only counted in `invalid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub active: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub invalid: usize,
}

impl StatusSummary {
    pub fn record(&mut self, status: &RecordStatus) {
        self.total += 1;
        match status {
            RecordStatus::Evaluated(report) => match report.status {
                ExpiryStatus::Active => self.active += 1,
                ExpiryStatus::ExpiringSoon => self.expiring_soon += 1,
                ExpiryStatus::Expired => self.expired += 1,
            },
            RecordStatus::InvalidDate { .. } => self.invalid += 1,
        }
    }

    /// Records that landed in one of the three status buckets.
    pub fn classified(&self) -> usize {
        self.active + self.expiring_soon + self.expired
    }

    pub fn is_consistent(&self) -> bool {
        self.classified() + self.invalid == self.total
    }
}
