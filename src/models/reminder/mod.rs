//! Reminder plan and scheduling types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::record::RecordId;

/// Days before expiry at which a reminder fires, most distant first.
pub const LEAD_TIMES: [u32; 7] = [90, 60, 30, 14, 7, 1, 0];

/// Identity of one scheduled reminder. Scheduling the same key twice
/// replaces the earlier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReminderKey {
    pub record_id: RecordId,
    pub lead_days: u32,
}

impl ReminderKey {
    pub fn new(record_id: RecordId, lead_days: u32) -> Self {
        Self {
            record_id,
            lead_days,
        }
    }

    /// Every key a record could ever have been scheduled under.
    pub fn all_for(record_id: RecordId) -> impl Iterator<Item = ReminderKey> {
        LEAD_TIMES
            .iter()
            .map(move |&lead_days| ReminderKey::new(record_id, lead_days))
    }
}

/// Data handed to the notifier when a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub record_name: String,
    pub lead_days: u32,
}

impl ReminderPayload {
    pub fn message(&self) -> String {
        reminder_message(&self.record_name, self.lead_days)
    }
}

/// Notification body for a license that expires in `lead_days` days.
pub fn reminder_message(name: &str, lead_days: u32) -> String {
    match lead_days {
        0 => format!("{} expires today!", name),
        1 => format!("{} expires in 1 day", name),
        n => format!("{} expires in {} days", name, n),
    }
}

/// One entry of a reminder plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedReminder {
    /// Local wall-clock instant the reminder should fire.
    pub fire_at: NaiveDateTime,
    pub lead_days: u32,
}

/// Future reminders for one record, ordered by `fire_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReminderPlan {
    entries: Vec<PlannedReminder>,
}

impl ReminderPlan {
    pub(crate) fn from_entries(entries: Vec<PlannedReminder>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lead_days(&self) -> Vec<u32> {
        self.entries.iter().map(|entry| entry.lead_days).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlannedReminder> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ReminderPlan {
    type Item = &'a PlannedReminder;
    type IntoIter = std::slice::Iter<'a, PlannedReminder>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A reminder held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledReminder {
    pub key: ReminderKey,
    pub fire_at: NaiveDateTime,
    pub payload: ReminderPayload,
}
