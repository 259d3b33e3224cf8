//! Reminder store boundary and the in-memory implementation.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::models::reminder::{ReminderKey, ReminderPayload, ScheduledReminder};

/// One-shot wake-ups keyed by `(record, lead days)`.
///
/// `schedule` overwrites any pending entry for the same key and `cancel` on
/// a missing key is a no-op, so both are safe to repeat.
#[cfg_attr(test, mockall::automock)]
pub trait ReminderStore {
    fn schedule(
        &mut self,
        key: ReminderKey,
        fire_at: NaiveDateTime,
        payload: ReminderPayload,
    ) -> Result<()>;

    fn cancel(&mut self, key: ReminderKey) -> Result<()>;

    /// Entries whose `fire_at` is at or before `now`, earliest first.
    fn due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledReminder>>;

    /// Every pending entry, earliest first.
    fn pending(&self) -> Result<Vec<ScheduledReminder>>;
}

/// Keeps reminders in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryReminderStore {
    entries: BTreeMap<ReminderKey, (NaiveDateTime, ReminderPayload)>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ReminderKey) -> bool {
        self.entries.contains_key(key)
    }

    fn collect<F>(&self, mut keep: F) -> Vec<ScheduledReminder>
    where
        F: FnMut(&NaiveDateTime) -> bool,
    {
        let mut reminders: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, (fire_at, _))| keep(fire_at))
            .map(|(key, (fire_at, payload))| ScheduledReminder {
                key: *key,
                fire_at: *fire_at,
                payload: payload.clone(),
            })
            .collect();
        reminders.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then(a.key.cmp(&b.key)));
        reminders
    }
}

impl ReminderStore for InMemoryReminderStore {
    fn schedule(
        &mut self,
        key: ReminderKey,
        fire_at: NaiveDateTime,
        payload: ReminderPayload,
    ) -> Result<()> {
        self.entries.insert(key, (fire_at, payload));
        Ok(())
    }

    fn cancel(&mut self, key: ReminderKey) -> Result<()> {
        self.entries.remove(&key);
        Ok(())
    }

    fn due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledReminder>> {
        Ok(self.collect(|fire_at| *fire_at <= now))
    }

    fn pending(&self) -> Result<Vec<ScheduledReminder>> {
        Ok(self.collect(|_| true))
    }
}
