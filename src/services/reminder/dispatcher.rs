//! Fires due reminders.
//!
//! Polls a [`ReminderStore`] for entries whose time has come, hands each one
//! to a [`ReminderNotifier`] and removes it. Reminders are one-shot: a fired
//! entry is never re-armed, and a failed notification is not retried.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;

use super::store::ReminderStore;
use crate::models::reminder::{ReminderPayload, ScheduledReminder};
use crate::utils::date::Clock;

/// Presents a fired reminder to the user.
#[cfg_attr(test, mockall::automock)]
pub trait ReminderNotifier {
    fn notify(&self, payload: &ReminderPayload) -> Result<()>;
}

pub struct ReminderDispatcher<N> {
    notifier: N,
}

impl<N: ReminderNotifier> ReminderDispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Fire everything due at `now`, returning what was fired.
    pub fn tick<S>(&self, store: &mut S, now: NaiveDateTime) -> Result<Vec<ScheduledReminder>>
    where
        S: ReminderStore + ?Sized,
    {
        let due = store.due(now)?;

        for reminder in &due {
            if let Err(err) = self.notifier.notify(&reminder.payload) {
                log::warn!(
                    "Failed to deliver reminder for {} ({} day lead): {:#}",
                    reminder.payload.record_name,
                    reminder.payload.lead_days,
                    err
                );
            } else {
                log::info!("Reminder fired: {}", reminder.payload.message());
            }

            store.cancel(reminder.key)?;
        }

        Ok(due)
    }

    /// Tick every `interval` until `keep_running` returns false.
    ///
    /// Store errors are logged and the loop carries on with the next tick.
    pub fn run<S, C, F>(
        &self,
        store: &mut S,
        clock: &C,
        interval: Duration,
        mut keep_running: F,
    ) where
        S: ReminderStore + ?Sized,
        C: Clock + ?Sized,
        F: FnMut() -> bool,
    {
        log::info!("Reminder loop started (polling every {:?})", interval);

        while keep_running() {
            match self.tick(store, clock.now()) {
                Ok(fired) if !fired.is_empty() => {
                    log::debug!("Fired {} reminder(s)", fired.len());
                }
                Ok(_) => {}
                Err(err) => log::error!("Reminder tick failed: {:#}", err),
            }

            thread::sleep(interval);
        }

        log::info!("Reminder loop stopped");
    }
}
