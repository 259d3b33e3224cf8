//! Reminder planning.
//!
//! Turns an expiry date into the fixed set of lead-time checkpoints that are
//! still ahead, and re-plans a record against a [`ReminderStore`].

use anyhow::Result;
use chrono::{Days, NaiveTime};

use super::store::ReminderStore;
use crate::error::LicenseError;
use crate::models::record::{Record, RecordId};
use crate::models::reminder::{
    PlannedReminder, ReminderKey, ReminderPayload, ReminderPlan, LEAD_TIMES,
};
use crate::models::status::ExpiryStatus;
use crate::services::status;
use crate::utils::date::{at_time_of_day, CalendarDate};

/// Plans reminders at a fixed wall-clock time on each checkpoint day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPlanner {
    reminder_time: NaiveTime,
}

impl Default for ReminderPlanner {
    fn default() -> Self {
        Self {
            reminder_time: default_reminder_time(),
        }
    }
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl ReminderPlanner {
    pub fn new(reminder_time: NaiveTime) -> Self {
        Self { reminder_time }
    }

    pub fn reminder_time(&self) -> NaiveTime {
        self.reminder_time
    }

    /// Checkpoints for `expiry` that fall on a day after `today`.
    ///
    /// A checkpoint landing on `today` itself is dropped, so every returned
    /// `fire_at` is later than any instant of the current day. Expired dates
    /// get an empty plan.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use license_keeper::services::reminder::ReminderPlanner;
    ///
    /// let expiry = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    /// let today = NaiveDate::from_ymd_opt(2025, 5, 25).unwrap();
    /// let plan = ReminderPlanner::default().plan(expiry, today);
    /// assert_eq!(plan.lead_days(), vec![1, 0]);
    /// ```
    pub fn plan(&self, expiry: CalendarDate, today: CalendarDate) -> ReminderPlan {
        if status::evaluate(expiry, today).status == ExpiryStatus::Expired {
            return ReminderPlan::default();
        }

        let entries = LEAD_TIMES
            .iter()
            .filter_map(|&lead_days| {
                let fire_date = expiry.checked_sub_days(Days::new(u64::from(lead_days)))?;
                (fire_date > today).then(|| PlannedReminder {
                    fire_at: at_time_of_day(fire_date, self.reminder_time),
                    lead_days,
                })
            })
            .collect();

        ReminderPlan::from_entries(entries)
    }

    /// Plan for a stored record; fails when its expiry cannot be parsed.
    pub fn plan_record(
        &self,
        record: &Record,
        today: CalendarDate,
    ) -> Result<ReminderPlan, LicenseError> {
        Ok(self.plan(record.expiry()?, today))
    }

    /// Replace whatever is scheduled for `record` with a fresh plan.
    ///
    /// Every lead-time key for the record is cancelled first, including ones
    /// the new plan would not produce. If the expiry cannot be parsed the
    /// record ends up with nothing scheduled and the parse error is returned.
    pub fn re_plan<S>(
        &self,
        record: &Record,
        today: CalendarDate,
        store: &mut S,
    ) -> Result<ReminderPlan>
    where
        S: ReminderStore + ?Sized,
    {
        let record_id = record.require_id()?;
        self.cancel_all(record_id, store)?;

        let plan = self.plan_record(record, today).map_err(|err| {
            log::warn!(
                "Not scheduling reminders for license {} ({}): {}",
                record_id,
                record.name,
                err
            );
            err
        })?;

        for entry in &plan {
            store.schedule(
                ReminderKey::new(record_id, entry.lead_days),
                entry.fire_at,
                ReminderPayload {
                    record_name: record.name.clone(),
                    lead_days: entry.lead_days,
                },
            )?;
        }

        log::debug!(
            "Planned {} reminder(s) for license {} ({}): leads {:?}",
            plan.len(),
            record_id,
            record.name,
            plan.lead_days()
        );
        Ok(plan)
    }

    /// Cancel every lead-time key a record could hold. Used on delete.
    pub fn cancel_all<S>(&self, record_id: RecordId, store: &mut S) -> Result<()>
    where
        S: ReminderStore + ?Sized,
    {
        for key in ReminderKey::all_for(record_id) {
            store.cancel(key)?;
        }
        Ok(())
    }
}
