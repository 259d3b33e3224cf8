//! License tracker.
//!
//! Ties the repository, the status engine and the reminder planner together
//! for the operations a front end performs: create, edit, delete, bulk
//! reschedule and the dashboard snapshot. The repository stays the single
//! source of truth; nothing here keeps a copy of the record list.

use anyhow::Result;
use serde::Serialize;

use crate::error::LicenseError;
use crate::models::record::{Record, RecordId};
use crate::models::reminder::ReminderPlan;
use crate::models::status::{RecordStatus, StatusSummary};
use crate::services::record::RecordRepository;
use crate::services::reminder::{ReminderPlanner, ReminderStore};
use crate::services::status;
use crate::utils::date::Clock;

/// One row of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub record: Record,
    pub status: RecordStatus,
}

/// Every record with its status, plus the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub records: Vec<RecordView>,
    pub summary: StatusSummary,
}

/// Outcome of re-planning every stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RescheduleReport {
    pub records: usize,
    pub reminders_scheduled: usize,
    /// Records left without reminders because their expiry is unreadable.
    pub skipped_invalid: usize,
}

pub struct LicenseTracker<'c, R, S, C: ?Sized> {
    repository: R,
    store: S,
    planner: ReminderPlanner,
    clock: &'c C,
}

impl<'c, R, S, C> LicenseTracker<'c, R, S, C>
where
    R: RecordRepository,
    S: ReminderStore,
    C: Clock + ?Sized,
{
    pub fn new(repository: R, store: S, planner: ReminderPlanner, clock: &'c C) -> Self {
        Self {
            repository,
            store,
            planner,
            clock,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn planner(&self) -> &ReminderPlanner {
        &self.planner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Persist a new record and schedule its reminders.
    ///
    /// Once the record is saved a scheduling failure no longer fails the
    /// call: it is logged and the returned plan is empty.
    pub fn create(&mut self, record: Record) -> Result<(Record, ReminderPlan)> {
        record.validate()?;

        let id = self.repository.insert(&record)?;
        let stored = self.load(id)?;
        let plan = self.schedule_saved(&stored);

        log::info!(
            "Added license {} ({}) expiring {} with {} reminder(s)",
            id,
            stored.name,
            stored.expiry_date,
            plan.len()
        );
        Ok((stored, plan))
    }

    /// Save changes to an existing record and replace its reminders.
    /// Scheduling failures after the save are handled as in [`Self::create`].
    pub fn update(&mut self, record: &Record) -> Result<ReminderPlan> {
        let id = record.require_id()?;
        record.validate()?;

        self.repository.update(record)?;
        let stored = self.load(id)?;
        let plan = self.schedule_saved(&stored);

        log::info!(
            "Updated license {} ({}); {} reminder(s) scheduled",
            id,
            stored.name,
            plan.len()
        );
        Ok(plan)
    }

    /// Remove a record and every reminder it could have.
    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        self.repository.delete(id)?;
        self.planner.cancel_all(id, &mut self.store)?;

        log::info!("Deleted license {}", id);
        Ok(())
    }

    pub fn get(&self, id: RecordId) -> Result<Record> {
        self.load(id)
    }

    /// A record together with its current status.
    pub fn view(&self, id: RecordId) -> Result<RecordView> {
        let record = self.load(id)?;
        let status = status::evaluate_record(&record, self.clock.today());
        Ok(RecordView { record, status })
    }

    /// Re-plan every stored record, e.g. after the database was restored or
    /// the reminder time changed. Records with unreadable dates end up with
    /// no reminders and are counted rather than failing the run.
    pub fn reschedule_all(&mut self) -> Result<RescheduleReport> {
        let today = self.clock.today();
        let records = self.repository.get_all()?;
        let mut report = RescheduleReport {
            records: records.len(),
            ..RescheduleReport::default()
        };

        for record in &records {
            match self.planner.re_plan(record, today, &mut self.store) {
                Ok(plan) => report.reminders_scheduled += plan.len(),
                Err(err) if is_invalid_date(&err) => report.skipped_invalid += 1,
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Rescheduled {} reminder(s) across {} license(s); {} skipped with invalid dates",
            report.reminders_scheduled,
            report.records,
            report.skipped_invalid
        );
        Ok(report)
    }

    /// Status of every record matching `query` (all records when blank).
    pub fn dashboard(&self, query: &str) -> Result<Dashboard> {
        let today = self.clock.today();
        let records = self.repository.search(query)?;

        let mut dashboard = Dashboard::default();
        for record in records {
            let status = status::evaluate_record(&record, today);
            dashboard.summary.record(&status);
            dashboard.records.push(RecordView { record, status });
        }

        Ok(dashboard)
    }

    /// Counters over every stored record.
    pub fn summary(&self) -> Result<StatusSummary> {
        let records = self.repository.get_all()?;
        Ok(status::summarize(&records, self.clock.today()))
    }

    /// Re-plan a record that is already persisted. The record stays saved
    /// whatever the store does; `reschedule_all` rebuilds what is missing.
    fn schedule_saved(&mut self, stored: &Record) -> ReminderPlan {
        match self
            .planner
            .re_plan(stored, self.clock.today(), &mut self.store)
        {
            Ok(plan) => plan,
            Err(err) => {
                log::warn!(
                    "License {} ({}) saved but its reminders were not scheduled: {:#}",
                    stored.id.map(|id| id.to_string()).unwrap_or_default(),
                    stored.name,
                    err
                );
                ReminderPlan::default()
            }
        }
    }

    fn load(&self, id: RecordId) -> Result<Record> {
        self.repository
            .get_by_id(id)?
            .ok_or_else(|| LicenseError::RecordNotFound(id).into())
    }
}

fn is_invalid_date(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<LicenseError>(),
        Some(LicenseError::InvalidDateFormat(_))
    )
}
