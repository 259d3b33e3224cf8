//! SQLite-backed reminder store so pending reminders survive restarts.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

use super::store::ReminderStore;
use crate::models::record::RecordId;
use crate::models::reminder::{ReminderKey, ReminderPayload, ScheduledReminder};

const FIRE_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reminder store over the `scheduled_reminders` table.
pub struct SqliteReminderStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteReminderStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn query(&self, sql: &str, bound: Option<String>) -> Result<Vec<ScheduledReminder>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match bound {
            Some(value) => stmt.query_map([value], map_reminder_row)?,
            None => stmt.query_map([], map_reminder_row)?,
        };

        let reminders = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load scheduled reminders")?;

        Ok(reminders)
    }
}

impl<'a> ReminderStore for SqliteReminderStore<'a> {
    fn schedule(
        &mut self,
        key: ReminderKey,
        fire_at: NaiveDateTime,
        payload: ReminderPayload,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO scheduled_reminders (record_id, lead_days, fire_at, record_name)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(record_id, lead_days) DO UPDATE SET
                    fire_at = excluded.fire_at,
                    record_name = excluded.record_name",
                params![
                    key.record_id.0,
                    key.lead_days,
                    fire_at.format(FIRE_AT_FORMAT).to_string(),
                    payload.record_name,
                ],
            )
            .with_context(|| format!("Failed to schedule reminder {:?}", key))?;
        Ok(())
    }

    fn cancel(&mut self, key: ReminderKey) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM scheduled_reminders WHERE record_id = ?1 AND lead_days = ?2",
                params![key.record_id.0, key.lead_days],
            )
            .with_context(|| format!("Failed to cancel reminder {:?}", key))?;
        Ok(())
    }

    fn due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledReminder>> {
        self.query(
            "SELECT record_id, lead_days, fire_at, record_name
             FROM scheduled_reminders
             WHERE fire_at <= ?1
             ORDER BY fire_at ASC, record_id ASC, lead_days ASC",
            Some(now.format(FIRE_AT_FORMAT).to_string()),
        )
    }

    fn pending(&self) -> Result<Vec<ScheduledReminder>> {
        self.query(
            "SELECT record_id, lead_days, fire_at, record_name
             FROM scheduled_reminders
             ORDER BY fire_at ASC, record_id ASC, lead_days ASC",
            None,
        )
    }
}

fn map_reminder_row(row: &Row<'_>) -> rusqlite::Result<ScheduledReminder> {
    let lead_days: u32 = row.get(1)?;
    let fire_at: String = row.get(2)?;
    let fire_at = NaiveDateTime::parse_from_str(&fire_at, FIRE_AT_FORMAT)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(ScheduledReminder {
        key: ReminderKey::new(RecordId(row.get(0)?), lead_days),
        fire_at,
        payload: ReminderPayload {
            record_name: row.get(3)?,
            lead_days,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use chrono::NaiveDate;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn payload(name: &str, lead_days: u32) -> ReminderPayload {
        ReminderPayload {
            record_name: name.to_string(),
            lead_days,
        }
    }

    #[test]
    fn test_schedule_and_list_pending() {
        let db = setup_test_db();
        let mut store = SqliteReminderStore::new(db.connection());

        store
            .schedule(ReminderKey::new(RecordId(1), 7), at(2025, 5, 25, 9), payload("Alice", 7))
            .unwrap();
        store
            .schedule(ReminderKey::new(RecordId(1), 30), at(2025, 5, 2, 9), payload("Alice", 30))
            .unwrap();

        let pending = store.pending().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].key.lead_days, 30);
        assert_eq!(pending[0].fire_at, at(2025, 5, 2, 9));
        assert_eq!(pending[1].payload, payload("Alice", 7));
    }

    #[test]
    fn test_schedule_overwrites_existing_key() {
        let db = setup_test_db();
        let mut store = SqliteReminderStore::new(db.connection());
        let key = ReminderKey::new(RecordId(4), 1);

        store.schedule(key, at(2025, 5, 31, 9), payload("Old name", 1)).unwrap();
        store.schedule(key, at(2025, 8, 31, 9), payload("New name", 1)).unwrap();

        let pending = store.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at, at(2025, 8, 31, 9));
        assert_eq!(pending[0].payload.record_name, "New name");
    }

    #[test]
    fn test_cancel_missing_key_is_noop() {
        let db = setup_test_db();
        let mut store = SqliteReminderStore::new(db.connection());

        assert!(store.cancel(ReminderKey::new(RecordId(9), 0)).is_ok());
    }

    #[test]
    fn test_due_includes_exact_instant() {
        let db = setup_test_db();
        let mut store = SqliteReminderStore::new(db.connection());

        store
            .schedule(ReminderKey::new(RecordId(1), 0), at(2025, 6, 1, 9), payload("A", 0))
            .unwrap();
        store
            .schedule(ReminderKey::new(RecordId(2), 0), at(2025, 6, 2, 9), payload("B", 0))
            .unwrap();

        assert!(store.due(at(2025, 6, 1, 8)).unwrap().is_empty());

        let due = store.due(at(2025, 6, 1, 9)).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].key, ReminderKey::new(RecordId(1), 0));
    }

    #[test]
    fn test_reminders_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("licenses.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new(path).unwrap();
            db.initialize_schema().unwrap();
            let mut store = SqliteReminderStore::new(db.connection());
            store
                .schedule(ReminderKey::new(RecordId(5), 14), at(2025, 5, 18, 9), payload("E", 14))
                .unwrap();
        }

        let db = Database::new(path).unwrap();
        let store = SqliteReminderStore::new(db.connection());
        assert_eq!(store.pending().unwrap().len(), 1);
    }
}
