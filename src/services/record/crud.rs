use super::shared::{map_record_row, RECORD_COLUMNS};
use super::RecordService;
use crate::error::LicenseError;
use crate::models::record::{Record, RecordId};
use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{self, params};

impl<'a> RecordService<'a> {
    /// Insert a new record, returning it with its id and timestamps filled in.
    pub fn create(&self, mut record: Record) -> Result<Record> {
        record.validate()?;

        let now = Local::now();
        let stamp = now.to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO licenses (
                    name, license_type, expiry_date, description, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    record.name.trim(),
                    record.license_type.trim(),
                    record.expiry_date,
                    record.description,
                    &stamp,
                    &stamp,
                ],
            )
            .context("Failed to insert license")?;

        let id = RecordId(self.conn.last_insert_rowid());
        record.id = Some(id);
        record.name = record.name.trim().to_string();
        record.license_type = record.license_type.trim().to_string();
        record.created_at = Some(now);
        record.updated_at = Some(now);

        log::debug!("Inserted license {} ({})", id, record.name);
        Ok(record)
    }

    /// Retrieve a record by id.
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM licenses WHERE id = ?", RECORD_COLUMNS),
            [id.0],
            map_record_row,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context(format!("Failed to load license {}", id)),
        }
    }

    /// Overwrite the stored fields of an existing record.
    pub fn update(&self, record: &Record) -> Result<()> {
        let id = record.require_id()?;
        record.validate()?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE licenses SET
                    name = ?, license_type = ?, expiry_date = ?, description = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    record.name.trim(),
                    record.license_type.trim(),
                    record.expiry_date,
                    record.description,
                    Local::now().to_rfc3339(),
                    id.0,
                ],
            )
            .context("Failed to update license")?;

        if rows_affected == 0 {
            return Err(LicenseError::RecordNotFound(id).into());
        }

        Ok(())
    }

    /// Delete a record by id.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM licenses WHERE id = ?", [id.0])
            .context("Failed to delete license")?;

        if rows_affected == 0 {
            return Err(LicenseError::RecordNotFound(id).into());
        }

        log::debug!("Deleted license {}", id);
        Ok(())
    }
}
