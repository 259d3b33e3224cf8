use super::shared::{map_record_row, RECORD_COLUMNS};
use super::RecordService;
use crate::models::record::Record;
use anyhow::{Context, Result};

impl<'a> RecordService<'a> {
    /// List every record ordered by expiry date, soonest first.
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM licenses ORDER BY expiry_date ASC, id ASC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map([], map_record_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list licenses")?;

        Ok(records)
    }

    /// Case-insensitive substring search on name or license type.
    ///
    /// A blank query returns every record, which is what a search box that
    /// has just been cleared expects. Matching happens here rather than in
    /// SQL: SQLite's `LOWER` only folds ASCII, and the query is plain text,
    /// so `%` and `_` must not act as wildcards.
    pub fn search(&self, query: &str) -> Result<Vec<Record>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_all();
        }

        let needle = query.to_lowercase();
        let records = self
            .list_all()
            .context("Failed to search licenses")?
            .into_iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.license_type.to_lowercase().contains(&needle)
            })
            .collect();

        Ok(records)
    }
}
