use chrono::{DateTime, Local};
use rusqlite::{self, Result, Row};

use crate::models::record::{Record, RecordId};

/// Column list shared by every record query, in `map_record_row` order.
pub(crate) const RECORD_COLUMNS: &str =
    "id, name, license_type, expiry_date, description, created_at, updated_at";

pub(crate) fn map_record_row(row: &Row<'_>) -> Result<Record> {
    Ok(Record {
        id: Some(RecordId(row.get(0)?)),
        name: row.get(1)?,
        license_type: row.get(2)?,
        expiry_date: row.get(3)?,
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: to_optional_local_datetime(row.get(5)?)?,
        updated_at: to_optional_local_datetime(row.get(6)?)?,
    })
}

fn to_optional_local_datetime(value: Option<String>) -> Result<Option<DateTime<Local>>> {
    value.map(to_local_datetime).transpose()
}

pub(crate) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
