use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_licenses_table(conn)?;
    run_licenses_migrations(conn)?;
    create_scheduled_reminders_table(conn)?;
    Ok(())
}

fn create_licenses_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS licenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            license_type TEXT NOT NULL,
            expiry_date TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )
    .context("Failed to create licenses table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_licenses_expiry ON licenses(expiry_date)",
        [],
    )
    .context("Failed to create licenses expiry index")?;

    Ok(())
}

/// Brings databases written by the first mobile release up to date: that
/// schema named the type column `type` and kept no timestamps.
fn run_licenses_migrations(conn: &Connection) -> Result<()> {
    migrations::rename_column(conn, "licenses", "type", "license_type")?;

    migrations::ensure_column(
        conn,
        "licenses",
        "created_at",
        "ALTER TABLE licenses ADD COLUMN created_at TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "licenses",
        "updated_at",
        "ALTER TABLE licenses ADD COLUMN updated_at TEXT",
    )?;

    Ok(())
}

fn create_scheduled_reminders_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheduled_reminders (
            record_id INTEGER NOT NULL,
            lead_days INTEGER NOT NULL,
            fire_at TEXT NOT NULL,
            record_name TEXT NOT NULL,
            PRIMARY KEY (record_id, lead_days)
        )",
        [],
    )
    .context("Failed to create scheduled_reminders table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_scheduled_reminders_fire_at
         ON scheduled_reminders(fire_at)",
        [],
    )
    .context("Failed to create scheduled_reminders index")?;

    Ok(())
}
