use anyhow::{Context, Result};
use rusqlite::Connection;

/// Checks whether a column exists on a table.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let query = format!(
        "SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name='{}'",
        table, column
    );

    let exists: i32 = conn
        .query_row(&query, [], |row| row.get(0))
        .context("Failed to inspect table info")?;

    Ok(exists > 0)
}

/// Adds a column if it does not already exist.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }

    conn.execute(ddl, [])
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
    log::info!("Migrated schema: added {}.{}", table, column);
    Ok(())
}

/// Renames a column when the old name is still present.
pub fn rename_column(conn: &Connection, table: &str, from: &str, to: &str) -> Result<()> {
    if !column_exists(conn, table, from)? || column_exists(conn, table, to)? {
        return Ok(());
    }

    let stmt = format!(
        "ALTER TABLE {table} RENAME COLUMN {from} TO {to}",
        table = table,
        from = from,
        to = to
    );
    conn.execute(&stmt, []).with_context(|| {
        format!(
            "Failed to rename {from} to {to} on {table}",
            from = from,
            to = to,
            table = table
        )
    })?;
    log::info!("Migrated schema: renamed {}.{} to {}", table, from, to);
    Ok(())
}
