//! SQLite destination for catalog sync
//!
//! Values are always bound as parameters. Table and column names come only
//! from the static [`Table`] metadata.
//! Every operation opens its own connection and drops it before returning.

use crate::error::{Result, SyncError};
use crate::schema::Table;
use crate::sync::{Destination, FieldValue};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, ToSql};
use std::path::{Path, PathBuf};

/// Result type for raw database operations
pub type DbResult<T> = rusqlite::Result<T>;

impl ToSql for FieldValue<'_> {
    fn to_sql(&self) -> DbResult<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            // Plain digits into a TEXT column, stored exactly as extracted
            FieldValue::Decimal(d) => ToSqlOutput::Owned(Value::Text(d.to_plain_string())),
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// SQLite database file holding the catalog tables
#[derive(Debug, Clone)]
pub struct CatalogDb {
    path: PathBuf,
}

impl CatalogDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection with foreign key enforcement enabled
    pub fn open(&self) -> Result<Connection> {
        log::debug!("Opening database: {}", self.path.display());
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

impl Destination for CatalogDb {
    fn create_tables(&self, tables: &[Table]) -> Result<()> {
        let conn = self.open()?;
        for table in tables {
            conn.execute_batch(table.ddl())
                .map_err(SyncError::write_failed(table.name()))?;
            log::debug!("Executed DDL for {}", table);
        }
        Ok(())
    }

    fn live_columns(&self, tables: &[Table]) -> Result<Vec<Vec<String>>> {
        let conn = self.open()?;
        let mut live = Vec::with_capacity(tables.len());
        for table in tables {
            live.push(table_columns(&conn, table.name())?);
        }
        Ok(live)
    }

    fn upsert_rows(&self, table: Table, rows: &[Vec<FieldValue<'_>>]) -> Result<usize> {
        let mut conn = self.open()?;
        upsert_batch(&mut conn, table, rows).map_err(SyncError::write_failed(table.name()))
    }
}

/// Column names of a table as reported by SQLite, empty if it does not exist
pub fn table_columns(conn: &Connection, table_name: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns: DbResult<Vec<String>> = stmt
        .query_map(params![table_name], |row| row.get(0))?
        .collect();
    columns
}

/// `INSERT .. ON CONFLICT (id) DO UPDATE SET` for every non-key column
fn upsert_sql(table: Table) -> String {
    let columns = table.columns();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .filter(|c| !table.is_id_column(c))
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
        table.name(),
        columns.join(", "),
        placeholders.join(", "),
        table.id_column(),
        updates.join(", ")
    )
}

/// Write all rows inside one transaction
fn upsert_batch(conn: &mut Connection, table: Table, rows: &[Vec<FieldValue<'_>>]) -> DbResult<usize> {
    let tx = conn.transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare_cached(&upsert_sql(table))?;
        for row in rows {
            stmt.execute(params_from_iter(row.iter()))?;
            count += 1;
        }
    }
    tx.commit()?;
    Ok(count)
}
