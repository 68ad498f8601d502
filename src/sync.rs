//! Schema validation and batched upserts
//!
//! The synchronizer only knows tables, columns and field values. Writing them
//! is delegated to a [`Destination`], so the same logic drives SQLite or any
//! other store that can insert-or-update keyed by the identity column.

use crate::error::{Result, SyncError};
use crate::models::{Category, Currency, Offer};
use crate::schema::Table;
use bigdecimal::BigDecimal;

/// A single column value of a record being written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Decimal(&'a BigDecimal),
    Null,
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

impl<'a> From<Option<&'a BigDecimal>> for FieldValue<'a> {
    fn from(value: Option<&'a BigDecimal>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Decimal)
    }
}

/// A record that maps onto one row of a catalog table
pub trait UpsertRecord {
    const TABLE: Table;

    /// Values in the order of `Self::TABLE.columns()`
    fn field_values(&self) -> Vec<FieldValue<'_>>;
}

impl UpsertRecord for Currency {
    const TABLE: Table = Table::Currency;

    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![FieldValue::Text(&self.code), FieldValue::Decimal(&self.rate)]
    }
}

impl UpsertRecord for Category {
    const TABLE: Table = Table::Categories;

    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![FieldValue::Text(&self.id), FieldValue::Text(&self.name)]
    }
}

impl UpsertRecord for Offer {
    const TABLE: Table = Table::Offers;

    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Text(&self.vendor_code),
            FieldValue::Text(&self.name),
            self.category_id.as_deref().into(),
            self.price.as_ref().into(),
            self.currency_code.as_deref().into(),
        ]
    }
}

/// Storage the catalog is synchronized into.
///
/// Each call is one logical operation and owns its connection for exactly
/// that call.
pub trait Destination {
    /// Run the DDL of every table, in order
    fn create_tables(&self, tables: &[Table]) -> Result<()>;

    /// Live column names of each table (empty when the table does not exist)
    fn live_columns(&self, tables: &[Table]) -> Result<Vec<Vec<String>>>;

    /// Insert-or-update `rows` keyed by `table.id_column()`, as one batch.
    ///
    /// Rows hold values in `table.columns()` order. Returns the rows written.
    fn upsert_rows(&self, table: Table, rows: &[Vec<FieldValue<'_>>]) -> Result<usize>;
}

/// Fail unless `actual` contains every expected column of `table`.
///
/// Comparison ignores case; extra columns and column order do not matter.
pub fn check_columns(table: Table, actual: &[String]) -> Result<()> {
    let missing = table
        .columns()
        .iter()
        .any(|expected| !actual.iter().any(|a| a.eq_ignore_ascii_case(expected)));

    if missing {
        return Err(SyncError::SchemaMismatch {
            table: table.name().to_string(),
            expected: table.columns().iter().map(|c| c.to_string()).collect(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Creates, validates and fills the catalog tables of a destination
pub struct Synchronizer<D> {
    destination: D,
}

impl<D: Destination> Synchronizer<D> {
    pub fn new(destination: D) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn create_tables(&self, tables: &[Table]) -> Result<()> {
        self.destination.create_tables(tables)?;
        log::info!("Tables created/verified: {:?}", names(tables));
        Ok(())
    }

    /// Check every table before anything is written; the first mismatch wins.
    pub fn validate_structure(&self, tables: &[Table]) -> Result<()> {
        let live = self.destination.live_columns(tables)?;
        for (table, columns) in tables.iter().zip(&live) {
            check_columns(*table, columns)?;
        }
        log::info!("Database structure is valid for {:?}", names(tables));
        Ok(())
    }

    /// Write all records of one entity as a single batch.
    ///
    /// An empty slice is a no-op and never touches the destination.
    pub fn upsert<R: UpsertRecord>(&self, records: &[R]) -> Result<usize> {
        if records.is_empty() {
            log::debug!("No {} records to upsert", R::TABLE);
            return Ok(0);
        }

        let rows: Vec<Vec<FieldValue<'_>>> = records.iter().map(R::field_values).collect();
        let count = self.destination.upsert_rows(R::TABLE, &rows)?;
        log::info!("Upserted {} rows into {}", count, R::TABLE);
        Ok(count)
    }

    pub fn upsert_currencies(&self, currencies: &[Currency]) -> Result<usize> {
        self.upsert(currencies)
    }

    pub fn upsert_categories(&self, categories: &[Category]) -> Result<usize> {
        self.upsert(categories)
    }

    pub fn upsert_offers(&self, offers: &[Offer]) -> Result<usize> {
        self.upsert(offers)
    }
}

fn names(tables: &[Table]) -> Vec<&'static str> {
    tables.iter().map(|t| t.name()).collect()
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
