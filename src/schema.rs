//! Static metadata for the destination tables
//!
//! Column lists, identity columns and `CREATE TABLE` statements are fixed per
//! table and indexed by [`Table`], so a table can only be named through the
//! enum once it has been parsed.
//!
//! Decimal columns (`rate`, `price`) are declared `TEXT`: SQLite's NUMERIC
//! affinity would turn them into 8-byte floats and drop digits.

use crate::error::{Result, SyncError};
use std::fmt;
use std::str::FromStr;

/// The three catalog tables, in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Currency,
    Categories,
    Offers,
}

struct TableSpec {
    name: &'static str,
    columns: &'static [&'static str],
    id_column: &'static str,
    ddl: &'static str,
}

const TABLES: [TableSpec; 3] = [
    TableSpec {
        name: "currency",
        columns: &["code", "rate"],
        id_column: "code",
        ddl: "CREATE TABLE IF NOT EXISTS currency (
    code VARCHAR(10) PRIMARY KEY,
    rate TEXT NOT NULL
);",
    },
    TableSpec {
        name: "categories",
        columns: &["category_id", "name"],
        id_column: "category_id",
        ddl: "CREATE TABLE IF NOT EXISTS categories (
    category_id VARCHAR(50) PRIMARY KEY,
    name TEXT NOT NULL
);",
    },
    TableSpec {
        name: "offers",
        columns: &["vendorCode", "name", "category_id", "price", "currency_code"],
        id_column: "vendorCode",
        ddl: "CREATE TABLE IF NOT EXISTS offers (
    vendorCode VARCHAR(100) PRIMARY KEY,
    name TEXT NOT NULL,
    category_id VARCHAR(50),
    price TEXT,
    currency_code VARCHAR(10),
    FOREIGN KEY (currency_code) REFERENCES currency(code),
    FOREIGN KEY (category_id) REFERENCES categories(category_id)
);",
    },
];

impl Table {
    /// All tables in the order they must be created and written
    pub const ALL: [Table; 3] = [Table::Currency, Table::Categories, Table::Offers];

    fn spec(self) -> &'static TableSpec {
        &TABLES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Expected columns, in declaration order
    pub fn columns(self) -> &'static [&'static str] {
        self.spec().columns
    }

    /// Natural key used for conflict resolution
    pub fn id_column(self) -> &'static str {
        self.spec().id_column
    }

    pub fn is_id_column(self, column: &str) -> bool {
        self.spec().id_column == column
    }

    /// Idempotent `CREATE TABLE IF NOT EXISTS` statement
    pub fn ddl(self) -> &'static str {
        self.spec().ddl
    }
}

impl FromStr for Table {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| SyncError::UnknownTable(s.to_string()))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DDL for a table given by name
pub fn table_ddl(table_name: &str) -> Result<&'static str> {
    Ok(table_name.parse::<Table>()?.ddl())
}

/// Expected column names for a table given by name
pub fn column_names(table_name: &str) -> Result<&'static [&'static str]> {
    Ok(table_name.parse::<Table>()?.columns())
}

/// Whether `column` is the identity column of the named table
pub fn is_id_column(table_name: &str, column: &str) -> Result<bool> {
    Ok(table_name.parse::<Table>()?.is_id_column(column))
}
