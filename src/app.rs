//! Commands shared by the CLI and the interactive menu
//!
//! Each command returns the text to show the user; printing is left to the
//! caller.

use crate::catalog::CatalogSource;
use crate::error::Result;
use crate::schema::{self, Table};
use crate::sync::{Destination, Synchronizer};

/// A feed paired with the destination it is synchronized into
pub struct App<D> {
    catalog: CatalogSource,
    sync: Synchronizer<D>,
}

/// Rows written per entity by an update
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCounts {
    pub currencies: usize,
    pub categories: usize,
    pub offers: usize,
}

impl<D: Destination> App<D> {
    pub fn new(catalog: CatalogSource, destination: D) -> Self {
        Self {
            catalog,
            sync: Synchronizer::new(destination),
        }
    }

    pub fn synchronizer(&self) -> &Synchronizer<D> {
        &self.sync
    }

    pub fn show_tables(&mut self) -> Result<String> {
        let tables = self.catalog.table_names()?;
        Ok(format!("Tables in XML: {}", join(&tables)))
    }

    pub fn show_ddl(&self, table_name: &str) -> Result<String> {
        Ok(schema::table_ddl(table_name)?.to_string())
    }

    pub fn show_columns(&self, table_name: &str) -> Result<String> {
        let table: Table = table_name.parse()?;
        let lines = table.columns().iter().map(|column| {
            let marker = if table.is_id_column(column) {
                " (PRIMARY KEY)"
            } else {
                ""
            };
            format!("  - {}{}", column, marker)
        });
        Ok(std::iter::once(format!("Columns of {}:", table))
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn create_tables(&mut self) -> Result<String> {
        let tables = self.catalog.table_names()?;
        self.sync.create_tables(&tables)?;
        Ok(format!("Tables created/verified: {}", join(&tables)))
    }

    pub fn validate(&mut self) -> Result<String> {
        let tables = self.catalog.table_names()?;
        self.sync.validate_structure(&tables)?;
        Ok("Database structure is valid".to_string())
    }

    /// Validate every table in the feed, then upsert one entity
    pub fn update_table(&mut self, table_name: &str) -> Result<String> {
        let table: Table = table_name.parse()?;
        let tables = self.catalog.table_names()?;
        self.sync.validate_structure(&tables)?;

        let count = self.update_entity(table)?;
        Ok(format!("Table {} updated: {} records", table, count))
    }

    /// Validate every table in the feed, then upsert all three entities in
    /// dependency order
    pub fn update_all(&mut self) -> Result<UpdateCounts> {
        let tables = self.catalog.table_names()?;
        self.sync.validate_structure(&tables)?;

        Ok(UpdateCounts {
            currencies: self.update_entity(Table::Currency)?,
            categories: self.update_entity(Table::Categories)?,
            offers: self.update_entity(Table::Offers)?,
        })
    }

    fn update_entity(&mut self, table: Table) -> Result<usize> {
        match table {
            Table::Currency => {
                let currencies = self.catalog.currencies()?;
                self.sync.upsert_currencies(&currencies)
            }
            Table::Categories => {
                let categories = self.catalog.categories()?;
                self.sync.upsert_categories(&categories)
            }
            Table::Offers => {
                let offers = self.catalog.offers()?;
                self.sync.upsert_offers(&offers)
            }
        }
    }

    /// Extracted records of one entity as pretty-printed JSON
    pub fn dump(&mut self, table_name: &str) -> Result<String> {
        let json = match table_name.parse::<Table>()? {
            Table::Currency => serde_json::to_string_pretty(&self.catalog.currencies()?)?,
            Table::Categories => serde_json::to_string_pretty(&self.catalog.categories()?)?,
            Table::Offers => serde_json::to_string_pretty(&self.catalog.offers()?)?,
        };
        Ok(json)
    }
}

impl UpdateCounts {
    pub fn summary(&self) -> String {
        format!(
            "All tables updated: {} currencies, {} categories, {} offers",
            self.currencies, self.categories, self.offers
        )
    }
}

fn join(tables: &[Table]) -> String {
    let names: Vec<&str> = tables.iter().map(|t| t.name()).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
