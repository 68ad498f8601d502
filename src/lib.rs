//! YML Catalog Sync - product feed to SQLite
//!
//! Loads a YML/XML catalog feed (currencies, categories, offers) and keeps a
//! SQLite database in step with it through idempotent upserts.

pub mod app;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod menu;
pub mod models;
pub mod schema;
pub mod sync;

pub use app::{App, UpdateCounts};
pub use catalog::CatalogSource;
pub use config::Config;
pub use database::CatalogDb;
pub use error::{Result, SyncError};
pub use models::{Category, Currency, Offer};
pub use schema::Table;
pub use sync::{Destination, Synchronizer};
