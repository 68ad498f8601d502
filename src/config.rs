//! Runtime configuration: feed location and database path

use clap::Args;
use std::path::{Path, PathBuf};

/// Connection settings shared by every command.
///
/// Flags override the `XML_URL` and `DATABASE_PATH` environment variables.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// URL (http, https or file) or path of the YML catalog feed
    #[arg(short, long, env = "XML_URL")]
    pub source: String,

    /// Path to the SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value_os_t = default_db_path())]
    pub database: PathBuf,
}

/// Returns the default database path: ~/.local/share/yml_catalog_sync/catalog.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yml_catalog_sync")
        .join("catalog.db")
}

/// Create the parent directory of the database file if it is missing
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            log::info!("Created directory: {}", parent.display());
        }
    }
    Ok(())
}
