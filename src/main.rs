//! YML Catalog Sync - product feed to SQLite
//!
//! Runs a single command when one is given, otherwise the interactive menu.

use clap::{Parser, Subcommand};
use std::io;
use yml_catalog_sync::config::ensure_parent_dir;
use yml_catalog_sync::menu::Menu;
use yml_catalog_sync::{App, CatalogDb, CatalogSource, Config};

/// Sync currencies, categories and offers from a YML catalog feed into SQLite
#[derive(Parser, Debug)]
#[command(name = "yml-catalog-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tables present in the feed
    Tables,
    /// Print the CREATE TABLE statement of a table
    Ddl { table: String },
    /// Create the feed's tables in the database
    Create,
    /// Check that the database tables have the expected columns
    Validate,
    /// Upsert one table, or all of them when no table is given
    Update { table: Option<String> },
    /// Show the columns of a table
    Columns { table: String },
    /// Print the records extracted for a table as JSON
    Dump { table: String },
}

impl Command {
    /// Commands that open the database; the rest only read the feed
    fn uses_database(&self) -> bool {
        match self {
            Command::Create | Command::Validate | Command::Update { .. } => true,
            Command::Tables | Command::Ddl { .. } | Command::Columns { .. } | Command::Dump { .. } => {
                false
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("Source: {}", cli.config.source);
    log::debug!("Database path: {}", cli.config.database.display());

    // The menu may reach any command, so it needs the directory too
    let needs_database = cli.command.as_ref().map_or(true, Command::uses_database);
    if needs_database {
        if let Err(e) = ensure_parent_dir(&cli.config.database) {
            log::error!("Failed to create database directory: {}", e);
            std::process::exit(1);
        }
    }

    let mut app = App::new(
        CatalogSource::new(cli.config.source.clone()),
        CatalogDb::new(&cli.config.database),
    );

    let Some(command) = cli.command else {
        let stdin = io::stdin();
        let mut menu = Menu::new(&mut app, stdin.lock(), io::stdout());
        if let Err(e) = menu.run() {
            log::error!("Terminal error: {}", e);
            std::process::exit(1);
        }
        return;
    };

    let result = match command {
        Command::Tables => app.show_tables(),
        Command::Ddl { table } => app.show_ddl(&table),
        Command::Create => app.create_tables(),
        Command::Validate => app.validate(),
        Command::Update { table: Some(table) } => app.update_table(&table),
        Command::Update { table: None } => app.update_all().map(|counts| counts.summary()),
        Command::Columns { table } => app.show_columns(&table),
        Command::Dump { table } => app.dump(&table),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let base = ["yml-catalog-sync", "--source", "feed.xml"];
        Cli::try_parse_from(base.into_iter().chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn only_writing_commands_use_the_database() {
        for args in [&["create"][..], &["validate"], &["update"], &["update", "offers"]] {
            let command = parse(args).command.unwrap();
            assert!(command.uses_database(), "{:?}", args);
        }

        for args in [&["tables"][..], &["ddl", "offers"], &["columns", "offers"], &["dump", "offers"]] {
            let command = parse(args).command.unwrap();
            assert!(!command.uses_database(), "{:?}", args);
        }
    }

    #[test]
    fn no_command_opens_the_menu() {
        assert!(parse(&[]).command.is_none());
    }
}
