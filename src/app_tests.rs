//! Tests for App commands against a temporary SQLite database

use super::*;
use crate::database::CatalogDb;
use crate::error::SyncError;
use tempfile::TempDir;

const CATALOG: &str = r#"<yml_catalog date="2024-05-01 12:00"><shop>
  <currencies>
    <currency id="RUR" rate="1"/>
    <currency id="USD" rate="92.5"/>
  </currencies>
  <categories>
    <category id="1">Tools</category>
  </categories>
  <offers>
    <offer id="V1"><name>Drill</name><categoryId>1</categoryId><price>4999.90</price><currencyId>RUR</currencyId></offer>
    <offer id="V2"><name>Saw</name><price>1500</price><currencyId>USD</currencyId></offer>
    <offer><name>No vendor code</name></offer>
  </offers>
</shop></yml_catalog>"#;

fn test_app(xml: &str) -> (TempDir, App<CatalogDb>) {
    let dir = TempDir::new().unwrap();
    let db = CatalogDb::new(dir.path().join("catalog.db"));
    let app = App::new(CatalogSource::from_xml(xml).unwrap(), db);
    (dir, app)
}

#[test]
fn show_tables_lists_present_sections() {
    let (_dir, mut app) = test_app(CATALOG);
    assert_eq!(
        app.show_tables().unwrap(),
        "Tables in XML: [currency, categories, offers]"
    );

    let (_dir, mut empty) = test_app("<html><body/></html>");
    assert_eq!(empty.show_tables().unwrap(), "Tables in XML: []");
}

#[test]
fn show_ddl_and_columns() {
    let (_dir, app) = test_app(CATALOG);
    assert!(app
        .show_ddl("currency")
        .unwrap()
        .contains("CREATE TABLE IF NOT EXISTS currency"));

    let columns = app.show_columns("categories").unwrap();
    assert_eq!(
        columns,
        "Columns of categories:\n  - category_id (PRIMARY KEY)\n  - name"
    );

    assert!(matches!(app.show_ddl("products"), Err(SyncError::UnknownTable(_))));
    assert!(matches!(app.show_columns("products"), Err(SyncError::UnknownTable(_))));
}

#[test]
fn update_before_create_fails_validation() {
    let (_dir, mut app) = test_app(CATALOG);
    assert!(matches!(app.update_all(), Err(SyncError::SchemaMismatch { .. })));
    assert!(matches!(app.validate(), Err(SyncError::SchemaMismatch { .. })));
}

#[test]
fn create_validate_and_update_all() {
    let (_dir, mut app) = test_app(CATALOG);

    assert_eq!(
        app.create_tables().unwrap(),
        "Tables created/verified: [currency, categories, offers]"
    );
    assert_eq!(app.validate().unwrap(), "Database structure is valid");

    let counts = app.update_all().unwrap();
    assert_eq!(
        counts,
        UpdateCounts {
            currencies: 2,
            categories: 1,
            offers: 2,
        }
    );
    assert_eq!(
        counts.summary(),
        "All tables updated: 2 currencies, 1 categories, 2 offers"
    );

    // Running again updates in place
    assert_eq!(app.update_all().unwrap(), counts);
}

#[test]
fn update_single_table() {
    let (_dir, mut app) = test_app(CATALOG);
    app.create_tables().unwrap();

    assert_eq!(
        app.update_table("currency").unwrap(),
        "Table currency updated: 2 records"
    );
    assert!(matches!(
        app.update_table("prices"),
        Err(SyncError::UnknownTable(name)) if name == "prices"
    ));
}

#[test]
fn update_table_validates_all_feed_tables_first() {
    let (_dir, mut app) = test_app(CATALOG);
    app.synchronizer()
        .create_tables(&[Table::Currency])
        .unwrap();

    // categories and offers are in the feed but missing from the database
    assert!(matches!(
        app.update_table("currency"),
        Err(SyncError::SchemaMismatch { table, .. }) if table == "categories"
    ));
}

#[test]
fn update_with_bad_price_writes_no_offers() {
    let xml = r#"<shop><offers><offer id="V1"><price>free</price></offer></offers></shop>"#;
    let (_dir, mut app) = test_app(xml);
    app.create_tables().unwrap();

    assert!(matches!(
        app.update_table("offers"),
        Err(SyncError::NumericFormat { .. })
    ));
}

#[test]
fn dump_renders_records_as_json() {
    let (_dir, mut app) = test_app(CATALOG);

    let json: serde_json::Value = serde_json::from_str(&app.dump("offers").unwrap()).unwrap();
    assert_eq!(json[0]["vendorCode"], "V1");
    assert_eq!(json[0]["price"], "4999.90");
    assert_eq!(json[1]["categoryId"], serde_json::Value::Null);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let json: serde_json::Value = serde_json::from_str(&app.dump("currency").unwrap()).unwrap();
    assert_eq!(json[1]["code"], "USD");
}
