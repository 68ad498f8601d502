//! Locating the shop node and extracting typed records from it
//!
//! Missing structure (no shop, no section, no identity) yields fewer records.
//! A decimal that is present but unparsable aborts the extraction.

use super::node::XmlNode;
use crate::error::{Result, SyncError};
use crate::models::{Category, Currency, Offer};
use crate::schema::Table;
use bigdecimal::{BigDecimal, Signed};
use std::str::FromStr;

type ShopLookup = fn(&XmlNode) -> Option<&XmlNode>;

/// Root shapes tried in order: `<shop>` and `<yml_catalog><shop>`
const SHOP_LOOKUPS: [ShopLookup; 2] = [bare_shop, wrapped_shop];

fn bare_shop(doc: &XmlNode) -> Option<&XmlNode> {
    doc.non_empty_child("shop")
}

fn wrapped_shop(doc: &XmlNode) -> Option<&XmlNode> {
    doc.child("yml_catalog")?.non_empty_child("shop")
}

/// Find the shop element under either supported root shape
pub fn locate_shop(doc: &XmlNode) -> Option<&XmlNode> {
    SHOP_LOOKUPS.iter().find_map(|lookup| lookup(doc))
}

/// Tables whose sections are present and non-empty, in fixed order
pub fn table_names(shop: Option<&XmlNode>) -> Vec<Table> {
    let Some(shop) = shop else {
        return Vec::new();
    };

    Table::ALL
        .into_iter()
        .filter(|table| shop.non_empty_child(section_name(*table)).is_some())
        .collect()
}

/// Name of the shop section that feeds a table
fn section_name(table: Table) -> &'static str {
    match table {
        Table::Currency => "currencies",
        Table::Categories => "categories",
        Table::Offers => "offers",
    }
}

/// Items of one shop section, e.g. every `<offer>` under `<offers>`
fn section_items<'a>(shop: &'a XmlNode, table: Table, item: &'a str) -> Vec<&'a XmlNode> {
    shop.child(section_name(table))
        .map(|section| section.children_named(item).collect())
        .unwrap_or_default()
}

/// Exact decimal of any size: sign, digits, optional fraction and exponent.
///
/// Digit separators such as `1_000` are rejected.
fn parse_decimal(
    entity: &'static str,
    field: &'static str,
    id: &str,
    value: &str,
) -> Result<BigDecimal> {
    let numeric_format = || SyncError::NumericFormat {
        entity,
        field,
        id: id.to_string(),
        value: value.to_string(),
    };

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    if !value.chars().all(allowed) || !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(numeric_format());
    }
    BigDecimal::from_str(value).map_err(|_| numeric_format())
}

/// `<currencies><currency id="USD" rate="1"/>...</currencies>`
pub fn currencies(shop: &XmlNode) -> Result<Vec<Currency>> {
    let mut currencies = Vec::new();

    for node in section_items(shop, Table::Currency, "currency") {
        let (Some(code), Some(rate_text)) = (node.trimmed_attr("id"), node.trimmed_attr("rate"))
        else {
            log::debug!("Skipping currency without id or rate: {:?}", node.attr("id"));
            continue;
        };

        let rate = parse_decimal("currency", "rate", code, rate_text)?;
        if rate.is_negative() {
            return Err(SyncError::NumericFormat {
                entity: "currency",
                field: "rate",
                id: code.to_string(),
                value: rate_text.to_string(),
            });
        }

        currencies.push(Currency {
            code: code.to_string(),
            rate,
        });
    }

    log::info!("Extracted {} currencies", currencies.len());
    Ok(currencies)
}

/// `<categories><category id="1">Name</category>...</categories>`
pub fn categories(shop: &XmlNode) -> Vec<Category> {
    let categories: Vec<Category> = section_items(shop, Table::Categories, "category")
        .into_iter()
        .filter_map(|node| {
            let id = node.trimmed_attr("id");
            let text = node.text();
            let name = text.trim();
            match id {
                Some(id) if !name.is_empty() => Some(Category {
                    id: id.to_string(),
                    name: name.to_string(),
                }),
                _ => {
                    log::debug!("Skipping category without id or name: {:?}", node.attr("id"));
                    None
                }
            }
        })
        .collect();

    log::info!("Extracted {} categories", categories.len());
    categories
}

/// `<offers><offer id="V1"><name/><categoryId/><price/><currencyId/></offer>...</offers>`
pub fn offers(shop: &XmlNode) -> Result<Vec<Offer>> {
    let mut offers = Vec::new();

    for node in section_items(shop, Table::Offers, "offer") {
        let Some(vendor_code) = node.trimmed_attr("id") else {
            log::debug!("Skipping offer without id");
            continue;
        };

        let price = node
            .child_text("price")
            .map(|p| parse_decimal("offer", "price", vendor_code, &p))
            .transpose()?;

        offers.push(Offer {
            vendor_code: vendor_code.to_string(),
            name: node.child_text("name").unwrap_or_default(),
            category_id: node.child_text("categoryId"),
            price,
            currency_code: node.child_text("currencyId"),
        });
    }

    log::info!("Extracted {} offers", offers.len());
    Ok(offers)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
