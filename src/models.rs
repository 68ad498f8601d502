//! Catalog records extracted from the feed
//!
//! Records are plain values: relations between offers, categories and
//! currencies are carried as id strings and resolved by the database.

use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};

/// Currency with its exchange rate (`<currency id=".." rate=".."/>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: String,
    #[serde(serialize_with = "plain_decimal")]
    pub rate: BigDecimal,
}

/// Catalog category (`<category id="..">name</category>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Catalog offer keyed by vendor code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub vendor_code: String,
    pub name: String,
    pub category_id: Option<String>,
    #[serde(serialize_with = "plain_optional_decimal")]
    pub price: Option<BigDecimal>,
    pub currency_code: Option<String>,
}

/// Decimals are written as plain digit strings, never in exponent form
fn plain_decimal<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_plain_string())
}

fn plain_optional_decimal<S: Serializer>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => plain_decimal(v, serializer),
        None => serializer.serialize_none(),
    }
}
