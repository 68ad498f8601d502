//! YML catalog feed: loading, shop lookup and record extraction

mod extract;
mod node;
mod source;

pub use extract::{categories, currencies, locate_shop, offers, table_names};
pub use node::XmlNode;
pub use source::CatalogSource;
