//! Fetching the feed and caching its parsed tree

use super::extract;
use super::node::XmlNode;
use crate::error::{Result, SyncError};
use crate::models::{Category, Currency, Offer};
use crate::schema::Table;

/// A catalog feed identified by URL or path.
///
/// The document is fetched and parsed on first use and kept for the lifetime
/// of the source; extraction re-reads the cached tree on every call.
pub struct CatalogSource {
    location: String,
    root: Option<XmlNode>,
}

impl CatalogSource {
    /// Source backed by an `http(s)://` URL, a `file://` URL or a plain path
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            root: None,
        }
    }

    /// Source built from an in-memory document, parsed immediately
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(Self {
            location: "<memory>".to_string(),
            root: Some(XmlNode::parse(xml)?),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether the document has already been fetched and parsed
    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    /// Parsed document, loading it on first access
    pub fn document(&mut self) -> Result<&XmlNode> {
        let root = match self.root.take() {
            Some(root) => root,
            None => {
                let xml = fetch(&self.location)?;
                log::info!("Fetched catalog from {} ({} bytes)", self.location, xml.len());
                XmlNode::parse(&xml)?
            }
        };
        let root: &XmlNode = self.root.insert(root);
        Ok(root)
    }

    /// The shop element, `None` when neither root shape matches
    pub fn shop(&mut self) -> Result<Option<&XmlNode>> {
        Ok(extract::locate_shop(self.document()?))
    }

    /// Tables present in the feed, always in currency, categories, offers order
    pub fn table_names(&mut self) -> Result<Vec<Table>> {
        Ok(extract::table_names(self.shop()?))
    }

    pub fn currencies(&mut self) -> Result<Vec<Currency>> {
        match self.shop()? {
            Some(shop) => extract::currencies(shop),
            None => Ok(Vec::new()),
        }
    }

    pub fn categories(&mut self) -> Result<Vec<Category>> {
        Ok(self.shop()?.map(extract::categories).unwrap_or_default())
    }

    pub fn offers(&mut self) -> Result<Vec<Offer>> {
        match self.shop()? {
            Some(shop) => extract::offers(shop),
            None => Ok(Vec::new()),
        }
    }
}

/// Read the raw feed text from the network or the filesystem
fn fetch(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return fetch_http(location);
    }

    let path = location.strip_prefix("file://").unwrap_or(location);
    log::debug!("Reading catalog file: {}", path);
    let bytes = std::fs::read(path).map_err(|e| SyncError::unavailable(location, e))?;
    Ok(decode(&bytes))
}

fn fetch_http(url: &str) -> Result<String> {
    log::info!("Fetching catalog from: {}", url);

    let response = reqwest::blocking::Client::new()
        .get(url)
        .header("User-Agent", "yml_catalog_sync/1.0")
        .send()
        .map_err(|e| SyncError::unavailable(url, e))?;

    if !response.status().is_success() {
        return Err(SyncError::unavailable(
            url,
            format!("HTTP error: {}", response.status()),
        ));
    }

    let bytes = response
        .bytes()
        .map_err(|e| SyncError::unavailable(url, e))?;
    Ok(decode(&bytes))
}

/// UTF-8 text with any byte-order mark removed
fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
