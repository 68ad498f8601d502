//! Owned XML element tree with lookup helpers
//!
//! The parsed `roxmltree` document borrows its input, so the catalog is copied
//! into this owned form once and cached by [`super::CatalogSource`].

use crate::error::Result;

/// An XML element (or the synthetic document node at the top of the tree)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    content: Vec<XmlContent>,
}

/// Direct content of an element, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlContent {
    Element(XmlNode),
    Text(String),
}

impl XmlNode {
    /// Parse an XML document into an owned tree.
    ///
    /// The returned node is the document itself: its only child is the root
    /// element. DTDs are accepted but never loaded and nothing is validated.
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options)?;

        Ok(XmlNode {
            name: String::new(),
            attributes: Vec::new(),
            content: vec![XmlContent::Element(Self::from_element(doc.root_element()))],
        })
    }

    fn from_element(node: roxmltree::Node<'_, '_>) -> XmlNode {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();
        let content = node
            .children()
            .filter_map(|c| {
                if c.is_element() {
                    Some(XmlContent::Element(Self::from_element(c)))
                } else if c.is_text() {
                    c.text().map(|t| XmlContent::Text(t.to_string()))
                } else {
                    None
                }
            })
            .collect();

        XmlNode {
            name: node.tag_name().name().to_string(),
            attributes,
            content,
        }
    }

    /// Local element name (namespace prefix stripped)
    pub fn name(&self) -> &str {
        &self.name
    }

    fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(e) => Some(e),
            XmlContent::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.elements().filter(move |c| c.name == name)
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value trimmed, `None` when missing or blank
    pub fn trimmed_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Concatenated text of this element and all its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for item in &self.content {
            match item {
                XmlContent::Text(t) => out.push_str(t),
                XmlContent::Element(e) => e.push_text(out),
            }
        }
    }

    /// Trimmed text of the first child with the given name, `None` when the
    /// child is missing or its text is blank
    pub fn child_text(&self, name: &str) -> Option<String> {
        let text = self.child(name)?.text();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// An element counts as empty when it has neither child elements nor
    /// non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|c| match c {
            XmlContent::Element(_) => false,
            XmlContent::Text(t) => t.trim().is_empty(),
        })
    }

    /// Child with the given name, only if it is present and non-empty
    pub fn non_empty_child(&self, name: &str) -> Option<&XmlNode> {
        self.child(name).filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wraps_root_element_in_document_node() {
        let doc = XmlNode::parse("<shop><name>Store</name></shop>").unwrap();
        assert_eq!(doc.name(), "");
        let shop = doc.child("shop").unwrap();
        assert_eq!(shop.child_text("name").as_deref(), Some("Store"));
    }

    #[test]
    fn attributes_are_trimmed_and_blank_means_missing() {
        let doc = XmlNode::parse(r#"<currency id=" USD " rate="  "/>"#).unwrap();
        let currency = doc.child("currency").unwrap();
        assert_eq!(currency.attr("id"), Some(" USD "));
        assert_eq!(currency.trimmed_attr("id"), Some("USD"));
        assert_eq!(currency.trimmed_attr("rate"), None);
        assert_eq!(currency.trimmed_attr("missing"), None);
    }

    #[test]
    fn text_includes_nested_descendants_in_order() {
        let doc =
            XmlNode::parse("<category id=\"1\">Power <b>Tools</b> &amp; more</category>").unwrap();
        assert_eq!(doc.child("category").unwrap().text(), "Power Tools & more");
    }

    #[test]
    fn only_leaf_elements_hold_text() {
        let doc = XmlNode::parse("<shop><offers><offer id=\"1\"><name>Drill</name></offer></offers></shop>")
            .unwrap();
        let shop = doc.child("shop").unwrap();
        assert!(shop
            .content
            .iter()
            .all(|c| matches!(c, XmlContent::Element(_))));
        assert_eq!(shop.text(), "Drill");
    }

    #[test]
    fn blank_child_text_is_none() {
        let doc = XmlNode::parse("<offer><price>  </price><name/></offer>").unwrap();
        let offer = doc.child("offer").unwrap();
        assert_eq!(offer.child_text("price"), None);
        assert_eq!(offer.child_text("name"), None);
        assert_eq!(offer.child_text("absent"), None);
    }

    #[test]
    fn empty_element_detection() {
        let doc = XmlNode::parse("<shop><offers/><currencies>\n  </currencies><categories><category/></categories></shop>")
            .unwrap();
        let shop = doc.child("shop").unwrap();
        assert!(shop.non_empty_child("offers").is_none());
        assert!(shop.non_empty_child("currencies").is_none());
        assert!(shop.non_empty_child("categories").is_some());
    }

    #[test]
    fn children_named_keeps_document_order() {
        let doc = XmlNode::parse("<list><item>a</item><other/><item>b</item></list>").unwrap();
        let items: Vec<String> = doc
            .child("list")
            .unwrap()
            .children_named("item")
            .map(XmlNode::text)
            .collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn namespace_prefixes_are_ignored() {
        let doc = XmlNode::parse(r#"<y:shop xmlns:y="urn:yml"><y:offers/></y:shop>"#).unwrap();
        assert!(doc.child("shop").unwrap().child("offers").is_some());
    }

    #[test]
    fn doctype_is_accepted_without_loading() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE yml_catalog SYSTEM "shops.dtd">
<yml_catalog date="2024-05-01 12:00"><shop/></yml_catalog>"#;
        let doc = XmlNode::parse(xml).unwrap();
        assert!(doc.child("yml_catalog").unwrap().child("shop").is_some());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(XmlNode::parse("<shop><offers></shop>").is_err());
        assert!(XmlNode::parse("").is_err());
    }
}
