//! Compiled XPath selectors

use crate::document::Node;
use htmlstruct_core::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use sxd_xpath::Factory;

/// An XPath 1.0 expression compiled once and evaluated against any node
///
/// Selection must yield a node-set; expressions producing a string, number
/// or boolean are rejected at evaluation time.
pub struct XPath {
    source: String,
    compiled: sxd_xpath::XPath,
}

impl XPath {
    /// Compile an expression
    pub fn compile(source: &str) -> Result<Self> {
        let compiled = Factory::new()
            .build(source)
            .map_err(|e| Error::selector(source, e.to_string()))?
            .ok_or_else(|| Error::selector(source, "empty expression"))?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }

    /// The expression text this selector was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn compiled(&self) -> &sxd_xpath::XPath {
        &self.compiled
    }

    /// All nodes matched from `node`, in document order
    ///
    /// Builds a query view of the node's document for this one call; use
    /// [`Document::query`](crate::Document::query) to run several selectors.
    pub fn select<'a>(&self, node: Node<'a>) -> Result<Vec<Node<'a>>> {
        node.document().query(|tree| tree.select(node, self))
    }

    /// The first node matched from `node` in document order
    pub fn select_one<'a>(&self, node: Node<'a>) -> Result<Option<Node<'a>>> {
        Ok(self.select(node)?.into_iter().next())
    }
}

impl FromStr for XPath {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::compile(source)
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl fmt::Debug for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("XPath").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_error_names_selector() {
        let err = XPath::compile("//div[").unwrap_err();
        match err {
            Error::Selector { selector, .. } => assert_eq!(selector, "//div["),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_expression_is_rejected() {
        assert!(matches!(
            XPath::compile(""),
            Err(Error::Selector { .. })
        ));
    }

    #[test]
    fn test_select_one_picks_first_in_document_order() {
        let doc = Document::parse("<p>1</p><p>2</p>").unwrap();
        let xpath: XPath = "//p".parse().unwrap();
        let first = xpath.select_one(doc.root()).unwrap().unwrap();
        assert_eq!(first.inner_text(), "1");
        assert_eq!(xpath.to_string(), "//p");
    }

    #[test]
    fn test_no_match_is_empty() {
        let doc = Document::parse("<p>1</p>").unwrap();
        let xpath = XPath::compile("//table").unwrap();
        assert!(xpath.select(doc.root()).unwrap().is_empty());
        assert!(xpath.select_one(doc.root()).unwrap().is_none());
    }
}
