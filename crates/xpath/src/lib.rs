#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! HTML parsing and XPath selection for htmlstruct
//!
//! Documents are parsed once into an immutable tree that can be shared
//! across threads. Selectors are XPath 1.0, evaluated by `sxd-xpath` over a
//! per-query mirror of the tree.

mod document;
mod query;
mod selector;

pub use document::{Document, Node, NodeType, ParseOptions};
pub use query::QueryTree;
pub use selector::XPath;

use htmlstruct_core::error::Result;

/// Parse HTML text into a document with lenient error recovery
pub fn parse(html: &str) -> Result<Document> {
    Document::parse(html)
}

/// First node matching `selector` under `node`, or `None`
pub fn find_one<'a>(node: Node<'a>, selector: &str) -> Result<Option<Node<'a>>> {
    XPath::compile(selector)?.select_one(node)
}

/// Every node matching `selector` under `node`, in document order
pub fn find_all<'a>(node: Node<'a>, selector: &str) -> Result<Vec<Node<'a>>> {
    XPath::compile(selector)?.select(node)
}

/// Concatenated text content of a node
pub fn inner_text(node: Node<'_>) -> String {
    document::inner_text(node)
}
