//! Selector resolution against a document or sub-tree

use htmlstruct_core::error::Result;
use htmlstruct_core::{FieldDescriptor, TagIndex};
use htmlstruct_xpath::{Node, QueryTree, XPath};
use tracing::trace;

/// First node matched by `selector` under `scope`
///
/// No match is `Ok(None)`, not an error.
pub fn resolve_one<'doc>(
    tree: &QueryTree<'doc, '_>,
    scope: Node<'doc>,
    selector: &XPath,
) -> Result<Option<Node<'doc>>> {
    tree.select_one(scope, selector)
}

/// Every node matched by `selector` under `scope`, in document order
pub fn resolve_all<'doc>(
    tree: &QueryTree<'doc, '_>,
    scope: Node<'doc>,
    selector: &XPath,
) -> Result<Vec<Node<'doc>>> {
    tree.select(scope, selector)
}

/// A field paired with its compiled selector
#[derive(Debug)]
pub struct FieldSelector {
    pub field: &'static FieldDescriptor,
    pub xpath: XPath,
}

/// Compile the extractable entries of a tag index
///
/// Excluded (`"-"`) and related (`"[..]"`) selectors are skipped without
/// being compiled.
pub fn compile_fields(index: &TagIndex) -> Result<Vec<FieldSelector>> {
    let mut compiled = Vec::with_capacity(index.len());
    for entry in index.iter() {
        if !htmlstruct_core::is_extractable(&entry.selector) {
            trace!(field = entry.name(), selector = %entry.selector, "skipping field");
            continue;
        }
        compiled.push(FieldSelector {
            field: entry.field,
            xpath: XPath::compile(&entry.selector)?,
        });
    }
    Ok(compiled)
}
