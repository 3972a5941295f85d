//! XPath evaluation over a [`Document`]
//!
//! Queries run on an `sxd-document` mirror of the owned tree, built per
//! query session. The mirror is mapped back so results are plain [`Node`]
//! handles into the shared document.

use crate::document::{Document, Node, NodeId, NodeKind};
use htmlstruct_core::error::{Error, Result};
use std::collections::HashMap;
use sxd_document::{dom, Package};
use sxd_xpath::nodeset::Node as SxdNode;
use sxd_xpath::{Context, Value};
use tracing::trace;

use crate::selector::XPath;

/// A read-only XPath view of one document
///
/// Obtain one with [`Document::query`]. Nodes returned from a session
/// borrow the document, not the session.
pub struct QueryTree<'doc, 'p> {
    document: &'doc Document,
    mirror: HashMap<NodeId, SxdNode<'p>>,
    origins: HashMap<SxdNode<'p>, NodeId>,
    context: Context<'p>,
}

impl<'doc, 'p> QueryTree<'doc, 'p> {
    fn build(document: &'doc Document, package: &'p Package) -> Self {
        let target = package.as_document();
        let mut tree = Self {
            document,
            mirror: HashMap::with_capacity(document.len()),
            origins: HashMap::with_capacity(document.len()),
            context: Context::new(),
        };

        let root = target.root();
        tree.record(NodeId::tree(0), SxdNode::from(root));
        let mut elements: HashMap<usize, dom::Element<'p>> = HashMap::new();

        for index in 1..document.len() {
            let data = &document.nodes[index];
            let Some(parent) = data.parent else {
                continue;
            };
            let parent_element = elements.get(&parent).copied();
            // nodes under a skipped parent (doctype) have nowhere to go
            if parent != 0 && parent_element.is_none() {
                continue;
            }

            let mirrored: SxdNode<'p> = match &data.kind {
                NodeKind::Element { name, attributes } => {
                    let element = target.create_element(name.as_str());
                    for (k, attribute) in attributes.iter().enumerate() {
                        let attr = element
                            .set_attribute_value(attribute.name.as_str(), &attribute.value);
                        tree.record(NodeId::attribute(index, k), SxdNode::from(attr));
                    }
                    match parent_element {
                        Some(owner) => owner.append_child(element),
                        None => root.append_child(element),
                    }
                    elements.insert(index, element);
                    SxdNode::from(element)
                }
                NodeKind::Text(text) => match parent_element {
                    Some(owner) => {
                        let node = target.create_text(text);
                        owner.append_child(node);
                        SxdNode::from(node)
                    }
                    None => continue,
                },
                NodeKind::Comment(text) => {
                    let node = target.create_comment(text);
                    match parent_element {
                        Some(owner) => owner.append_child(node),
                        None => root.append_child(node),
                    }
                    SxdNode::from(node)
                }
                NodeKind::Document | NodeKind::Other => continue,
            };
            tree.record(NodeId::tree(index), mirrored);
        }

        tree
    }

    fn record(&mut self, id: NodeId, node: SxdNode<'p>) {
        self.mirror.insert(id, node);
        self.origins.insert(node, id);
    }

    /// All nodes matched by `xpath` from `scope`, in document order
    pub fn select(&self, scope: Node<'doc>, xpath: &XPath) -> Result<Vec<Node<'doc>>> {
        if !std::ptr::eq(scope.document(), self.document) {
            return Err(Error::selector(
                xpath.as_str(),
                "scope node belongs to another document",
            ));
        }
        let Some(&start) = self.mirror.get(&scope.id) else {
            return Err(Error::selector(
                xpath.as_str(),
                format!("{scope:?} cannot be used as a query scope"),
            ));
        };

        let value = xpath
            .compiled()
            .evaluate(&self.context, start)
            .map_err(|e| Error::selector(xpath.as_str(), e.to_string()))?;

        let nodeset = match value {
            Value::Nodeset(nodeset) => nodeset,
            Value::Boolean(_) => return Err(not_a_nodeset(xpath, "boolean")),
            Value::Number(_) => return Err(not_a_nodeset(xpath, "number")),
            Value::String(_) => return Err(not_a_nodeset(xpath, "string")),
        };

        let mut ids: Vec<NodeId> = nodeset
            .document_order()
            .into_iter()
            .filter_map(|node| self.origins.get(&node).copied())
            .collect();
        ids.sort();
        ids.dedup();
        trace!(selector = %xpath, matches = ids.len(), "evaluated selector");

        Ok(ids
            .into_iter()
            .map(|id| Node {
                doc: self.document,
                id,
            })
            .collect())
    }

    /// First node in document order matched by `xpath` from `scope`
    pub fn select_one(&self, scope: Node<'doc>, xpath: &XPath) -> Result<Option<Node<'doc>>> {
        Ok(self.select(scope, xpath)?.into_iter().next())
    }
}

fn not_a_nodeset(xpath: &XPath, kind: &str) -> Error {
    Error::selector(
        xpath.as_str(),
        format!("expression yields a {kind}, not a node-set"),
    )
}

impl Document {
    /// Run queries against this document
    ///
    /// The XPath view is built once for the duration of `f`, so a batch of
    /// selectors shares it.
    pub fn query<'doc, T>(&'doc self, f: impl for<'p> FnOnce(&QueryTree<'doc, 'p>) -> T) -> T {
        let package = Package::new();
        let tree = QueryTree::build(self, &package);
        f(&tree)
    }
}
