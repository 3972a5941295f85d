//! Owned, immutable HTML document tree
//!
//! HTML is parsed with `scraper` (html5ever) and copied into a flat arena in
//! document order, so a parsed document can be shared read-only across
//! threads and queried without borrowing the parser's tree.

use htmlstruct_core::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Options controlling how HTML text is accepted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject input the parser had to repair
    pub strict: bool,
    /// Reject input larger than this many bytes
    pub max_document_bytes: Option<usize>,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = Some(limit);
        self
    }
}

/// The kind of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    Attribute,
    /// Doctype and processing instructions
    Other,
}

#[derive(Debug, Clone)]
pub(crate) struct Attribute {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Element {
        name: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    Other,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    /// Index of the last node in this node's subtree
    pub(crate) subtree_end: usize,
}

/// A parsed HTML document
#[derive(Clone)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
}

impl Document {
    /// Parse a full HTML document with default (lenient) options
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with(html, &ParseOptions::default())
    }

    /// Parse a full HTML document
    pub fn parse_with(html: &str, options: &ParseOptions) -> Result<Self> {
        check_size(html, options)?;
        let parsed = scraper::Html::parse_document(html);
        Self::accept(parsed, options)
    }

    /// Parse an HTML fragment
    pub fn parse_fragment(html: &str) -> Result<Self> {
        Self::parse_fragment_with(html, &ParseOptions::default())
    }

    /// Parse an HTML fragment
    pub fn parse_fragment_with(html: &str, options: &ParseOptions) -> Result<Self> {
        check_size(html, options)?;
        let parsed = scraper::Html::parse_fragment(html);
        Self::accept(parsed, options)
    }

    fn accept(parsed: scraper::Html, options: &ParseOptions) -> Result<Self> {
        if options.strict && !parsed.errors.is_empty() {
            return Err(Error::parse(parsed.errors.join("; ")));
        }
        let document = Self::from_html(&parsed);
        debug!(
            nodes = document.nodes.len(),
            repaired = parsed.errors.len(),
            "Parsed HTML document"
        );
        Ok(document)
    }

    fn from_html(html: &scraper::Html) -> Self {
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut positions: HashMap<_, usize> = HashMap::new();

        for node in html.tree.root().descendants() {
            let index = nodes.len();
            let parent = node
                .parent()
                .and_then(|p| positions.get(&p.id()).copied());

            let kind = match node.value() {
                scraper::Node::Document | scraper::Node::Fragment => NodeKind::Document,
                scraper::Node::Element(element) => NodeKind::Element {
                    name: element.name().to_string(),
                    attributes: element
                        .attrs()
                        .map(|(name, value)| Attribute {
                            name: name.to_string(),
                            value: value.to_string(),
                        })
                        .collect(),
                },
                scraper::Node::Text(text) => NodeKind::Text(text.to_string()),
                scraper::Node::Comment(comment) => NodeKind::Comment(comment.to_string()),
                _ => NodeKind::Other,
            };

            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }
            positions.insert(node.id(), index);
            nodes.push(NodeData {
                kind,
                parent,
                children: Vec::new(),
                subtree_end: index,
            });
        }

        // Children always follow their parent, so a reverse sweep sees every
        // child's extent before the parent's.
        for index in (0..nodes.len()).rev() {
            if let Some(&last) = nodes[index].children.last() {
                nodes[index].subtree_end = nodes[last].subtree_end;
            }
        }

        Self { nodes }
    }

    /// The document root node
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: NodeId::tree(0),
        }
    }

    /// Number of tree nodes, attributes excluded
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, index: usize) -> Node<'_> {
        Node {
            doc: self,
            id: NodeId::tree(index),
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

fn check_size(html: &str, options: &ParseOptions) -> Result<()> {
    match options.max_document_bytes {
        Some(limit) if html.len() > limit => Err(Error::parse(format!(
            "document is {} bytes, limit is {limit}",
            html.len()
        ))),
        _ => Ok(()),
    }
}

/// Position of a node: tree index, then 0 for the node itself or k + 1 for
/// its k-th attribute. Ordering is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId {
    pub(crate) index: usize,
    pub(crate) slot: usize,
}

impl NodeId {
    pub(crate) fn tree(index: usize) -> Self {
        Self { index, slot: 0 }
    }

    pub(crate) fn attribute(owner: usize, position: usize) -> Self {
        Self {
            index: owner,
            slot: position + 1,
        }
    }
}

/// A handle to a node within a [`Document`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.id.index]
    }

    pub(crate) fn attribute_data(&self) -> Option<&'a Attribute> {
        match (self.id.slot, &self.data().kind) {
            (0, _) => None,
            (slot, NodeKind::Element { attributes, .. }) => attributes.get(slot - 1),
            _ => None,
        }
    }

    /// The document this node belongs to
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node_type(&self) -> NodeType {
        if self.id.slot > 0 {
            return NodeType::Attribute;
        }
        match self.data().kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Other => NodeType::Other,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Element or attribute name; empty for other nodes
    pub fn name(&self) -> &'a str {
        if let Some(attribute) = self.attribute_data() {
            return &attribute.name;
        }
        match &self.data().kind {
            NodeKind::Element { name, .. } => name,
            _ => "",
        }
    }

    /// Value of an attribute on this element
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        if self.id.slot > 0 {
            return None;
        }
        match &self.data().kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Parent node; an attribute's parent is its owner element
    pub fn parent(&self) -> Option<Node<'a>> {
        if self.id.slot > 0 {
            return Some(self.doc.node(self.id.index));
        }
        self.data().parent.map(|p| self.doc.node(p))
    }

    /// Child nodes in document order
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        let children: &'a [usize] = if self.id.slot > 0 {
            &[]
        } else {
            &self.data().children
        };
        children.iter().map(move |&c| doc.node(c))
    }

    /// Attribute nodes of this element
    pub fn attributes(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        let owner = self.id.index;
        let count = match (self.id.slot, &self.data().kind) {
            (0, NodeKind::Element { attributes, .. }) => attributes.len(),
            _ => 0,
        };
        (0..count).map(move |k| Node {
            doc,
            id: NodeId::attribute(owner, k),
        })
    }

    /// Concatenated text content
    ///
    /// Elements and the document yield the text of every descendant text
    /// node; text and comment nodes yield their data; attributes their value.
    pub fn inner_text(&self) -> String {
        if let Some(attribute) = self.attribute_data() {
            return attribute.value.clone();
        }
        let data = self.data();
        match &data.kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            NodeKind::Other => String::new(),
            NodeKind::Document | NodeKind::Element { .. } => {
                let mut out = String::new();
                for index in self.id.index + 1..=data.subtree_end {
                    if let NodeKind::Text(text) = &self.doc.nodes[index].kind {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_type() {
            NodeType::Element => write!(f, "<{}>", self.name()),
            NodeType::Attribute => write!(f, "@{}={:?}", self.name(), self.inner_text()),
            NodeType::Text => write!(f, "text({:?})", self.inner_text()),
            NodeType::Comment => write!(f, "comment({:?})", self.inner_text()),
            NodeType::Document => write!(f, "document"),
            NodeType::Other => write!(f, "other"),
        }
    }
}

/// Text content of a node
pub fn inner_text(node: Node<'_>) -> String {
    node.inner_text()
}
