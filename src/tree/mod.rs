//! Arena-based node graph.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the `Document`
//! and are referenced by `NodeId`, a newtype over `NonZeroU32`. Namespaces
//! live in a second table indexed by `NsId`; elements point at the namespace
//! their prefix resolved to and list the declarations they introduce.
//!
//! The graph is built once by a parser (or by hand through
//! [`Document::create_node`] and [`Document::append_child`]) and is then only
//! read. Every read accessor takes a `NodeId` and answers `None` or an empty
//! sequence for ids that do not resolve in this arena, so a stale or foreign
//! handle can never bring a traversal down.
//!
//! Sibling chains are assumed to be acyclic. Parsers only ever append, so
//! this holds for every graph the crate builds.

mod node;

pub use node::{NodeKind, NodeType};

use crate::error::ParseDiagnostic;
use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().and_then(NonZeroU32::new).map(Self)
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Returns the raw, always non-zero, index of this id.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw index, or `None` for 0.
    ///
    /// The id is not checked against any document; lookups with an id that
    /// is out of range simply come back empty.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// An index into the document's namespace table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NsId(u32);

/// A namespace binding: an optional prefix and the URI it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// The prefix as raw bytes (`ns` in `xmlns:ns`), `None` for the default
    /// namespace.
    pub prefix: Option<Box<[u8]>>,
    /// The namespace URI. Empty for `xmlns=""`, which undeclares the default
    /// namespace.
    pub uri: String,
}

impl Namespace {
    /// Returns the prefix as text, if present and valid UTF-8.
    #[must_use]
    pub fn prefix_str(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .and_then(|p| std::str::from_utf8(p).ok())
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node. The document node has none.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The local name (`lang` for `xml:lang`).
    pub name: String,
    /// The value, with references resolved.
    pub value: String,
    /// Namespace prefix, if any.
    pub prefix: Option<String>,
    /// Namespace URI after resolution, if any.
    pub namespace: Option<String>,
}

impl Attribute {
    /// Creates an unprefixed attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            prefix: None,
            namespace: None,
        }
    }
}

/// A parsed XML or HTML document.
///
/// The `Document` owns every node and namespace. Handles into it (`NodeId`,
/// [`crate::Node`]) borrow it, so the graph cannot be mutated while a query
/// is running. `Document` is `Send + Sync`; any number of threads can query
/// the same document at once.
///
/// # Examples
///
/// ```
/// use xmlquery::Document;
///
/// let doc = Document::parse_str("<root/>").unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(doc.node_name(root), Some("root"));
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// Namespace table indexed by `NsId`.
    namespaces: Vec<Namespace>,
    /// The document node (not the root element).
    root: NodeId,
    /// XML version from the XML declaration (e.g. `"1.0"`).
    pub version: Option<String>,
    /// Encoding label from the XML declaration (e.g. `"UTF-8"`).
    pub encoding: Option<String>,
    /// Standalone flag from the XML declaration.
    pub standalone: Option<bool>,
    /// Whether the graph was built by the HTML parser.
    pub is_html: bool,
    /// Diagnostics collected during parsing (warnings and recovered errors).
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Document {
    /// Creates an empty document holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            namespaces: Vec::new(),
            root: NodeId(NonZeroU32::MIN),
            version: None,
            encoding: None,
            standalone: None,
            is_html: false,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first element child of the document node.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| self.node_type(id) == Some(NodeType::Element))
    }

    /// Returns the `NodeData` for `id`, or `None` if `id` is not in this arena.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.as_index())
    }

    /// Returns the `NodeData` for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document. Use [`get`](Self::get)
    /// for handles of unknown origin.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the kind tag of a node.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(|n| n.kind.node_type())
    }

    /// Returns the raw name of an element (local part) or the target of a
    /// processing instruction.
    #[must_use]
    pub fn raw_name(&self, id: NodeId) -> Option<&[u8]> {
        match &self.get(id)?.kind {
            NodeKind::Element { name, .. } | NodeKind::ProcessingInstruction { target: name, .. } => {
                Some(&name[..])
            }
            _ => None,
        }
    }

    /// Returns the name of an element or processing instruction as text.
    ///
    /// A name whose bytes are not valid UTF-8 reads as `None`; the node is
    /// otherwise untouched and still reachable by traversal.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.raw_name(id)
            .and_then(|name| std::str::from_utf8(name).ok())
    }

    /// Returns the namespace an element belongs to.
    #[must_use]
    pub fn namespace(&self, id: NodeId) -> Option<&Namespace> {
        match &self.get(id)?.kind {
            NodeKind::Element {
                namespace: Some(ns),
                ..
            } => self.namespace_by_id(*ns),
            _ => None,
        }
    }

    /// Looks up an entry in the namespace table.
    #[must_use]
    pub fn namespace_by_id(&self, id: NsId) -> Option<&Namespace> {
        self.namespaces.get(id.0 as usize)
    }

    /// Returns the namespace URI of an element, if any.
    #[must_use]
    pub fn node_namespace(&self, id: NodeId) -> Option<&str> {
        self.namespace(id)
            .map(|ns| ns.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// Returns the namespace declarations made on an element.
    pub fn namespace_definitions(&self, id: NodeId) -> impl Iterator<Item = &Namespace> + '_ {
        let defs: &[NsId] = match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element { ns_defs, .. }) => ns_defs,
            _ => &[],
        };
        defs.iter().filter_map(|&ns| self.namespace_by_id(ns))
    }

    /// Resolves a prefix (`None` for the default namespace) in scope at `id`
    /// by walking the declarations on the node and its ancestors.
    ///
    /// The `xml` prefix is always bound.
    #[must_use]
    pub fn lookup_namespace(&self, id: NodeId, prefix: Option<&str>) -> Option<&Namespace> {
        let found = self.ancestors(id).find_map(|anc| {
            self.namespace_definitions(anc)
                .find(|ns| ns.prefix.as_deref() == prefix.map(str::as_bytes))
        });
        found.or_else(|| {
            self.namespaces
                .iter()
                .find(|ns| prefix == Some("xml") && ns.prefix.as_deref() == Some(b"xml"))
        })
    }

    /// Returns the text of a text, CDATA, comment or processing instruction.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::CData { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => data.as_deref(),
            _ => None,
        }
    }

    /// Returns the concatenated text of a node and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        if let Some(NodeKind::Text { content } | NodeKind::CData { content }) =
            self.get(id).map(|n| &n.kind)
        {
            result.push_str(content);
        }
        for desc in self.descendants(id) {
            if let NodeKind::Text { content } | NodeKind::CData { content } = &self.node(desc).kind
            {
                result.push_str(content);
            }
        }
        result
    }

    /// Returns the attributes of an element node.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by local name.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling
    }

    /// Returns an iterator over all children of a node, of any kind.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.get(id).map(|_| id),
        }
    }

    /// Returns a pre-order iterator over all descendants of a node,
    /// excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Construction ---

    /// Allocates a new, detached node and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        let Some(id) = NodeId::from_index(index) else {
            panic!("node arena is full ({index} slots)");
        };
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Adds a namespace binding to the table and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn create_namespace(&mut self, prefix: Option<&[u8]>, uri: impl Into<String>) -> NsId {
        let id = NsId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace {
            prefix: prefix.map(Box::from),
            uri: uri.into(),
        });
        id
    }

    /// Appends a detached node to the end of a parent's child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Returns the number of nodes in the arena, including the document node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
#[derive(Debug)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
#[derive(Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over the descendants of a node.
///
/// Walks the parent/sibling links directly, so it holds nothing but the
/// subtree root and the next position.
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Climb until a node with a next sibling is found, stopping at the
        // subtree root.
        let mut at = current;
        self.next = loop {
            if at == self.root {
                break None;
            }
            if let Some(sibling) = self.doc.next_sibling(at) {
                break Some(sibling);
            }
            match self.doc.parent(at) {
                Some(parent) => at = parent,
                None => break None,
            }
        };
        Some(current)
    }
}

impl std::iter::FusedIterator for Descendants<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &mut Document, parent: NodeId, name: &str) -> NodeId {
        let id = doc.create_node(NodeKind::element(name));
        doc.append_child(parent, id);
        id
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert_eq!(doc.node_type(doc.root()), Some(NodeType::Document));
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.root_element(), None);
    }

    #[test]
    fn test_append_links_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(NodeKind::text("A"));
        let b = doc.create_node(NodeKind::text("B"));
        let c = doc.create_node(NodeKind::text("C"));
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(c));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(c), None);
        assert_eq!(doc.prev_sibling(c), Some(b));
        assert_eq!(doc.prev_sibling(a), None);
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn test_root_element_skips_non_elements() {
        let mut doc = Document::new();
        let root = doc.root();
        let comment = doc.create_node(NodeKind::Comment {
            content: "lead".to_string(),
        });
        doc.append_child(root, comment);
        let elem = element(&mut doc, root, "root");
        assert_eq!(doc.root_element(), Some(elem));
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = element(&mut doc, root, "p");
        let a = doc.create_node(NodeKind::text("hello "));
        doc.append_child(p, a);
        let b = element(&mut doc, p, "b");
        let b_text = doc.create_node(NodeKind::text("world"));
        doc.append_child(b, b_text);
        let i = element(&mut doc, p, "i");

        let desc: Vec<NodeId> = doc.descendants(root).collect();
        assert_eq!(desc, vec![p, a, b, b_text, i]);
        assert_eq!(doc.text_content(p), "hello world");
    }

    #[test]
    fn test_descendants_stay_inside_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let top = element(&mut doc, root, "top");
        let first = element(&mut doc, top, "first");
        let inner = element(&mut doc, first, "inner");
        let _second = element(&mut doc, top, "second");

        let desc: Vec<NodeId> = doc.descendants(first).collect();
        assert_eq!(desc, vec![inner]);
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let mut doc = Document::new();
        let root = doc.root();
        let leaf = element(&mut doc, root, "leaf");
        assert_eq!(doc.descendants(leaf).count(), 0);
    }

    #[test]
    fn test_ancestors() {
        let mut doc = Document::new();
        let root = doc.root();
        let parent = element(&mut doc, root, "parent");
        let child = element(&mut doc, parent, "child");
        let ancestors: Vec<NodeId> = doc.ancestors(child).collect();
        assert_eq!(ancestors, vec![child, parent, root]);
    }

    #[test]
    fn test_unknown_id_reads_as_absent() {
        let doc = Document::new();
        let Some(bogus) = NodeId::from_raw(999) else {
            panic!("non-zero raw id");
        };
        assert!(doc.get(bogus).is_none());
        assert_eq!(doc.node_type(bogus), None);
        assert_eq!(doc.first_child(bogus), None);
        assert_eq!(doc.node_name(bogus), None);
        assert_eq!(doc.children(bogus).count(), 0);
        assert_eq!(doc.ancestors(bogus).count(), 0);
        assert_eq!(doc.descendants(bogus).count(), 0);
        assert!(doc.attributes(bogus).is_empty());
        assert_eq!(NodeId::from_raw(0), None);
    }

    #[test]
    fn test_malformed_name_reads_as_none() {
        let mut doc = Document::new();
        let root = doc.root();
        let bad = doc.create_node(NodeKind::element(vec![b'a', 0xFF, b'b']));
        doc.append_child(root, bad);
        assert_eq!(doc.node_name(bad), None);
        assert_eq!(doc.raw_name(bad), Some(&[b'a', 0xFF, b'b'][..]));
        assert_eq!(doc.root_element(), Some(bad));
    }

    #[test]
    fn test_namespace_lookup_walks_ancestors() {
        let mut doc = Document::new();
        let root = doc.root();
        let ns = doc.create_namespace(Some(b"svg"), "http://www.w3.org/2000/svg");
        let outer = doc.create_node(NodeKind::Element {
            name: Box::from(&b"outer"[..]),
            namespace: None,
            ns_defs: vec![ns],
            attributes: vec![],
        });
        doc.append_child(root, outer);
        let rect = doc.create_node(NodeKind::Element {
            name: Box::from(&b"rect"[..]),
            namespace: Some(ns),
            ns_defs: vec![],
            attributes: vec![],
        });
        doc.append_child(outer, rect);

        assert_eq!(doc.node_namespace(rect), Some("http://www.w3.org/2000/svg"));
        assert_eq!(
            doc.namespace(rect).and_then(Namespace::prefix_str),
            Some("svg")
        );
        let found = doc.lookup_namespace(rect, Some("svg"));
        assert_eq!(found.map(|n| n.uri.as_str()), Some("http://www.w3.org/2000/svg"));
        assert!(doc.lookup_namespace(rect, Some("math")).is_none());
        assert!(doc.lookup_namespace(rect, None).is_none());
        assert_eq!(doc.namespace_definitions(outer).count(), 1);
        assert_eq!(doc.namespace_definitions(rect).count(), 0);
    }

    #[test]
    fn test_empty_default_namespace_has_no_uri() {
        let mut doc = Document::new();
        let root = doc.root();
        let ns = doc.create_namespace(None, "");
        let elem = doc.create_node(NodeKind::Element {
            name: Box::from(&b"plain"[..]),
            namespace: Some(ns),
            ns_defs: vec![ns],
            attributes: vec![],
        });
        doc.append_child(root, elem);
        assert_eq!(doc.node_namespace(elem), None);
    }

    #[test]
    fn test_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let elem = doc.create_node(NodeKind::Element {
            name: Box::from(&b"div"[..]),
            namespace: None,
            ns_defs: vec![],
            attributes: vec![Attribute::new("id", "main"), Attribute::new("class", "box")],
        });
        doc.append_child(root, elem);

        assert_eq!(doc.attribute(elem, "id"), Some("main"));
        assert_eq!(doc.attribute(elem, "class"), Some("box"));
        assert_eq!(doc.attribute(elem, "style"), None);
        assert_eq!(doc.attributes(elem).len(), 2);
        assert!(doc.attributes(root).is_empty());
    }

    #[test]
    fn test_node_text() {
        let mut doc = Document::new();
        let text = doc.create_node(NodeKind::text("hello"));
        let comment = doc.create_node(NodeKind::Comment {
            content: "a comment".to_string(),
        });
        let pi = doc.create_node(NodeKind::ProcessingInstruction {
            target: Box::from(&b"render"[..]),
            data: Some("fast".to_string()),
        });
        let elem = doc.create_node(NodeKind::element("div"));

        assert_eq!(doc.node_text(text), Some("hello"));
        assert_eq!(doc.node_text(comment), Some("a comment"));
        assert_eq!(doc.node_text(pi), Some("fast"));
        assert_eq!(doc.node_name(pi), Some("render"));
        assert_eq!(doc.node_text(elem), None);
    }

    #[test]
    fn test_node_count_grows_on_create() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(NodeKind::element("a"));
        assert_eq!(doc.node_count(), 2);
        let b = doc.create_node(NodeKind::text("text"));
        doc.append_child(root, a);
        doc.append_child(a, b);
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn test_created_ids_are_fresh() {
        let mut doc = Document::new();
        let root = doc.root();
        let ids: Vec<_> = (0..100)
            .map(|_| doc.create_node(NodeKind::text("x")))
            .collect();
        for (offset, &id) in (1u32..).zip(&ids) {
            assert_ne!(id, root);
            assert_eq!(id.into_raw(), root.into_raw() + offset);
            assert_eq!(doc.node_type(id), Some(NodeType::Text));
        }
        assert_eq!(doc.node_type(root), Some(NodeType::Document));
    }

    #[test]
    fn test_document_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
