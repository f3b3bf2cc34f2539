//! Node and document handles: the public face of the query engine.
//!
//! A [`Node`] is a copyable `(&Document, NodeId)` pair whose id has been
//! checked against the document. Every name-based query on it goes through
//! the walker in [`crate::query`]; rendering goes through
//! [`crate::serial`].
//!
//! ```
//! use xmlquery::Document;
//!
//! let doc = Document::parse_str(r#"<feed><entry id="1"><title>First</title></entry></feed>"#).unwrap();
//! let feed = doc.root_node().first_child("FEED").unwrap();
//! let entry = feed.first_child("entry").unwrap();
//! assert_eq!(entry.attribute("id"), Some("1"));
//! assert_eq!(entry.to_string(), r#"<entry id="1"><title>First</title></entry>"#);
//! ```

use std::fmt;
use std::iter::FusedIterator;

use crate::encoding::{lookup_charset, Encoding};
use crate::query::{Cursor, KindSet, Matches, NameKey, Query, StaticKey};
use crate::serial::render_node;
use crate::tree::{Attribute, Document, Namespace, NodeData, NodeId, NodeType};

const HEAD: StaticKey = StaticKey::new("head");
const BODY: StaticKey = StaticKey::new("body");
const TITLE: StaticKey = StaticKey::new("title");
const META: StaticKey = StaticKey::new("meta");

/// A handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
    data: &'a NodeData,
}

impl<'a> Node<'a> {
    /// Wraps `id`, or returns `None` if it does not belong to `doc`.
    #[must_use]
    pub fn new(doc: &'a Document, id: NodeId) -> Option<Self> {
        doc.get(id).map(|data| Self { doc, id, data })
    }

    /// The underlying id.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The document this node belongs to.
    #[must_use]
    pub fn document(self) -> &'a Document {
        self.doc
    }

    /// The kind of node this is.
    #[must_use]
    pub fn node_type(self) -> NodeType {
        self.data.kind.node_type()
    }

    /// Returns `true` for element nodes.
    #[must_use]
    pub fn is_element(self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// The local name of an element or the target of a processing
    /// instruction; `None` for other nodes or when the name is not UTF-8.
    #[must_use]
    pub fn name(self) -> Option<&'a str> {
        self.doc.node_name(self.id)
    }

    /// The name bytes exactly as stored.
    #[must_use]
    pub fn raw_name(self) -> Option<&'a [u8]> {
        self.doc.raw_name(self.id)
    }

    /// The namespace an element is bound to.
    #[must_use]
    pub fn namespace(self) -> Option<&'a Namespace> {
        self.doc.namespace(self.id)
    }

    /// The prefix the element was written with (`ns` for `<ns:b>`).
    #[must_use]
    pub fn namespace_prefix(self) -> Option<&'a str> {
        self.namespace().and_then(Namespace::prefix_str)
    }

    /// The namespace URI of an element, if non-empty.
    #[must_use]
    pub fn namespace_uri(self) -> Option<&'a str> {
        self.doc.node_namespace(self.id)
    }

    /// Resolves `prefix` (`None` for the default namespace) in the scope of
    /// this node.
    #[must_use]
    pub fn lookup_namespace_uri(self, prefix: Option<&str>) -> Option<&'a str> {
        self.doc
            .lookup_namespace(self.id, prefix)
            .map(|ns| ns.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// The parent node; `None` only for the document node.
    #[must_use]
    pub fn parent(self) -> Option<Node<'a>> {
        self.data.parent.and_then(|id| Node::new(self.doc, id))
    }

    /// The nearest following sibling that is an element.
    #[must_use]
    pub fn next_element(self) -> Option<Node<'a>> {
        Cursor::elements(self.doc, self.data.next_sibling)
            .next()
            .and_then(|id| Node::new(self.doc, id))
    }

    /// The nearest preceding sibling that is an element.
    #[must_use]
    pub fn previous_element(self) -> Option<Node<'a>> {
        let mut at = self.data.prev_sibling;
        while let Some(node) = at.and_then(|id| Node::new(self.doc, id)) {
            if node.is_element() {
                return Some(node);
            }
            at = node.data.prev_sibling;
        }
        None
    }

    /// An attribute value by name.
    #[must_use]
    pub fn attribute(self, name: &str) -> Option<&'a str> {
        self.doc.attribute(self.id, name)
    }

    /// All attributes of an element, in source order.
    #[must_use]
    pub fn attributes(self) -> &'a [Attribute] {
        self.doc.attributes(self.id)
    }

    /// The concatenated text of this node and everything below it.
    #[must_use]
    pub fn text(self) -> String {
        self.doc.text_content(self.id)
    }

    // --- Queries ---

    /// Child elements, in order.
    #[must_use]
    pub fn children(self) -> Nodes<'a, Cursor<'a>> {
        self.child_nodes(KindSet::ELEMENT)
    }

    /// Children whose kind is in `kinds`, in order.
    #[must_use]
    pub fn child_nodes(self, kinds: KindSet) -> Nodes<'a, Cursor<'a>> {
        self.wrap(Cursor::new(self.doc, self.data.first_child, kinds))
    }

    /// The first child element named `tag` (ASCII case-insensitive).
    pub fn first_child<K: NameKey>(self, tag: K) -> Option<Node<'a>> {
        self.first(&Query::children(tag))
    }

    /// The first child element named `tag` whose namespace prefix matches
    /// `prefix`.
    pub fn first_child_in<K: NameKey, P: NameKey>(self, tag: K, prefix: P) -> Option<Node<'a>> {
        self.first(&Query::children(tag).in_namespace(prefix))
    }

    /// All child elements named `tag`, lazily.
    pub fn children_named<K: NameKey>(self, tag: K) -> Nodes<'a, Matches<'a, K, StaticKey>> {
        self.all(Query::children(tag))
    }

    /// All child elements named `tag` in namespace prefix `prefix`, lazily.
    pub fn children_named_in<K: NameKey, P: NameKey>(
        self,
        tag: K,
        prefix: P,
    ) -> Nodes<'a, Matches<'a, K, P>> {
        self.all(Query::children(tag).in_namespace(prefix))
    }

    /// The first element named `tag` anywhere below this node, in document
    /// order.
    pub fn first_descendant<K: NameKey>(self, tag: K) -> Option<Node<'a>> {
        self.first(&Query::descendants(tag))
    }

    /// Like [`first_descendant`](Self::first_descendant), also requiring a
    /// matching namespace prefix.
    pub fn first_descendant_in<K: NameKey, P: NameKey>(
        self,
        tag: K,
        prefix: P,
    ) -> Option<Node<'a>> {
        self.first(&Query::descendants(tag).in_namespace(prefix))
    }

    /// Every element named `tag` below this node, lazily, in document order.
    pub fn descendants_named<K: NameKey>(self, tag: K) -> Nodes<'a, Matches<'a, K, StaticKey>> {
        self.all(Query::descendants(tag))
    }

    /// Every element below this node named `tag` in namespace prefix
    /// `prefix`, lazily.
    pub fn descendants_named_in<K: NameKey, P: NameKey>(
        self,
        tag: K,
        prefix: P,
    ) -> Nodes<'a, Matches<'a, K, P>> {
        self.all(Query::descendants(tag).in_namespace(prefix))
    }

    fn first<K: NameKey, P: NameKey>(self, query: &Query<K, P>) -> Option<Node<'a>> {
        query
            .first(self.doc, Some(self.id))
            .and_then(|id| Node::new(self.doc, id))
    }

    fn all<K: NameKey, P: NameKey>(self, query: Query<K, P>) -> Nodes<'a, Matches<'a, K, P>> {
        self.wrap(query.all(self.doc, Some(self.id)))
    }

    fn wrap<I: Iterator<Item = NodeId>>(self, ids: I) -> Nodes<'a, I> {
        Nodes { doc: self.doc, ids }
    }

    // --- Rendering ---

    /// The markup of this node and its subtree, reconstructed exactly.
    ///
    /// Only namespace declarations made inside the subtree are written. A
    /// prefixed element whose `xmlns:` declaration sits on an ancestor
    /// renders as `<ns:b/>` without it, so the output is not always a
    /// well-formed document on its own.
    ///
    /// ```
    /// use xmlquery::Document;
    ///
    /// let doc = Document::parse_str(r#"<a xmlns:ns="uri"><ns:b/></a>"#).unwrap();
    /// let b = doc.root_node().first_descendant_in("b", "ns").unwrap();
    /// assert_eq!(b.render(), "<ns:b/>");
    /// ```
    #[must_use]
    pub fn render(self) -> String {
        render_node(self.doc, self.id)
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
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type", &self.node_type())
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Turns an iterator of ids into an iterator of [`Node`]s.
#[derive(Debug)]
pub struct Nodes<'a, I> {
    doc: &'a Document,
    ids: I,
}

impl<'a, I: Iterator<Item = NodeId>> Iterator for Nodes<'a, I> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let doc = self.doc;
        self.ids.find_map(|id| Node::new(doc, id))
    }
}

impl<'a, I: FusedIterator<Item = NodeId>> FusedIterator for Nodes<'a, I> {}

impl Document {
    /// The document node as a [`Node`].
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root(),
            data: self.node(self.root()),
        }
    }

    /// The root element as a [`Node`], if there is one.
    #[must_use]
    pub fn root_element_node(&self) -> Option<Node<'_>> {
        self.root_element().and_then(|id| Node::new(self, id))
    }

    /// Wraps `id` as a [`Node`], or `None` if it does not belong here.
    #[must_use]
    pub fn node_ref(&self, id: NodeId) -> Option<Node<'_>> {
        Node::new(self, id)
    }

    /// The markup of the root element, or the empty string when the
    /// document has no root element.
    ///
    /// ```
    /// use xmlquery::Document;
    ///
    /// assert_eq!(Document::new().render(), "");
    /// let doc = Document::parse_str("<?xml version=\"1.0\"?><r><c/></r>").unwrap();
    /// assert_eq!(doc.render(), "<r><c/></r>");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        self.root_element()
            .map_or_else(String::new, |root| render_node(self, root))
    }

    /// The document's declared character set, if it names one that is
    /// recognized.
    ///
    /// The XML declaration's `encoding` is used when present. HTML
    /// documents fall back to `<meta charset>` or the `charset=` parameter
    /// of `<meta http-equiv="Content-Type">`.
    #[must_use]
    pub fn charset(&self) -> Option<&'static Encoding> {
        if let Some(label) = self.encoding.as_deref() {
            return lookup_charset(label);
        }
        if !self.is_html {
            return None;
        }
        let head = self.html_head().unwrap_or_else(|| self.root_node());
        head.descendants_named(META)
            .find_map(meta_charset)
            .and_then(lookup_charset)
    }

    /// The first `<head>` element, matched case-insensitively.
    #[must_use]
    pub fn html_head(&self) -> Option<Node<'_>> {
        self.root_node().first_descendant(HEAD)
    }

    /// The first `<body>` element, matched case-insensitively.
    #[must_use]
    pub fn html_body(&self) -> Option<Node<'_>> {
        self.root_node().first_descendant(BODY)
    }

    /// The trimmed text of the `<title>` element, preferring one inside
    /// `<head>`.
    #[must_use]
    pub fn html_title(&self) -> Option<String> {
        self.html_head()
            .and_then(|head| head.first_descendant(TITLE))
            .or_else(|| self.root_node().first_descendant(TITLE))
            .map(|title| title.text().trim().to_string())
    }
}

/// Extracts a charset label from a `<meta>` element.
fn meta_charset(meta: Node<'_>) -> Option<&str> {
    if let Some(charset) = meta.attribute("charset") {
        return Some(charset.trim());
    }
    let is_content_type = meta
        .attribute("http-equiv")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
    if !is_content_type {
        return None;
    }
    let content = meta.attribute("content")?;
    let lower = content.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let label = content[start..]
        .split(|c: char| c == ';' || c.is_ascii_whitespace())
        .next()?
        .trim_matches(|c| c == '"' || c == '\'');
    (!label.is_empty()).then_some(label)
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
