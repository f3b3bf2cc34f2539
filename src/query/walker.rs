//! Name-filtered queries over children or whole subtrees.
//!
//! A [`Query`] pairs a tag key with an optional namespace-prefix key and a
//! [`Scope`]. Running it never allocates: children are walked with a
//! [`Cursor`], subtrees with the stackless pre-order [`Descendants`]
//! iterator, and every candidate is tested in place.

use crate::tree::{Descendants, Document, NodeId, NodeType};

use super::cursor::Cursor;
use super::matcher::{NameKey, StaticKey};

/// Which nodes below the starting point a query looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Direct children only.
    #[default]
    Children,
    /// Every node in the subtree, in document order, excluding the start.
    Descendants,
}

/// An element query: a tag key, an optional namespace-prefix key, and a
/// scope.
///
/// ```
/// use xmlquery::{Document, Query};
///
/// let doc = Document::parse_str(r#"<a xmlns:ns="uri"><ns:b/><b/></a>"#).unwrap();
/// let a = doc.root_element();
///
/// assert_eq!(Query::children("b").all(&doc, a).count(), 2);
/// let qualified = Query::children("b").in_namespace("NS");
/// let only = qualified.first(&doc, a).unwrap();
/// assert_eq!(doc.namespace(only).and_then(|ns| ns.prefix_str()), Some("ns"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query<T, N = StaticKey> {
    tag: T,
    namespace: Option<N>,
    scope: Scope,
}

impl<T: NameKey> Query<T> {
    /// Matches direct children named `tag`.
    pub fn children(tag: T) -> Self {
        Self {
            tag,
            namespace: None,
            scope: Scope::Children,
        }
    }

    /// Matches descendants named `tag`.
    pub fn descendants(tag: T) -> Self {
        Self {
            tag,
            namespace: None,
            scope: Scope::Descendants,
        }
    }
}

impl<T: NameKey, N: NameKey> Query<T, N> {
    /// Additionally requires the element's namespace prefix to match
    /// `prefix`. Elements without a namespace, or in a default namespace,
    /// then never match.
    pub fn in_namespace<P: NameKey>(self, prefix: P) -> Query<T, P> {
        Query {
            tag: self.tag,
            namespace: Some(prefix),
            scope: self.scope,
        }
    }

    /// The scope this query searches.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Borrows the keys, so the query can run without being consumed.
    pub fn borrowed(&self) -> Query<&T, &N> {
        Query {
            tag: &self.tag,
            namespace: self.namespace.as_ref(),
            scope: self.scope,
        }
    }

    /// Tests a single node against the query. Non-elements and ids foreign
    /// to `doc` never match.
    pub fn matches_node(&self, doc: &Document, id: NodeId) -> bool {
        if doc.node_type(id) != Some(NodeType::Element) || !self.tag.matches_name(doc.raw_name(id)) {
            return false;
        }
        self.namespace.as_ref().map_or(true, |key| {
            key.matches_name(doc.namespace(id).and_then(|ns| ns.prefix.as_deref()))
        })
    }

    /// Returns the first match below `from` in document order, stopping
    /// at the first hit.
    pub fn first(&self, doc: &Document, from: Option<NodeId>) -> Option<NodeId> {
        self.borrowed().all(doc, from).next()
    }

    /// Returns every match below `from`, lazily, in document order.
    ///
    /// An absent `from` gives an empty sequence.
    pub fn all(self, doc: &Document, from: Option<NodeId>) -> Matches<'_, T, N> {
        tracing::trace!(scope = ?self.scope, ?from, "starting query walk");
        let walk = match (from, self.scope) {
            (Some(from), Scope::Children) => Walk::Children(Cursor::elements(doc, doc.first_child(from))),
            (Some(from), Scope::Descendants) => Walk::Descendants(doc.descendants(from)),
            (None, _) => Walk::Children(Cursor::elements(doc, None)),
        };
        Matches {
            doc,
            query: self,
            walk,
        }
    }
}

#[derive(Debug)]
enum Walk<'a> {
    Children(Cursor<'a>),
    Descendants(Descendants<'a>),
}

/// The lazy result of [`Query::all`].
///
/// Holds only the query and the walk position; abandoning it early does no
/// further work.
#[derive(Debug)]
pub struct Matches<'a, T, N> {
    doc: &'a Document,
    query: Query<T, N>,
    walk: Walk<'a>,
}

impl<T: NameKey, N: NameKey> Iterator for Matches<'_, T, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let doc = self.doc;
        let query = &self.query;
        match &mut self.walk {
            Walk::Children(cursor) => cursor.find(|&id| query.matches_node(doc, id)),
            Walk::Descendants(nodes) => nodes.find(|&id| query.matches_node(doc, id)),
        }
    }
}

impl<T: NameKey, N: NameKey> std::iter::FusedIterator for Matches<'_, T, N> {}
