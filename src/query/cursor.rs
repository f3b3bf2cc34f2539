//! Kind-filtered iteration over a sibling chain.

use bitflags::bitflags;

use crate::tree::{Document, NodeId, NodeType};

bitflags! {
    /// The set of node kinds a [`Cursor`] is willing to yield.
    ///
    /// The default set is [`KindSet::ELEMENT`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct KindSet: u8 {
        /// The document node.
        const DOCUMENT = 1 << 0;
        /// Elements.
        const ELEMENT = 1 << 1;
        /// Text nodes.
        const TEXT = 1 << 2;
        /// CDATA sections.
        const CDATA = 1 << 3;
        /// Comments.
        const COMMENT = 1 << 4;
        /// Processing instructions.
        const PROCESSING_INSTRUCTION = 1 << 5;
        /// Document type declarations.
        const DOCUMENT_TYPE = 1 << 6;

        /// Elements plus character data, i.e. what makes up element content.
        const CONTENT = Self::ELEMENT.bits() | Self::TEXT.bits() | Self::CDATA.bits();
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::ELEMENT
    }
}

impl From<NodeType> for KindSet {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Document => Self::DOCUMENT,
            NodeType::Element => Self::ELEMENT,
            NodeType::Text => Self::TEXT,
            NodeType::CData => Self::CDATA,
            NodeType::Comment => Self::COMMENT,
            NodeType::ProcessingInstruction => Self::PROCESSING_INSTRUCTION,
            NodeType::DocumentType => Self::DOCUMENT_TYPE,
        }
    }
}

impl KindSet {
    /// Returns `true` if nodes of this kind pass the filter.
    #[must_use]
    pub fn admits(self, node_type: NodeType) -> bool {
        self.contains(Self::from(node_type))
    }
}

/// A lazy, forward-only walk along a sibling chain that yields only nodes
/// whose kind is in a [`KindSet`].
///
/// A cursor runs exactly once. It is deliberately not `Clone`: to walk the
/// chain again, build a new cursor from the same head. Dropping it midway
/// costs nothing.
///
/// A link that does not resolve in the document ends the walk. Sibling
/// chains are assumed to be acyclic.
///
/// ```
/// use xmlquery::{Cursor, Document, KindSet};
///
/// let doc = Document::parse_str("<r>a<b/>c<!--d--><e/></r>").unwrap();
/// let r = doc.root_element().unwrap();
/// assert_eq!(Cursor::children_of(&doc, r, KindSet::ELEMENT).count(), 2);
/// assert_eq!(Cursor::children_of(&doc, r, KindSet::CONTENT).count(), 4);
/// ```
#[derive(Debug)]
pub struct Cursor<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
    kinds: KindSet,
}

impl<'a> Cursor<'a> {
    /// Starts at `head` (inclusive). An absent head gives an empty walk.
    #[must_use]
    pub fn new(doc: &'a Document, head: Option<NodeId>, kinds: KindSet) -> Self {
        Self {
            doc,
            next: head,
            kinds,
        }
    }

    /// Starts at `head`, yielding elements only.
    #[must_use]
    pub fn elements(doc: &'a Document, head: Option<NodeId>) -> Self {
        Self::new(doc, head, KindSet::ELEMENT)
    }

    /// Walks the children of `parent`.
    #[must_use]
    pub fn children_of(doc: &'a Document, parent: NodeId, kinds: KindSet) -> Self {
        Self::new(doc, doc.first_child(parent), kinds)
    }

    /// The filter this cursor applies.
    #[must_use]
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }
}

impl Iterator for Cursor<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let current = self.next.take()?;
            let data = self.doc.get(current)?;
            self.next = data.next_sibling;
            if self.kinds.admits(data.kind.node_type()) {
                return Some(current);
            }
        }
    }
}

impl std::iter::FusedIterator for Cursor<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn mixed_doc() -> (Document, NodeId) {
        let doc = Document::parse_str("<r>t1<a/><!--c--><?p x?>t2<b/><![CDATA[d]]></r>").unwrap();
        let r = doc.root_element().unwrap();
        (doc, r)
    }

    fn types(doc: &Document, cursor: Cursor<'_>) -> Vec<NodeType> {
        cursor.map(|id| doc.node_type(id).unwrap()).collect()
    }

    #[test]
    fn test_default_kinds_are_elements() {
        assert_eq!(KindSet::default(), KindSet::ELEMENT);
        let (doc, r) = mixed_doc();
        let names: Vec<_> = Cursor::elements(&doc, doc.first_child(r))
            .map(|id| doc.node_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_kind_filter() {
        let (doc, r) = mixed_doc();
        assert_eq!(
            types(&doc, Cursor::children_of(&doc, r, KindSet::TEXT)),
            vec![NodeType::Text, NodeType::Text]
        );
        assert_eq!(
            types(
                &doc,
                Cursor::children_of(&doc, r, KindSet::COMMENT | KindSet::PROCESSING_INSTRUCTION)
            ),
            vec![NodeType::Comment, NodeType::ProcessingInstruction]
        );
        assert_eq!(Cursor::children_of(&doc, r, KindSet::all()).count(), 7);
        assert_eq!(Cursor::children_of(&doc, r, KindSet::empty()).count(), 0);
    }

    #[test]
    fn test_absent_head_is_empty() {
        let doc = Document::new();
        assert_eq!(Cursor::new(&doc, None, KindSet::all()).next(), None);
    }

    #[test]
    fn test_leaf_has_no_children() {
        let doc = Document::parse_str("<r/>").unwrap();
        let r = doc.root_element().unwrap();
        assert_eq!(Cursor::children_of(&doc, r, KindSet::all()).count(), 0);
    }

    #[test]
    fn test_fused_after_end() {
        let (doc, r) = mixed_doc();
        let mut cursor = Cursor::children_of(&doc, r, KindSet::ELEMENT);
        assert!(cursor.next().is_some());
        assert!(cursor.next().is_some());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_head_is_inclusive() {
        let (doc, r) = mixed_doc();
        let a = Cursor::children_of(&doc, r, KindSet::ELEMENT).next().unwrap();
        let from_a: Vec<_> = Cursor::elements(&doc, Some(a)).collect();
        assert_eq!(from_a.len(), 2);
        assert_eq!(from_a[0], a);
    }

    #[test]
    fn test_foreign_head_ends_walk() {
        let doc = Document::new();
        let bogus = NodeId::from_raw(77).unwrap();
        assert_eq!(Cursor::new(&doc, Some(bogus), KindSet::all()).count(), 0);
    }

    #[test]
    fn test_fresh_cursor_restarts() {
        let (doc, r) = mixed_doc();
        let first: Vec<_> = Cursor::children_of(&doc, r, KindSet::CONTENT).collect();
        let second: Vec<_> = Cursor::children_of(&doc, r, KindSet::CONTENT).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_kind_set_from_node_type() {
        let mut doc = Document::new();
        let text = doc.create_node(NodeKind::text("x"));
        let node_type = doc.node_type(text).unwrap();
        assert!(KindSet::TEXT.admits(node_type));
        assert!(KindSet::CONTENT.admits(node_type));
        assert!(!KindSet::ELEMENT.admits(node_type));
        assert_eq!(KindSet::from(NodeType::DocumentType), KindSet::DOCUMENT_TYPE);
    }
}
