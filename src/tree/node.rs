//! Node type definitions.
//!
//! `NodeKind` carries the per-kind payload of a node. `NodeType` is the
//! payload-free tag used by cursors to decide which nodes to yield.

use super::{Attribute, NsId};

/// The kind of a node and its associated data.
///
/// Navigation links (parent, children, siblings) live in `NodeData`, not here.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g. `<svg:rect width="2">`.
    Element {
        /// The local name as raw bytes (`rect` for `svg:rect`).
        ///
        /// Kept as bytes because names are matched byte-wise; a name that is
        /// not valid UTF-8 still takes part in traversal.
        name: Box<[u8]>,
        /// The namespace the element's prefix (or the default namespace)
        /// resolved to, if any.
        namespace: Option<NsId>,
        /// Namespace declarations made on this element (`xmlns`, `xmlns:p`).
        ns_defs: Vec<NsId>,
        /// Attributes on this element, excluding namespace declarations.
        attributes: Vec<Attribute>,
    },

    /// Character data (already decoded; references resolved).
    Text {
        /// The text content.
        content: String,
    },

    /// A CDATA section, e.g. `<![CDATA[...]]>`.
    CData {
        /// The CDATA content (no escaping applied).
        content: String,
    },

    /// A comment, without the `<!--` and `-->` delimiters.
    Comment {
        /// The comment text.
        content: String,
    },

    /// A processing instruction, e.g. `<?xml-stylesheet href="a.css"?>`.
    ProcessingInstruction {
        /// The PI target as raw bytes.
        target: Box<[u8]>,
        /// The PI data, if any.
        data: Option<String>,
    },

    /// A document type declaration, e.g. `<!DOCTYPE html>`.
    DocumentType {
        /// The root element name declared in the DOCTYPE.
        name: String,
        /// The PUBLIC identifier, if any.
        public_id: Option<String>,
        /// The SYSTEM identifier, if any.
        system_id: Option<String>,
    },
}

/// The payload-free kind tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// See [`NodeKind::Document`].
    Document,
    /// See [`NodeKind::Element`].
    Element,
    /// See [`NodeKind::Text`].
    Text,
    /// See [`NodeKind::CData`].
    CData,
    /// See [`NodeKind::Comment`].
    Comment,
    /// See [`NodeKind::ProcessingInstruction`].
    ProcessingInstruction,
    /// See [`NodeKind::DocumentType`].
    DocumentType,
}

impl NodeKind {
    /// Returns the kind tag of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::Element { .. } => NodeType::Element,
            Self::Text { .. } => NodeType::Text,
            Self::CData { .. } => NodeType::CData,
            Self::Comment { .. } => NodeType::Comment,
            Self::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            Self::DocumentType { .. } => NodeType::DocumentType,
        }
    }

    /// Creates an element payload with no namespace and no attributes.
    pub fn element(name: impl Into<Vec<u8>>) -> Self {
        Self::Element {
            name: name.into().into_boxed_slice(),
            namespace: None,
            ns_defs: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Creates a text payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }
}
