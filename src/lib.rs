//! # xmlquery
//!
//! Name-based queries over an XML/HTML node graph.
//!
//! Documents are parsed into an arena ([`Document`]) and then explored
//! through read-only handles ([`Node`]). Element names are matched ignoring
//! ASCII case, optionally qualified by a namespace prefix, among direct
//! children or whole subtrees. Every query result is lazy and comes back in
//! document order.
//!
//! ## Quick Start
//!
//! ```
//! use xmlquery::Document;
//!
//! let doc = Document::parse_html("<HTML><Body><P>one</P><p>two</p></Body></HTML>").unwrap();
//! let body = doc.html_body().unwrap();
//! let texts: Vec<String> = body.children_named("p").map(|p| p.text()).collect();
//! assert_eq!(texts, ["one", "two"]);
//! assert_eq!(body.to_string(), "<body><p>one</p><p>two</p></body>");
//! ```
//!
//! The lower layers are public too, for callers that work with raw ids:
//!
//! ```
//! use xmlquery::{Cursor, Document, KindSet, Query};
//!
//! let doc = Document::parse_str(r#"<r xmlns:m="urn:m">text<m:item/><item/></r>"#).unwrap();
//! let r = doc.root_element().unwrap();
//! assert_eq!(Cursor::children_of(&doc, r, KindSet::CONTENT).count(), 3);
//! assert_eq!(Query::children("ITEM").in_namespace("m").all(&doc, Some(r)).count(), 1);
//! ```

pub mod dom;
pub mod encoding;
pub mod error;
pub mod parser;
pub mod query;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use dom::{Node, Nodes};
pub use error::{ParseError, ParseDiagnostic};
pub use parser::ParseOptions;
pub use query::{Cursor, KindSet, NameKey, Query, Scope, StaticKey};
pub use tree::{Attribute, Document, NodeId, NodeKind, NodeType};
