//! The traversal and query engine.
//!
//! Three layers, each built on the one before:
//!
//! - [`matcher`]: does a raw node name match a key, ignoring ASCII case?
//! - [`cursor`]: which nodes of a sibling chain pass a kind filter?
//! - [`walker`]: which elements below a node match a tag (and optionally a
//!   namespace prefix), among children or the whole subtree?
//!
//! Everything here reads a [`Document`](crate::Document) through shared
//! references. Results are lazy, deterministic for a given graph, and never
//! an error: nothing found is simply `None` or an empty sequence.

pub mod cursor;
pub mod matcher;
pub mod walker;

pub use cursor::{Cursor, KindSet};
pub use matcher::{NameKey, StaticKey};
pub use walker::{Matches, Query, Scope};
