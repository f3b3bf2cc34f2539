//! Rendering of nodes back to markup.
//!
//! [`render_node`] is the exact, unformatted reconstruction behind
//! `Node::render` and `Document::render`.

pub mod xml;

pub use xml::render_node;
