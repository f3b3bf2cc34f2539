//! Markup reconstruction.
//!
//! Turns a node and its subtree back into text. Element names are rebuilt
//! from the local name plus the prefix of the element's namespace, and
//! namespace declarations are written back from `ns_defs`, so parsing the
//! output yields an equivalent graph. Documents built by the HTML parser
//! keep their HTML shape: void elements have no end tag, empty elements are
//! never self-closed and `script`/`style` content is written verbatim.

use crate::parser::html::{is_raw_text_element, is_void_element};
use crate::tree::{Document, NodeId, NodeKind};
use crate::util::qname::push_qualified;

/// Renders one node and its subtree exactly. Rendering the document node
/// renders all of its children.
///
/// Returns the empty string for an id that does not belong to `doc`.
///
/// # Examples
///
/// ```
/// use xmlquery::Document;
/// use xmlquery::serial::render_node;
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(render_node(&doc, root), "<root><child>Hello</child></root>");
/// ```
#[must_use]
pub fn render_node(doc: &Document, id: NodeId) -> String {
    let mut output = String::new();
    write_node(doc, id, &mut output);
    output
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(data) = doc.get(id) else {
        return;
    };
    match &data.kind {
        NodeKind::Document => {
            for child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Element { .. } => write_element(doc, id, out),
        NodeKind::Text { content } => {
            let raw = doc.is_html
                && data
                    .parent
                    .and_then(|p| doc.raw_name(p))
                    .is_some_and(is_raw_text_element);
            if raw {
                out.push_str(content);
            } else {
                write_escaped_text(out, content);
            }
        }
        NodeKind::CData { content } => {
            out.push_str("<![CDATA[");
            out.push_str(content);
            out.push_str("]]>");
        }
        NodeKind::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(&String::from_utf8_lossy(target));
            if let Some(d) = data {
                out.push(' ');
                out.push_str(d);
            }
            out.push_str("?>");
        }
        NodeKind::DocumentType {
            name,
            public_id,
            system_id,
        } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            match (public_id, system_id) {
                (Some(pub_id), sys_id) => {
                    out.push_str(" PUBLIC \"");
                    out.push_str(pub_id);
                    out.push('"');
                    if let Some(sys_id) = sys_id {
                        out.push_str(" \"");
                        out.push_str(sys_id);
                        out.push('"');
                    }
                }
                (None, Some(sys_id)) => {
                    out.push_str(" SYSTEM \"");
                    out.push_str(sys_id);
                    out.push('"');
                }
                (None, None) => {}
            }
            out.push('>');
        }
    }
}

fn write_element(doc: &Document, id: NodeId, out: &mut String) {
    let Some(NodeKind::Element {
        name,
        ns_defs,
        attributes,
        ..
    }) = doc.get(id).map(|n| &n.kind)
    else {
        return;
    };
    let prefix = doc.namespace(id).and_then(|ns| ns.prefix.as_deref());

    out.push('<');
    push_qualified(out, prefix, name);

    for ns in ns_defs.iter().filter_map(|&ns| doc.namespace_by_id(ns)) {
        out.push_str(" xmlns");
        if let Some(p) = &ns.prefix {
            out.push(':');
            out.push_str(&String::from_utf8_lossy(p));
        }
        out.push_str("=\"");
        write_escaped_attr(out, &ns.uri);
        out.push('"');
    }

    for attr in attributes {
        out.push(' ');
        if let Some(pfx) = &attr.prefix {
            out.push_str(pfx);
            out.push(':');
        }
        out.push_str(&attr.name);
        out.push_str("=\"");
        write_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if doc.is_html && is_void_element(name) {
        out.push('>');
        return;
    }
    if doc.first_child(id).is_none() && !doc.is_html {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in doc.children(id) {
        write_node(doc, child, out);
    }
    out.push_str("</");
    push_qualified(out, prefix, name);
    out.push('>');
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", ch as u32);
}

/// Escapes text content: `<`, `>`, `&` as entity references, `\r` and the
/// remaining C0 controls as character references.
fn write_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes an attribute value. Whitespace other than the space is written
/// as character references so attribute normalization leaves it intact.
fn write_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}
