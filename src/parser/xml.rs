//! The tree builder shared by the XML and HTML dialects.
//!
//! Markup is consumed left to right by one loop that keeps a stack of open
//! elements, so nesting depth costs heap, not call stack. Dialect-specific
//! behavior (namespace processing, tag-name folding, implicit closing) is
//! switched on `ParseOptions::html` at the few points where the two differ.

use crate::error::{ErrorSeverity, ParseError};
use crate::tree::{Attribute, Document, NodeId, NodeKind, NodeType, NsId};
use crate::util::qname::{is_valid_qname, split_qname};

use super::html::{
    auto_closes, is_head_content_element, is_raw_text_element, is_void_element, lookup_entity,
};
use super::input::{
    parse_cdata_content, parse_comment_content, parse_pi_content, parse_quoted, parse_xml_decl,
    NamespaceResolver, ParserInput, XML_NAMESPACE,
};
use super::ParseOptions;

/// An element that has been started but not yet closed.
struct OpenElement {
    id: NodeId,
    /// The tag name as written (lower-cased in HTML), matched against end tags.
    qname: String,
}

pub(crate) struct TreeBuilder<'a> {
    input: ParserInput<'a>,
    doc: Document,
    options: ParseOptions,
    ns: NamespaceResolver,
    open: Vec<OpenElement>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        let mut input = ParserInput::new(source);
        input.set_recover(options.recover || options.html);
        input.set_max_depth(options.max_depth);
        input.set_max_name_length(options.max_name_length);

        let mut doc = Document::new();
        doc.is_html = options.html;
        let xml_ns = doc.create_namespace(Some(b"xml"), XML_NAMESPACE);

        Self {
            input,
            doc,
            options: options.clone(),
            ns: NamespaceResolver::new(xml_ns),
            open: Vec::new(),
        }
    }

    /// Consumes the whole input and returns the finished document.
    pub fn build(mut self) -> Result<Document, ParseError> {
        // The XML declaration is only recognized at the very start.
        if !self.options.html
            && self.input.looking_at(b"<?xml")
            && self.input.peek_at(5).is_some_and(|b| b.is_ascii_whitespace())
        {
            let decl = parse_xml_decl(&mut self.input)?;
            self.doc.version = decl.version;
            self.doc.encoding = decl.encoding;
            self.doc.standalone = decl.standalone;
        }

        while !self.input.at_end() {
            self.step()?;
        }

        if let Some(top) = self.open.last() {
            if !self.options.html {
                let message = format!("unexpected end of input: element '{}' not closed", top.qname);
                self.input.error(message)?;
            }
            while !self.open.is_empty() {
                self.close_element();
            }
        }

        if !self.options.html && self.doc.root_element().is_none() {
            self.input.error("missing root element")?;
        }

        self.doc.diagnostics = std::mem::take(&mut self.input.diagnostics);
        Ok(self.doc)
    }

    /// Parses one markup construct or one run of text.
    fn step(&mut self) -> Result<(), ParseError> {
        let html = self.options.html;
        if self.input.looking_at(b"</") {
            if html {
                self.parse_html_end_tag();
                Ok(())
            } else {
                self.parse_end_tag()
            }
        } else if self.input.looking_at(b"<!--") {
            self.parse_comment()
        } else if self.input.looking_at(b"<![CDATA[") {
            self.parse_cdata()
        } else if self.input.looking_at_ci(b"<!DOCTYPE") {
            self.parse_doctype()
        } else if self.input.looking_at(b"<?") {
            self.parse_pi()
        } else if self.input.looking_at(b"<!") {
            self.input.error("unrecognized markup declaration")?;
            self.skip_to_gt();
            Ok(())
        } else if self.input.peek() == Some(b'<') {
            if !html {
                self.parse_start_tag()
            } else if self.input.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) {
                self.parse_html_start_tag()
            } else {
                // A '<' that does not open a tag is text in HTML.
                self.input.advance(1);
                self.parse_text(String::from("<"))
            }
        } else {
            self.parse_text(String::new())
        }
    }

    fn current_parent(&self) -> NodeId {
        self.open.last().map_or(self.doc.root(), |e| e.id)
    }

    fn append_leaf(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current_parent();
        let id = self.doc.create_node(kind);
        self.doc.append_child(parent, id);
        id
    }

    fn open_element(&mut self, id: NodeId, qname: String) -> Result<(), ParseError> {
        self.input.increment_depth()?;
        self.open.push(OpenElement { id, qname });
        Ok(())
    }

    fn close_element(&mut self) {
        if self.open.pop().is_some() {
            self.ns.pop_scope();
            self.input.decrement_depth();
        }
    }

    /// Closes open elements down to and including the innermost one named
    /// `name`. Returns `false`, closing nothing, if no such element is open.
    fn pop_to(&mut self, name: &str) -> bool {
        if !self.open.iter().any(|e| e.qname == name) {
            return false;
        }
        while let Some(top) = self.open.last() {
            let done = top.qname == name;
            self.close_element();
            if done {
                break;
            }
        }
        true
    }

    fn skip_to_gt(&mut self) {
        while let Some(b) = self.input.peek() {
            self.input.advance(1);
            if b == b'>' {
                break;
            }
        }
    }

    /// Consumes input up to and including `terminator`, or to the end of
    /// input if it never appears.
    fn take_lenient_until(&mut self, terminator: &[u8]) -> String {
        let rest = self.input.rest();
        let found = rest
            .windows(terminator.len())
            .position(|w| w == terminator);
        let end = found.unwrap_or(rest.len());
        let content = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.input
            .advance(found.map_or(end, |pos| pos + terminator.len()));
        content
    }

    // --- Elements (XML) ---

    fn parse_start_tag(&mut self) -> Result<(), ParseError> {
        if self.open.is_empty() && self.doc.root_element().is_some() {
            self.input.error("extra content at the end of the document")?;
        }

        self.input.advance(1);
        let qname = self.input.parse_name()?;
        if !is_valid_qname(&qname) {
            self.input
                .error(format!("malformed qualified name '{qname}'"))?;
        }
        let raw = self.parse_xml_attributes()?;
        self.input.skip_whitespace();
        let empty = if self.input.looking_at(b"/>") {
            self.input.advance(2);
            true
        } else {
            self.input.expect_byte(b'>')?;
            false
        };

        self.ns.push_scope();
        let (ns_defs, attributes) = self.bind_namespaces(raw)?;
        let (namespace, local) = self.resolve_element_name(&qname)?;
        let id = self.append_leaf(NodeKind::Element {
            name: local.into_bytes().into_boxed_slice(),
            namespace,
            ns_defs,
            attributes,
        });

        if empty {
            self.ns.pop_scope();
            Ok(())
        } else {
            self.open_element(id, qname)
        }
    }

    fn parse_xml_attributes(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        let mut attrs: Vec<(String, String)> = Vec::new();
        loop {
            let had_ws = self.input.skip_whitespace();
            if matches!(self.input.peek(), Some(b'>' | b'/') | None) {
                return Ok(attrs);
            }
            if !had_ws {
                return Err(self.input.fatal("whitespace required between attributes"));
            }

            let name = self.input.parse_name()?;
            self.input.skip_whitespace();
            self.input.expect_byte(b'=')?;
            self.input.skip_whitespace();
            let value = self.parse_attr_value()?;

            if attrs.iter().any(|(n, _)| *n == name) {
                self.input
                    .error(format!("attribute '{name}' redefined"))?;
                continue;
            }
            attrs.push((name, value));
        }
    }

    /// Parses a quoted attribute value, expanding references and
    /// normalizing literal whitespace to spaces.
    fn parse_attr_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.input.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.input.fatal("expected quoted attribute value")),
        };
        self.input.advance(1);

        let mut value = String::new();
        loop {
            match self.input.peek() {
                None => {
                    return Err(self
                        .input
                        .fatal("unexpected end of input in attribute value"))
                }
                Some(b) if b == quote => {
                    self.input.advance(1);
                    return Ok(value);
                }
                Some(b'<') => {
                    self.input.error("'<' not allowed in attribute values")?;
                    self.input.advance(1);
                    value.push('<');
                }
                Some(b'&') => self.parse_reference_into(&mut value)?,
                Some(_) => {
                    let ch = self.input.next_char()?;
                    value.push(if matches!(ch, '\t' | '\n') { ' ' } else { ch });
                }
            }
        }
    }

    /// Splits namespace declarations off the raw attribute list, binds them
    /// in the current scope, and resolves the prefixes of the remaining
    /// attributes.
    fn bind_namespaces(
        &mut self,
        raw: Vec<(String, String)>,
    ) -> Result<(Vec<NsId>, Vec<Attribute>), ParseError> {
        let mut ns_defs = Vec::new();
        let mut plain = Vec::with_capacity(raw.len());

        for (name, value) in raw {
            if name == "xmlns" {
                let id = self.doc.create_namespace(None, value.as_str());
                self.ns.bind(None, id, value.is_empty());
                ns_defs.push(id);
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                if value.is_empty() {
                    self.input
                        .error(format!("namespace prefix '{prefix}' bound to an empty URI"))?;
                    continue;
                }
                if prefix == "xmlns" || (prefix == "xml") != (value == XML_NAMESPACE) {
                    self.input
                        .error(format!("reserved namespace prefix or URI misused by '{name}'"))?;
                    continue;
                }
                let id = self.doc.create_namespace(Some(prefix.as_bytes()), value.as_str());
                self.ns.bind(Some(prefix.to_string()), id, false);
                ns_defs.push(id);
            } else {
                plain.push((name, value));
            }
        }

        let mut attributes = Vec::with_capacity(plain.len());
        for (name, value) in plain {
            let (prefix, local) = split_qname(&name);
            let Some(prefix) = prefix else {
                attributes.push(Attribute::new(name.as_str(), value));
                continue;
            };
            let uri = self
                .ns
                .resolve(Some(prefix))
                .and_then(|id| self.doc.namespace_by_id(id))
                .map(|ns| ns.uri.clone());
            if let Some(uri) = uri {
                attributes.push(Attribute {
                    name: local.to_string(),
                    value,
                    prefix: Some(prefix.to_string()),
                    namespace: Some(uri),
                });
            } else {
                self.input
                    .error(format!("unbound namespace prefix '{prefix}' on attribute '{name}'"))?;
                attributes.push(Attribute::new(name.as_str(), value));
            }
        }

        Ok((ns_defs, attributes))
    }

    /// Resolves an element's qualified name to its namespace and local name.
    /// In recovery mode an unbound prefix keeps the whole name as local.
    fn resolve_element_name(&mut self, qname: &str) -> Result<(Option<NsId>, String), ParseError> {
        match split_qname(qname) {
            (Some(prefix), local) => match self.ns.resolve(Some(prefix)) {
                Some(id) => Ok((Some(id), local.to_string())),
                None => {
                    self.input.error(format!(
                        "unbound namespace prefix '{prefix}' on element '{qname}'"
                    ))?;
                    Ok((None, qname.to_string()))
                }
            },
            (None, _) => Ok((self.ns.resolve(None), qname.to_string())),
        }
    }

    fn parse_end_tag(&mut self) -> Result<(), ParseError> {
        self.input.advance(2);
        let name = self.input.parse_name()?;
        self.input.skip_whitespace();
        self.input.expect_byte(b'>')?;

        let expected = self.open.last().map(|e| e.qname.clone());
        match expected {
            Some(expected) if expected == name => self.close_element(),
            Some(expected) => {
                self.input.error(format!(
                    "mismatched end tag: expected '</{expected}>', found '</{name}>'"
                ))?;
                self.pop_to(&name);
            }
            None => {
                self.input
                    .error(format!("end tag '</{name}>' has no open element"))?;
            }
        }
        Ok(())
    }

    // --- Elements (HTML) ---

    fn parse_html_tag_name(&mut self) -> Result<String, ParseError> {
        let name = self
            .input
            .take_while_ascii(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
            .to_ascii_lowercase();
        self.input.check_name_length(name.len())?;
        Ok(name)
    }

    fn parse_html_start_tag(&mut self) -> Result<(), ParseError> {
        self.input.advance(1);
        let tag = self.parse_html_tag_name()?;
        let attributes = self.parse_html_attributes()?;
        let self_closing = self.input.looking_at(b"/>");
        if self_closing {
            self.input.advance(2);
        } else if self.input.peek() == Some(b'>') {
            self.input.advance(1);
        }

        if self.implies_structure() {
            match tag.as_str() {
                "html" => {
                    let html = self.ensure_html()?;
                    self.merge_attributes(html, attributes);
                    return Ok(());
                }
                "head" => {
                    if self.is_open("body") {
                        self.input.push_diagnostic(
                            ErrorSeverity::Warning,
                            "'<head>' inside body ignored".to_string(),
                        );
                    } else {
                        let head = self.enter_head()?;
                        self.merge_attributes(head, attributes);
                    }
                    return Ok(());
                }
                "body" => {
                    let body = self.enter_body()?;
                    self.merge_attributes(body, attributes);
                    return Ok(());
                }
                _ => {}
            }
        }

        while let Some(top) = self.open.last() {
            if !auto_closes(top.qname.as_bytes(), tag.as_bytes()) {
                break;
            }
            self.close_element();
        }

        if self.implies_structure() {
            let head_content = is_head_content_element(tag.as_bytes());
            let top = self.open.last().map(|e| e.qname.as_str());
            let at_top = matches!(top, None | Some("html"));
            let in_head = top == Some("head");
            if at_top && head_content && !self.has_body() {
                self.enter_head()?;
            } else if at_top || (in_head && !head_content) {
                self.enter_body()?;
            }
        }

        let id = self.append_leaf(NodeKind::Element {
            name: tag.as_bytes().into(),
            namespace: None,
            ns_defs: Vec::new(),
            attributes,
        });

        if self_closing || is_void_element(tag.as_bytes()) {
            return Ok(());
        }
        if is_raw_text_element(tag.as_bytes()) {
            self.parse_raw_text(id, &tag);
            return Ok(());
        }
        self.ns.push_scope();
        self.open_element(id, tag)
    }

    fn parse_html_attributes(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attrs: Vec<Attribute> = Vec::new();
        loop {
            self.input.skip_whitespace();
            match self.input.peek() {
                None | Some(b'>') => return Ok(attrs),
                Some(b'/') if self.input.looking_at(b"/>") => return Ok(attrs),
                Some(b'/') => {
                    self.input.advance(1);
                    continue;
                }
                _ => {}
            }

            let name = self
                .input
                .take_while_ascii(|b| {
                    !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'')
                })
                .to_ascii_lowercase();
            if name.is_empty() {
                if let Some(ch) = self.input.peek_char() {
                    self.input.advance_char(ch);
                }
                continue;
            }
            self.input.check_name_length(name.len())?;

            self.input.skip_whitespace();
            let value = if self.input.peek() == Some(b'=') {
                self.input.advance(1);
                self.input.skip_whitespace();
                self.parse_html_attr_value()?
            } else {
                String::new()
            };

            if attrs.iter().any(|a| a.name == name) {
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!("duplicate attribute '{name}' ignored"),
                );
                continue;
            }
            attrs.push(Attribute::new(name, value));
        }
    }

    fn parse_html_attr_value(&mut self) -> Result<String, ParseError> {
        let mut value = String::new();
        let quote = match self.input.peek() {
            Some(q @ (b'"' | b'\'')) => {
                self.input.advance(1);
                Some(q)
            }
            _ => None,
        };

        while let Some(b) = self.input.peek() {
            match quote {
                Some(q) if b == q => {
                    self.input.advance(1);
                    break;
                }
                None if b.is_ascii_whitespace() || b == b'>' => break,
                _ => {}
            }
            if b == b'&' {
                self.parse_html_reference_into(&mut value);
            } else {
                value.push(self.input.next_char()?);
            }
        }
        Ok(value)
    }

    /// Reads the unparsed content of `script`/`style` up to the matching
    /// end tag.
    fn parse_raw_text(&mut self, parent: NodeId, tag: &str) {
        let rest = self.input.rest();
        let end = (0..rest.len())
            .find(|&i| {
                rest[i..].starts_with(b"</")
                    && rest[i + 2..]
                        .get(..tag.len())
                        .is_some_and(|t| t.eq_ignore_ascii_case(tag.as_bytes()))
            })
            .unwrap_or(rest.len());

        if end > 0 {
            let content = String::from_utf8_lossy(&rest[..end]).into_owned();
            let text = self.doc.create_node(NodeKind::text(content));
            self.doc.append_child(parent, text);
        }
        self.input.advance(end);
        if !self.input.at_end() {
            self.skip_to_gt();
        }
    }

    fn parse_html_end_tag(&mut self) {
        self.input.advance(2);
        let tag = self
            .input
            .take_while_ascii(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
            .to_ascii_lowercase();
        self.skip_to_gt();

        if tag.is_empty() || is_void_element(tag.as_bytes()) {
            return;
        }
        if self.implies_structure() && (tag == "html" || tag == "body") {
            // Body and html stay open until the end of input.
            let keep = if self.is_open("body") { "body" } else { "html" };
            if self.is_open(keep) {
                while self.open.last().is_some_and(|e| e.qname != keep) {
                    self.close_element();
                }
            }
            return;
        }
        if !self.pop_to(&tag) {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                format!("end tag '</{tag}>' has no open element"),
            );
        }
    }

    // --- Implied document structure (HTML) ---

    fn implies_structure(&self) -> bool {
        self.options.html && !self.options.no_implied
    }

    fn is_open(&self, name: &str) -> bool {
        self.open.iter().any(|e| e.qname == name)
    }

    fn child_element(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.doc.children(parent).find(|&id| {
            self.doc.node_type(id) == Some(NodeType::Element)
                && self.doc.raw_name(id) == Some(name.as_bytes())
        })
    }

    fn has_body(&self) -> bool {
        self.child_element(self.doc.root(), "html")
            .and_then(|html| self.child_element(html, "body"))
            .is_some()
    }

    /// Creates `name` under `parent` and pushes it on the open stack.
    fn open_implied(&mut self, parent: NodeId, name: &str) -> Result<NodeId, ParseError> {
        let id = self.doc.create_node(NodeKind::element(name));
        self.doc.append_child(parent, id);
        self.ns.push_scope();
        self.open_element(id, name.to_string())?;
        Ok(id)
    }

    /// Returns the `<html>` element, creating and opening it if missing.
    fn ensure_html(&mut self) -> Result<NodeId, ParseError> {
        let root = self.doc.root();
        match self.child_element(root, "html") {
            Some(html) => Ok(html),
            None => self.open_implied(root, "html"),
        }
    }

    /// Closes everything above `<html>` and opens `child` under it, reusing
    /// an existing element of that name.
    fn reopen_under_html(&mut self, child: &str) -> Result<NodeId, ParseError> {
        let html = self.ensure_html()?;
        while self.open.last().is_some_and(|e| e.qname != "html") {
            self.close_element();
        }
        match self.child_element(html, child) {
            Some(id) => {
                self.ns.push_scope();
                self.open_element(id, child.to_string())?;
                Ok(id)
            }
            None => self.open_implied(html, child),
        }
    }

    /// Makes `<head>` the current element.
    fn enter_head(&mut self) -> Result<NodeId, ParseError> {
        match self.open.last() {
            Some(top) if top.qname == "head" => Ok(top.id),
            _ => self.reopen_under_html("head"),
        }
    }

    /// Closes `<head>` if needed and makes sure `<body>` is open.
    fn enter_body(&mut self) -> Result<NodeId, ParseError> {
        if let Some(body) = self.open.iter().find(|e| e.qname == "body") {
            return Ok(body.id);
        }
        self.reopen_under_html("body")
    }

    /// Adds attributes from a repeated structural start tag that the element
    /// does not have yet.
    fn merge_attributes(&mut self, id: NodeId, attrs: Vec<Attribute>) {
        if let NodeKind::Element { attributes, .. } = &mut self.doc.node_mut(id).kind {
            for attr in attrs {
                if !attributes.iter().any(|a| a.name == attr.name) {
                    attributes.push(attr);
                }
            }
        }
    }

    // --- Character data and references ---

    fn parse_text(&mut self, mut text: String) -> Result<(), ParseError> {
        while let Some(b) = self.input.peek() {
            match b {
                b'<' => break,
                b'&' => self.parse_reference_into(&mut text)?,
                b']' if !self.options.html && self.input.looking_at(b"]]>") => {
                    self.input.error("']]>' not allowed in content")?;
                    self.input.advance(3);
                    text.push_str("]]>");
                }
                _ => text.push(self.input.next_char()?),
            }
        }
        self.append_text(text)
    }

    /// Appends character data to the current element, merging it into a
    /// preceding text node. Whitespace outside the root element is dropped.
    fn append_text(&mut self, text: String) -> Result<(), ParseError> {
        if text.is_empty() {
            return Ok(());
        }
        let blank = text.bytes().all(|b| b.is_ascii_whitespace());
        if self.open.is_empty() {
            if blank {
                return Ok(());
            }
            if !self.options.html {
                return self.input.error("text content outside the root element");
            }
        } else if blank && self.options.no_blanks {
            return Ok(());
        }
        if !blank
            && self.implies_structure()
            && self
                .open
                .last()
                .map_or(true, |e| e.qname == "html" || e.qname == "head")
        {
            self.enter_body()?;
        }

        let parent = self.current_parent();
        if let Some(last) = self.doc.last_child(parent) {
            if let NodeKind::Text { content } = &mut self.doc.node_mut(last).kind {
                content.push_str(&text);
                return Ok(());
            }
        }
        self.append_leaf(NodeKind::text(text));
        Ok(())
    }

    /// Expands a reference starting at `&` into `out`.
    fn parse_reference_into(&mut self, out: &mut String) -> Result<(), ParseError> {
        if self.options.html {
            self.parse_html_reference_into(out);
            return Ok(());
        }

        self.input.advance(1);
        if self.input.peek() == Some(b'#') {
            self.input.advance(1);
            out.push(self.input.parse_char_ref()?);
            return Ok(());
        }

        let name = self.input.parse_name()?;
        self.input.expect_byte(b';')?;
        if let Some(ch) = builtin_entity(&name) {
            out.push(ch);
        } else {
            self.input
                .error(format!("entity '{name}' not defined"))?;
            out.push('&');
            out.push_str(&name);
            out.push(';');
        }
        Ok(())
    }

    /// HTML references never fail: anything that is not a known reference
    /// is a literal `&`.
    fn parse_html_reference_into(&mut self, out: &mut String) {
        let rest = self.input.rest();
        if let Some((ch, len)) = numeric_char_ref(rest) {
            self.input.advance(len);
            out.push(ch);
            return;
        }

        let name_len = rest
            .iter()
            .skip(1)
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        let name = std::str::from_utf8(&rest[1..=name_len]).unwrap_or_default();
        if let Some(value) = lookup_entity(name) {
            let terminated = rest.get(name_len + 1) == Some(&b';');
            self.input.advance(1 + name_len + usize::from(terminated));
            out.push_str(value);
        } else {
            self.input.advance(1);
            out.push('&');
        }
    }

    // --- Other markup ---

    fn parse_comment(&mut self) -> Result<(), ParseError> {
        let content = if self.options.html {
            self.input.advance(4);
            self.take_lenient_until(b"-->")
        } else {
            parse_comment_content(&mut self.input)?
        };
        self.append_leaf(NodeKind::Comment { content });
        Ok(())
    }

    fn parse_cdata(&mut self) -> Result<(), ParseError> {
        let content = if self.options.html {
            self.input.advance(9);
            self.take_lenient_until(b"]]>")
        } else {
            parse_cdata_content(&mut self.input)?
        };
        if self.open.is_empty() && !self.options.html {
            return self.input.error("CDATA section outside the root element");
        }
        self.append_leaf(NodeKind::CData { content });
        Ok(())
    }

    fn parse_pi(&mut self) -> Result<(), ParseError> {
        if self.options.html {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                "processing instruction ignored in HTML".to_string(),
            );
            self.skip_to_gt();
            return Ok(());
        }
        let (target, data) = parse_pi_content(&mut self.input)?;
        self.append_leaf(NodeKind::ProcessingInstruction {
            target: target.into_bytes().into_boxed_slice(),
            data,
        });
        Ok(())
    }

    fn parse_doctype(&mut self) -> Result<(), ParseError> {
        if !self.open.is_empty() || self.doc.root_element().is_some() {
            self.input.error("DOCTYPE declaration after the root element started")?;
            self.skip_to_gt();
            return Ok(());
        }

        self.input.advance(b"<!DOCTYPE".len());
        let kind = if self.options.html {
            let body = self.take_lenient_until(b">");
            let mut sub = ParserInput::new(&body);
            parse_doctype_body(&mut sub).unwrap_or_else(|_| NodeKind::DocumentType {
                name: body.split_whitespace().next().unwrap_or_default().to_string(),
                public_id: None,
                system_id: None,
            })
        } else {
            let kind = parse_doctype_body(&mut self.input)?;
            self.input.expect_byte(b'>')?;
            kind
        };
        self.append_leaf(kind);
        Ok(())
    }
}

/// Parses what follows `<!DOCTYPE` up to (not including) the closing `>`.
/// The internal subset is skipped; no declarations are processed.
fn parse_doctype_body(input: &mut ParserInput<'_>) -> Result<NodeKind, ParseError> {
    if !input.skip_whitespace() {
        return Err(input.fatal("whitespace required after '<!DOCTYPE'"));
    }
    let name = input.parse_name()?;
    input.skip_whitespace();

    let mut public_id = None;
    let mut system_id = None;
    if input.looking_at_ci(b"PUBLIC") {
        input.advance(6);
        input.skip_whitespace();
        public_id = Some(parse_quoted(input)?);
        input.skip_whitespace();
        if matches!(input.peek(), Some(b'"' | b'\'')) {
            system_id = Some(parse_quoted(input)?);
        }
    } else if input.looking_at_ci(b"SYSTEM") {
        input.advance(6);
        input.skip_whitespace();
        system_id = Some(parse_quoted(input)?);
    }
    input.skip_whitespace();

    if input.peek() == Some(b'[') {
        skip_internal_subset(input)?;
        input.skip_whitespace();
    }

    Ok(NodeKind::DocumentType {
        name,
        public_id,
        system_id,
    })
}

/// Skips `[ ... ]`, stepping over quoted literals and comments so brackets
/// inside them do not count.
fn skip_internal_subset(input: &mut ParserInput<'_>) -> Result<(), ParseError> {
    input.expect_byte(b'[')?;
    loop {
        match input.peek() {
            None => return Err(input.fatal("unexpected end of input in DOCTYPE internal subset")),
            Some(b']') => {
                input.advance(1);
                return Ok(());
            }
            Some(b'"' | b'\'') => {
                parse_quoted(input)?;
            }
            Some(b'<') if input.looking_at(b"<!--") => {
                parse_comment_content(input)?;
            }
            Some(_) => {
                let ch = input.peek_char().unwrap_or('\u{FFFD}');
                input.advance_char(ch);
            }
        }
    }
}

fn builtin_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => None,
    }
}

/// Decodes `&#NNN;` or `&#xHH;` at the start of `bytes`, returning the
/// character and the number of bytes it spans.
fn numeric_char_ref(bytes: &[u8]) -> Option<(char, usize)> {
    let body = bytes.strip_prefix(b"&#")?;
    let (radix, digits_at) = match body.first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };
    let digits = body[digits_at..]
        .iter()
        .take_while(|b| b.is_ascii_hexdigit() && (radix == 16 || b.is_ascii_digit()))
        .count();
    if digits == 0 || body.get(digits_at + digits) != Some(&b';') {
        return None;
    }
    let text = std::str::from_utf8(&body[digits_at..digits_at + digits]).ok()?;
    let ch = u32::from_str_radix(text, radix)
        .ok()
        .and_then(char::from_u32)?;
    Some((ch, 2 + digits_at + digits + 1))
}
