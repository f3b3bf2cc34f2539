//! Low-level input handling shared by both parsing dialects.
//!
//! [`ParserInput`] owns the byte cursor, position tracking (line, column,
//! byte offset), nesting depth, and the diagnostics collected in recovery
//! mode. It also hosts the primitives that do not depend on the dialect:
//! name parsing, reference decoding, comments, CDATA, processing
//! instructions and the XML declaration.
//!
//! No external entities are ever loaded.

use crate::error::{ErrorSeverity, ParseDiagnostic, ParseError, SourceLocation};
use crate::tree::NsId;

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Default maximum length (in bytes) of an element or attribute name.
pub(crate) const DEFAULT_MAX_NAME_LENGTH: usize = 50_000;

/// The namespace URI permanently bound to the `xml` prefix.
pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

// -------------------------------------------------------------------------
// XML name character classes (XML 1.0 §2.3)
// -------------------------------------------------------------------------

/// Returns `true` if `c` is a valid `Char` per XML 1.0 §2.2.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x0001_0000..=0x0010_FFFF
    )
}

/// Returns `true` if `c` is a valid `NameStartChar`.
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar`.
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

// -------------------------------------------------------------------------
// ParserInput
// -------------------------------------------------------------------------

pub(crate) struct ParserInput<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    depth: u32,
    max_depth: u32,
    max_name_length: usize,
    recover: bool,
    pub(crate) diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            recover: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn set_max_depth(&mut self, max: u32) {
        self.max_depth = max;
    }

    pub fn set_max_name_length(&mut self, max: usize) {
        self.max_name_length = max;
    }

    pub fn set_recover(&mut self, recover: bool) {
        self.recover = recover;
    }

    // -- Depth tracking --

    /// Increments the nesting depth. The limit is enforced even in recovery
    /// mode.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fatal(format!(
                "maximum nesting depth exceeded ({})",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position --

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    pub fn peek_char(&self) -> Option<char> {
        // Input always starts as a &str and we only stop on char boundaries.
        std::str::from_utf8(&self.input[self.pos..self.input.len().min(self.pos + 4)])
            .or_else(|e| std::str::from_utf8(&self.input[self.pos..self.pos + e.valid_up_to()]))
            .ok()
            .and_then(|s| s.chars().next())
    }

    /// Advances by `count` bytes, which must end on a char boundary.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(&b) = self.input.get(self.pos) {
                if b == b'\n' {
                    self.line += 1;
                    self.column = 1;
                } else if b & 0xC0 != 0x80 {
                    self.column += 1;
                }
                self.pos += 1;
            }
        }
    }

    pub fn advance_char(&mut self, ch: char) {
        self.advance(ch.len_utf8());
    }

    /// Consumes the next character with `\r\n` → `\n` normalization.
    ///
    /// Characters outside the XML `Char` production are an error, or a
    /// diagnostic in recovery mode.
    pub fn next_char(&mut self) -> Result<char, ParseError> {
        let ch = self
            .peek_char()
            .ok_or_else(|| self.fatal("unexpected end of input"))?;
        self.advance_char(ch);
        if ch == '\r' {
            if self.peek() == Some(b'\n') {
                self.advance(1);
            }
            return Ok('\n');
        }
        if !is_xml_char(ch) {
            self.error(format!("invalid XML character: U+{:04X}", ch as u32))?;
        }
        Ok(ch)
    }

    pub fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.advance(1);
                Ok(())
            }
            Some(b) => Err(self.fatal(format!(
                "expected '{}', found '{}'",
                expected as char, b as char
            ))),
            None => Err(self.fatal(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    pub fn expect_str(&mut self, expected: &[u8]) -> Result<(), ParseError> {
        if !self.looking_at(expected) {
            return Err(self.fatal(format!(
                "expected '{}'",
                String::from_utf8_lossy(expected)
            )));
        }
        self.advance(expected.len());
        Ok(())
    }

    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// ASCII case-insensitive lookahead.
    pub fn looking_at_ci(&self, expected: &[u8]) -> bool {
        self.input[self.pos..]
            .get(..expected.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(expected))
    }

    /// Skips whitespace. Returns `true` if any was consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance(1);
        }
        self.pos > start
    }

    /// Consumes ASCII bytes while `pred` holds.
    pub fn take_while_ascii(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii() && pred(b)) {
            self.advance(1);
        }
        // Only ASCII bytes were consumed.
        std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default()
    }

    /// Consumes characters up to (not including) `terminator`, returning
    /// them with line endings normalized. Errors at end of input.
    pub fn take_until(&mut self, terminator: &[u8], what: &str) -> Result<String, ParseError> {
        let mut out = String::new();
        while !self.looking_at(terminator) {
            if self.at_end() {
                return Err(self.fatal(format!("unexpected end of input in {what}")));
            }
            out.push(self.next_char()?);
        }
        self.advance(terminator.len());
        Ok(out)
    }

    // -- Names (XML 1.0 §2.3) --

    /// Parses an XML `Name`.
    pub fn parse_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let first = self
            .peek_char()
            .ok_or_else(|| self.fatal("expected name, found end of input"))?;
        if !is_name_start_char(first) {
            return Err(self.fatal(format!("invalid name start character: '{first}'")));
        }
        self.advance_char(first);
        while let Some(ch) = self.peek_char().filter(|&c| is_name_char(c)) {
            self.advance_char(ch);
        }

        self.check_name_length(self.pos - start)?;
        Ok(String::from_utf8_lossy(&self.input[start..self.pos]).into_owned())
    }

    pub fn check_name_length(&self, len: usize) -> Result<(), ParseError> {
        if len > self.max_name_length {
            return Err(self.fatal(format!(
                "name length ({len}) exceeds maximum ({})",
                self.max_name_length
            )));
        }
        Ok(())
    }

    // -- References (XML 1.0 §4.1) --

    /// Decodes a character reference body (after `&#`) up to and including
    /// the closing `;`.
    pub fn parse_char_ref(&mut self) -> Result<char, ParseError> {
        let value = if self.peek() == Some(b'x') {
            self.advance(1);
            let hex = self.take_while_ascii(|b| b.is_ascii_hexdigit());
            u32::from_str_radix(hex, 16)
                .map_err(|_| self.fatal("invalid hex character reference"))?
        } else {
            let dec = self.take_while_ascii(|b| b.is_ascii_digit());
            dec.parse::<u32>()
                .map_err(|_| self.fatal("invalid decimal character reference"))?
        };
        self.expect_byte(b';')?;
        char::from_u32(value)
            .filter(|&c| is_xml_char(c))
            .ok_or_else(|| self.fatal(format!("invalid character reference: U+{value:04X}")))
    }

    // -- Diagnostics --

    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.location(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Reports a recoverable error: fatal unless recovering.
    pub fn error(&mut self, message: impl Into<String>) -> Result<(), ParseError> {
        if self.recover {
            self.push_diagnostic(ErrorSeverity::Error, message.into());
            Ok(())
        } else {
            Err(self.fatal(message))
        }
    }

    pub fn push_diagnostic(&mut self, severity: ErrorSeverity, message: String) {
        let location = self.location();
        tracing::debug!(%severity, %location, problem = %message, "recovered parse problem");
        self.diagnostics.push(ParseDiagnostic {
            severity,
            message,
            location,
        });
    }
}

// -------------------------------------------------------------------------
// Namespace scope stack
// -------------------------------------------------------------------------

/// Namespace bindings in scope, one frame per open element.
///
/// Bindings point into the document's namespace table, so an element can be
/// linked to its namespace without copying prefix or URI.
pub(crate) struct NamespaceResolver {
    stack: Vec<Vec<(Option<String>, NsId, bool)>>,
}

impl NamespaceResolver {
    /// Creates a resolver with the `xml` prefix bound to `xml_ns`.
    pub fn new(xml_ns: NsId) -> Self {
        Self {
            stack: vec![vec![(Some("xml".to_string()), xml_ns, false)]],
        }
    }

    pub fn push_scope(&mut self) {
        self.stack.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Binds a prefix (`None` for the default namespace) in the innermost
    /// scope. `undeclares` marks `xmlns=""`.
    pub fn bind(&mut self, prefix: Option<String>, ns: NsId, undeclares: bool) {
        if let Some(frame) = self.stack.last_mut() {
            frame.push((prefix, ns, undeclares));
        }
    }

    /// Resolves a prefix to the innermost binding, skipping undeclarations.
    pub fn resolve(&self, prefix: Option<&str>) -> Option<NsId> {
        self.stack
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(p, _, _)| p.as_deref() == prefix)
            .and_then(|&(_, ns, undeclares)| (!undeclares).then_some(ns))
    }
}

// -------------------------------------------------------------------------
// Markup constructs shared by both dialects
// -------------------------------------------------------------------------

/// Parses `<!-- ... -->`, returning the content. The opener must not have
/// been consumed.
pub(crate) fn parse_comment_content(input: &mut ParserInput<'_>) -> Result<String, ParseError> {
    input.expect_str(b"<!--")?;
    let content = input.take_until(b"-->", "comment")?;
    if content.contains("--") {
        input.error("'--' not allowed inside comments")?;
    }
    Ok(content)
}

/// Parses `<![CDATA[ ... ]]>`, returning the content.
pub(crate) fn parse_cdata_content(input: &mut ParserInput<'_>) -> Result<String, ParseError> {
    input.expect_str(b"<![CDATA[")?;
    input.take_until(b"]]>", "CDATA section")
}

/// Parses `<?target data?>`, returning the target and optional data.
pub(crate) fn parse_pi_content(
    input: &mut ParserInput<'_>,
) -> Result<(String, Option<String>), ParseError> {
    input.expect_str(b"<?")?;
    let target = input.parse_name()?;
    if target.eq_ignore_ascii_case("xml") {
        return Err(input.fatal("PI target 'xml' is reserved"));
    }

    let data = if input.skip_whitespace() {
        Some(input.take_until(b"?>", "processing instruction")?).filter(|d| !d.is_empty())
    } else {
        input.expect_str(b"?>")?;
        None
    };
    Ok((target, data))
}

/// The pseudo-attributes of an XML declaration.
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlDeclaration {
    pub version: Option<String>,
    pub encoding: Option<String>,
    pub standalone: Option<bool>,
}

/// Parses `<?xml version="1.0" encoding="…" standalone="…"?>`.
pub(crate) fn parse_xml_decl(input: &mut ParserInput<'_>) -> Result<XmlDeclaration, ParseError> {
    input.expect_str(b"<?xml")?;
    let mut decl = XmlDeclaration::default();
    loop {
        input.skip_whitespace();
        if input.looking_at(b"?>") {
            input.advance(2);
            return Ok(decl);
        }
        let name = input.parse_name()?;
        input.skip_whitespace();
        input.expect_byte(b'=')?;
        input.skip_whitespace();
        let value = parse_quoted(input)?;
        match name.as_str() {
            "version" => decl.version = Some(value),
            "encoding" => decl.encoding = Some(value),
            "standalone" => match value.as_str() {
                "yes" => decl.standalone = Some(true),
                "no" => decl.standalone = Some(false),
                _ => return Err(input.fatal(format!("invalid standalone value '{value}'"))),
            },
            _ => return Err(input.fatal(format!("unexpected '{name}' in XML declaration"))),
        }
    }
}

/// Parses a single- or double-quoted literal without reference expansion.
pub(crate) fn parse_quoted(input: &mut ParserInput<'_>) -> Result<String, ParseError> {
    let quote = match input.peek() {
        Some(q @ (b'"' | b'\'')) => q,
        _ => return Err(input.fatal("expected quoted value")),
    };
    input.advance(1);
    input.take_until(&[quote], "quoted value")
}
