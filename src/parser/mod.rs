//! Tree builders that turn markup into a [`Document`] node graph.
//!
//! The query layer never parses; it is handed the graph these builders
//! produce. Two dialects share one hand-rolled builder:
//!
//! - **XML**: well-formedness is enforced (or reported as diagnostics in
//!   recovery mode) and namespace prefixes are resolved into the document's
//!   namespace table.
//! - **HTML**: Lenient rules. Tag names are folded to lower case,
//!   void elements never take children, stray end tags are dropped and open
//!   elements are closed implicitly. Missing `html`, `head` and `body`
//!   elements are implied unless [`ParseOptions::no_implied()`] is set. No
//!   namespace processing happens.

pub(crate) mod html;
pub(crate) mod input;
mod xml;

use crate::error::ParseError;
use crate::tree::Document;

use input::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NAME_LENGTH};

/// Options controlling how a document is parsed.
///
/// ```
/// use xmlquery::parser::ParseOptions;
///
/// let opts = ParseOptions::default()
///     .recover(true)
///     .no_blanks(true)
///     .max_depth(128);
/// assert!(opts.recover);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParseOptions {
    /// Record errors as diagnostics and keep building instead of failing.
    pub recover: bool,
    /// Drop text nodes that contain only whitespace.
    pub no_blanks: bool,
    /// Parse with the lenient HTML rules.
    pub html: bool,
    /// In HTML mode, do not add implied `html`, `head` and `body` elements.
    pub no_implied: bool,
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
    /// Maximum length in bytes of an element or attribute name (default: 50,000).
    pub max_name_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recover: false,
            no_blanks: false,
            html: false,
            no_implied: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ParseOptions {
    /// Options for HTML input. HTML parsing always recovers.
    #[must_use]
    pub fn html() -> Self {
        Self {
            recover: true,
            html: true,
            ..Self::default()
        }
    }

    /// Enables or disables error recovery mode.
    #[must_use]
    pub fn recover(mut self, yes: bool) -> Self {
        self.recover = yes;
        self
    }

    /// Enables or disables stripping of blank text nodes.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    /// Enables or disables generation of implied elements (html, head, body)
    /// in HTML mode. Fragments parsed with this set keep their top-level
    /// elements as siblings under the document node.
    #[must_use]
    pub fn no_implied(mut self, yes: bool) -> Self {
        self.no_implied = yes;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }

    /// Sets the maximum element/attribute name length in bytes.
    #[must_use]
    pub fn max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max;
        self
    }
}

/// Parses an XML string with default options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed XML.
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses an HTML string. Never fails on malformed markup.
///
/// # Errors
///
/// Returns `ParseError` only when a configured security limit is exceeded.
pub fn parse_html(input: &str) -> Result<Document, ParseError> {
    parse_str_with_options(input, &ParseOptions::html())
}

/// Parses a string with the given options.
///
/// # Errors
///
/// Returns `ParseError` if the input is malformed and recovery is disabled,
/// or if a security limit is exceeded.
#[tracing::instrument(level = "debug", skip_all, fields(len = input.len(), html = options.html))]
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let doc = xml::TreeBuilder::new(input, options).build()?;
    tracing::debug!(
        nodes = doc.node_count(),
        diagnostics = doc.diagnostics.len(),
        "parsed document"
    );
    Ok(doc)
}

impl Document {
    /// Parses an XML string into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is not well-formed XML.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlquery::Document;
    ///
    /// let doc = Document::parse_str("<root><child/></root>").unwrap();
    /// assert!(doc.root_element().is_some());
    /// ```
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        parse_str(input)
    }

    /// Parses an HTML string into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` only when a security limit is exceeded.
    pub fn parse_html(input: &str) -> Result<Self, ParseError> {
        parse_html(input)
    }

    /// Parses XML from raw bytes, detecting the encoding from the BOM and
    /// the XML declaration.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the bytes cannot be decoded or the resulting
    /// text is not well-formed XML.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlquery::Document;
    ///
    /// let doc = Document::parse_bytes(b"\xEF\xBB\xBF<root/>").unwrap();
    /// assert_eq!(doc.node_name(doc.root_element().unwrap()), Some("root"));
    /// ```
    pub fn parse_bytes(input: &[u8]) -> Result<Self, ParseError> {
        let text = crate::encoding::decode_to_utf8(input)?;
        parse_str(&text)
    }
}
