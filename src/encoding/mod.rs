//! Charset lookup and transcoding.
//!
//! Documents name their encoding with an IANA charset label (`encoding="…"`
//! in the XML declaration, `<meta charset>` in HTML). [`lookup_charset`] maps
//! such a label onto an `encoding_rs` encoding; anything it does not know is
//! reported as unrecognized rather than guessed.
//!
//! The remaining functions turn raw bytes into UTF-8 for the parser:
//!
//! 1. Check for a Byte Order Mark (BOM).
//! 2. Without a BOM, assume UTF-8 (XML 1.0 §4.3.3).
//! 3. Let an `encoding=` label in the XML declaration override that guess.

pub use encoding_rs::Encoding;

use crate::error::EncodingError;

/// Maps a charset label onto a known encoding.
///
/// Matching ignores ASCII case and surrounding whitespace, and understands
/// the WHATWG aliases (`latin1`, `utf8`, `sjis`, …). Unknown labels give
/// `None`.
///
/// # Examples
///
/// ```
/// use xmlquery::encoding::lookup_charset;
///
/// assert_eq!(lookup_charset("Utf-8"), Some(encoding_rs::UTF_8));
/// assert_eq!(lookup_charset("x-bogus"), None);
/// ```
#[must_use]
pub fn lookup_charset(label: &str) -> Option<&'static Encoding> {
    let found = Encoding::for_label(label.as_bytes());
    if found.is_none() {
        tracing::debug!(label, "unrecognized charset label");
    }
    found
}

/// Detects the encoding of a byte stream from its Byte Order Mark.
///
/// Returns the encoding and the number of BOM bytes to skip. Without a BOM
/// the answer is UTF-8 with nothing to skip.
///
/// # Examples
///
/// ```
/// use xmlquery::encoding::detect_encoding;
///
/// let (enc, skip) = detect_encoding(b"\xEF\xBB\xBFhello");
/// assert_eq!(enc, encoding_rs::UTF_8);
/// assert_eq!(skip, 3);
/// ```
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    Encoding::for_bom(bytes).unwrap_or((encoding_rs::UTF_8, 0))
}

/// Transcodes bytes in the labelled encoding into a UTF-8 `String`.
///
/// # Errors
///
/// Returns `EncodingError` if the label is not recognized or the input
/// contains malformed byte sequences.
pub fn transcode(bytes: &[u8], label: &str) -> Result<String, EncodingError> {
    let encoding = lookup_charset(label)
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))?;
    decode_with(bytes, encoding)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, EncodingError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError::new(format!(
            "malformed byte sequence for encoding {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Decodes raw document bytes into UTF-8, detecting the encoding.
///
/// A BOM wins over everything else. Otherwise the bytes are read as UTF-8
/// unless the XML declaration names a different encoding, in which case they
/// are transcoded from that.
///
/// # Errors
///
/// Returns `EncodingError` for invalid byte sequences or an unsupported
/// declared encoding.
///
/// # Examples
///
/// ```
/// use xmlquery::encoding::decode_to_utf8;
///
/// let text = decode_to_utf8(b"<?xml version=\"1.0\"?><root/>").unwrap();
/// assert!(text.ends_with("<root/>"));
/// ```
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    let (bom_encoding, bom_len) = detect_encoding(bytes);
    let content = &bytes[bom_len..];

    if bom_len > 0 {
        return decode_with(content, bom_encoding);
    }

    // The XML declaration is ASCII in every encoding we can transcode from,
    // so the label can be read off the raw bytes.
    match declared_encoding(content) {
        Some(label) if lookup_charset(&label) != Some(encoding_rs::UTF_8) => {
            transcode(content, &label)
        }
        _ => std::str::from_utf8(content)
            .map(str::to_string)
            .map_err(|_| EncodingError::new("input is not valid UTF-8")),
    }
}

/// Reads the `encoding` pseudo-attribute out of a leading XML declaration.
pub(crate) fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let scan = &bytes[..bytes.len().min(200)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..decl_end];

    let needle = b"encoding";
    let pos = decl.windows(needle.len()).position(|w| w == needle)?;
    let rest = skip_ascii_whitespace(&decl[pos + needle.len()..]);
    let rest = skip_ascii_whitespace(rest.strip_prefix(b"=")?);

    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let end = value.iter().position(|&b| b == quote)?;
    let label = &value[..end];
    label
        .is_ascii()
        .then(|| String::from_utf8_lossy(label).into_owned())
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[skip..]
}
