//! `QName` (qualified name) handling.
//!
//! A `QName` is `prefix:localname` or just `localname`. Parsers split names
//! on the way into the node graph (the prefix moves to the namespace table);
//! the serializer joins them again on the way out.
//!
//! See <https://www.w3.org/TR/xml-names/#NT-QName>

/// Splits a `QName` into its prefix and local name parts.
///
/// Only the first colon splits.
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.find(':') {
        Some(pos) => (Some(&qname[..pos]), &qname[pos + 1..]),
        None => (None, qname),
    }
}

/// Returns `true` if `name` is a legal `QName`: at most one colon, and
/// neither side of it empty.
#[must_use]
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        None => true,
        Some((prefix, local)) => !prefix.is_empty() && !local.is_empty() && !local.contains(':'),
    }
}

/// Appends `prefix:local` (or `local` alone) to `out`, reading raw name
/// bytes lossily.
pub fn push_qualified(out: &mut String, prefix: Option<&[u8]>, local: &[u8]) {
    if let Some(prefix) = prefix {
        out.push_str(&String::from_utf8_lossy(prefix));
        out.push(':');
    }
    out.push_str(&String::from_utf8_lossy(local));
}
