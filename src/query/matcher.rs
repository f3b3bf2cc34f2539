//! Case-insensitive name matching.
//!
//! A [`NameKey`] compares itself against the raw name bytes stored in the
//! node graph. Folding is ASCII-only: `A`-`Z` match `a`-`z`, every other
//! byte (including all non-ASCII) must be identical. This is deliberately
//! narrower than Unicode case folding, so `<STRASSE>` does not match
//! `straße`.
//!
//! Two kinds of key exist and always agree with each other:
//!
//! - dynamic keys: `str`, `String` and `[u8]`, for names that arrive at run
//!   time;
//! - [`StaticKey`], built in a `const` context from a string literal and
//!   compared straight from its `'static` bytes.

use std::fmt;

/// A value that can decide whether a raw node name matches it.
///
/// The walker depends on this trait only, never on a concrete key type.
pub trait NameKey {
    /// Returns `true` iff `name` is present and equal to this key under
    /// ASCII case folding. An absent name never matches.
    fn matches_name(&self, name: Option<&[u8]>) -> bool;
}

#[inline]
fn ascii_matches(key: &[u8], name: Option<&[u8]>) -> bool {
    name.is_some_and(|name| name.eq_ignore_ascii_case(key))
}

impl NameKey for str {
    fn matches_name(&self, name: Option<&[u8]>) -> bool {
        ascii_matches(self.as_bytes(), name)
    }
}

impl NameKey for String {
    fn matches_name(&self, name: Option<&[u8]>) -> bool {
        ascii_matches(self.as_bytes(), name)
    }
}

impl NameKey for [u8] {
    fn matches_name(&self, name: Option<&[u8]>) -> bool {
        ascii_matches(self, name)
    }
}

impl<K: NameKey + ?Sized> NameKey for &K {
    fn matches_name(&self, name: Option<&[u8]>) -> bool {
        (**self).matches_name(name)
    }
}

/// A match key over a compile-time string literal.
///
/// ```
/// use xmlquery::query::{NameKey, StaticKey};
///
/// const BODY: StaticKey = StaticKey::new("body");
/// assert!(BODY.matches_name(Some(b"BODY")));
/// assert!(!BODY.matches_name(None));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticKey(&'static [u8]);

impl StaticKey {
    /// Wraps a string literal.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name.as_bytes())
    }

    /// The key's bytes, exactly as written.
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        self.0
    }
}

impl NameKey for StaticKey {
    fn matches_name(&self, name: Option<&[u8]>) -> bool {
        ascii_matches(self.0, name)
    }
}

impl fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticKey({:?})", String::from_utf8_lossy(self.0))
    }
}
