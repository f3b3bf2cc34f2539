//! HTML element and entity tables used by the lenient parsing mode and the
//! serializer.

/// Returns true if the given tag name (lowercase) is a void element that
/// must not have content.
pub(crate) fn is_void_element(tag: &[u8]) -> bool {
    matches!(
        tag,
        b"area"
            | b"base"
            | b"br"
            | b"col"
            | b"embed"
            | b"hr"
            | b"img"
            | b"input"
            | b"link"
            | b"meta"
            | b"param"
            | b"source"
            | b"track"
            | b"wbr"
            | b"basefont"
            | b"frame"
            | b"isindex"
    )
}

/// Returns true if `tag` is a raw text element whose content is not parsed
/// as markup (script, style).
pub(crate) fn is_raw_text_element(tag: &[u8]) -> bool {
    matches!(tag, b"script" | b"style")
}

/// Returns true if `tag` belongs in `<head>` when it appears before any
/// body content.
pub(crate) fn is_head_content_element(tag: &[u8]) -> bool {
    matches!(
        tag,
        b"title" | b"meta" | b"link" | b"base" | b"style" | b"script" | b"noscript"
    )
}

/// Returns true if opening `tag` implicitly closes an open `open_tag`.
///
/// A `<p>` closes a previous `<p>`, a `<li>` a previous `<li>`, and so on,
/// following the optional end tag rules of HTML 4.01.
pub(crate) fn auto_closes(open_tag: &[u8], tag: &[u8]) -> bool {
    match open_tag {
        b"p" => matches!(
            tag,
            b"p" | b"div"
                | b"ul"
                | b"ol"
                | b"dl"
                | b"pre"
                | b"table"
                | b"blockquote"
                | b"h1"
                | b"h2"
                | b"h3"
                | b"h4"
                | b"h5"
                | b"h6"
                | b"hr"
                | b"form"
                | b"section"
                | b"article"
                | b"header"
                | b"footer"
                | b"nav"
        ),
        b"li" => tag == b"li",
        b"dt" | b"dd" => matches!(tag, b"dt" | b"dd"),
        b"tr" => tag == b"tr",
        b"td" | b"th" => matches!(tag, b"td" | b"th" | b"tr"),
        b"option" => matches!(tag, b"option" | b"optgroup"),
        b"head" => tag == b"body",
        _ => false,
    }
}

/// Looks up a named character reference (without `&` and `;`).
///
/// Only the commonly used subset of the HTML 4 entity set is known; an
/// unknown name is kept verbatim by the parser.
pub(crate) fn lookup_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{A0}",
        "copy" => "\u{A9}",
        "reg" => "\u{AE}",
        "trade" => "\u{2122}",
        "deg" => "\u{B0}",
        "plusmn" => "\u{B1}",
        "times" => "\u{D7}",
        "divide" => "\u{F7}",
        "middot" => "\u{B7}",
        "para" => "\u{B6}",
        "sect" => "\u{A7}",
        "laquo" => "\u{AB}",
        "raquo" => "\u{BB}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "euro" => "\u{20AC}",
        "pound" => "\u{A3}",
        "yen" => "\u{A5}",
        "cent" => "\u{A2}",
        "eacute" => "\u{E9}",
        "egrave" => "\u{E8}",
        "agrave" => "\u{E0}",
        "ccedil" => "\u{E7}",
        "uuml" => "\u{FC}",
        "ouml" => "\u{F6}",
        "auml" => "\u{E4}",
        "szlig" => "\u{DF}",
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element(b"br"));
        assert!(is_void_element(b"meta"));
        assert!(!is_void_element(b"div"));
        assert!(!is_void_element(b"BR"));
    }

    #[test]
    fn test_auto_closes() {
        assert!(auto_closes(b"p", b"div"));
        assert!(auto_closes(b"li", b"li"));
        assert!(!auto_closes(b"li", b"ul"));
        assert!(!auto_closes(b"div", b"p"));
    }

    #[test]
    fn test_head_content_elements() {
        assert!(is_head_content_element(b"title"));
        assert!(is_head_content_element(b"script"));
        assert!(!is_head_content_element(b"p"));
    }

    #[test]
    fn test_lookup_entity() {
        assert_eq!(lookup_entity("nbsp"), Some("\u{A0}"));
        assert_eq!(lookup_entity("amp"), Some("&"));
        assert_eq!(lookup_entity("bogus"), None);
    }
}
