//! Attribute value escaping.

use std::borrow::Cow;

/// Escape `&`, `"`, `<` and `>` for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Resolve XML named entities and numeric character references.
///
/// Anything that is not a recognised reference is kept verbatim.
#[must_use]
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match rest.find(';').and_then(|end| Some((resolve(&rest[1..end])?, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let n = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough_borrows() {
        assert!(matches!(escape_attr("plain #fff"), Cow::Borrowed(_)));
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(
            escape_attr(r#"Say "hi" <now> & later"#),
            "Say &quot;hi&quot; &lt;now&gt; &amp; later"
        );
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape("a &lt;b&gt; &amp; &quot;c&quot; &apos;d&apos;"), r#"a <b> & "c" 'd'"#);
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
    }

    #[test]
    fn test_unescape_keeps_unknown_references() {
        assert_eq!(unescape("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(unescape("&nbsp;&amp;"), "&nbsp;&");
        assert_eq!(unescape("&#xZZ; &"), "&#xZZ; &");
    }

    #[test]
    fn test_escape_then_unescape_restores_text() {
        let text = r#"<Button Content="&amp;">"#;
        assert_eq!(unescape(&escape_attr(text)), text);
    }
}
