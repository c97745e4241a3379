//! Cleaning up definition text for display

/// Shown when a definition could not be fetched
pub const DEFINITION_UNAVAILABLE: &str = "Definition not available.";

/// Tags removed wholesale (tag name match, any attributes)
const STRIPPED_TAGS: [&str; 3] = ["em", "xref", "internalXref"];

/// Remove dictionary markup tags (`<em>`, `<xref>`, `<internalXref ...>` and
/// their closing tags) from a definition. Other text, including unknown
/// tags, is left alone.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find('>') {
            Some(end) if is_stripped_tag(&tail[1..end]) => {
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_stripped_tag(inner: &str) -> bool {
    let name = inner.strip_prefix('/').unwrap_or(inner);
    let name = name
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default();
    STRIPPED_TAGS.contains(&name)
}

/// Text to display for a finished lookup
pub fn display_text(lookup: Option<&str>) -> String {
    match lookup {
        Some(raw) if !raw.trim().is_empty() => strip_markup(raw).trim().to_string(),
        _ => DEFINITION_UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(
            strip_markup("A <em>very</em> small cat."),
            "A very small cat."
        );
    }

    #[test]
    fn test_strip_xrefs() {
        assert_eq!(
            strip_markup("See <xref>kitten</xref> and <internalXref urlencoded=\"cub\">cub</internalXref>."),
            "See kitten and cub."
        );
    }

    #[test]
    fn test_unknown_tags_kept() {
        assert_eq!(strip_markup("<b>bold</b>"), "<b>bold</b>");
        assert_eq!(strip_markup("x < y and y > z"), "x < y and y > z");
        assert_eq!(strip_markup("unclosed <em"), "unclosed <em");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("A plain definition."), "A plain definition.");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_display_text_fallback() {
        assert_eq!(display_text(None), DEFINITION_UNAVAILABLE);
        assert_eq!(display_text(Some("   ")), DEFINITION_UNAVAILABLE);
        assert_eq!(display_text(Some(" <em>Wet</em> weather. ")), "Wet weather.");
    }
}
