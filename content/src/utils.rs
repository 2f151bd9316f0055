//! Text helpers for rendering node excerpts

/// Shorten `text` to at most `max_chars` characters, ending with an ellipsis
/// when cut. Counts characters rather than bytes so Arabic text is not split
/// inside a code point.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }

    let mut chars = text.chars();
    let kept: String = chars.by_ref().take(max_chars - 3).collect();
    let ends_on_word = chars.next().map_or(true, char::is_whitespace);
    // Prefer cutting at a word boundary
    let kept = match kept.rfind(char::is_whitespace) {
        _ if ends_on_word => kept.trim_end().to_string(),
        Some(idx) if idx > 0 => kept[..idx].trim_end().to_string(),
        _ => kept,
    };
    format!("{}...", kept)
}

/// First paragraph of `content`, shortened to `max_chars`
pub fn extract_summary(content: &str, max_chars: usize) -> String {
    let first_paragraph = content
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or_default();

    truncate_with_ellipsis(first_paragraph, max_chars)
}

/// Plain text of an HTML fragment.
///
/// Drops tags and the contents of `<script>`/`<style>`, decodes the common
/// entities and collapses whitespace. Not a sanitizer; its output contains no
/// markup at all.
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();
    let mut skipping: Option<&'static str> = None;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                let closing = tag.starts_with('/');
                match (skipping, closing, name.as_str()) {
                    (None, false, "script") => skipping = Some("script"),
                    (None, false, "style") => skipping = Some("style"),
                    (Some(open), true, name) if name == open => skipping = None,
                    // Block-level tags separate words
                    (None, _, "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "h4") => {
                        result.push(' ')
                    }
                    _ => {}
                }
            }
            _ if in_tag => tag.push(c),
            _ if skipping.is_none() => result.push(c),
            _ => {}
        }
    }

    let decoded = result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Short", 10), "Short");
        assert_eq!(
            truncate_with_ellipsis("This is a long string", 12),
            "This is a..."
        );
        assert_eq!(truncate_with_ellipsis("Test", 4), "Test");
        assert_eq!(truncate_with_ellipsis("Test", 3), "Tes");
        assert_eq!(truncate_with_ellipsis("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "حماية البيانات الشخصية";
        let cut = truncate_with_ellipsis(text, 10);
        assert_eq!(cut, "حماية...");
        assert!(cut.chars().count() <= 10);
    }

    #[test]
    fn test_extract_summary() {
        let content = "\n\nFirst paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        assert_eq!(extract_summary(content, 20), "First paragraph.");

        let long_first = "This is a very long first paragraph that should be truncated.";
        assert_eq!(extract_summary(long_first, 20), "This is a very...");
        assert_eq!(extract_summary("", 20), "");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<p>Hello <b>World</b></p>"), "Hello World");
        assert_eq!(strip_html_tags("No tags here"), "No tags here");
        assert_eq!(
            strip_html_tags("<div>  Multiple  spaces  </div>"),
            "Multiple spaces"
        );
        assert_eq!(strip_html_tags("<p>One</p><p>Two</p>"), "One Two");
    }

    #[test]
    fn test_strip_html_drops_scripts_and_decodes_entities() {
        assert_eq!(
            strip_html_tags("<p>Safe &amp; sound</p><script>alert('x')</script><style>p{}</style>"),
            "Safe & sound"
        );
    }
}
