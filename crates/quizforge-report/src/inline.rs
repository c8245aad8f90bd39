//! Inline markdown for prompts and choices.

use pulldown_cmark::{html, Event, Options, Parser};

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a short markdown fragment to HTML.
///
/// Raw HTML in the source is escaped rather than passed through, and a
/// single enclosing paragraph is removed so the result can sit inside a
/// `<label>` or `<legend>`.
pub fn render_inline(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);

    let trimmed = out.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_special_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn emphasis_and_code() {
        assert_eq!(
            render_inline("Which **command** runs `git init`?"),
            "Which <strong>command</strong> runs <code>git init</code>?"
        );
    }

    #[test]
    fn strikethrough() {
        assert_eq!(render_inline("~~CVS~~ Git"), "<del>CVS</del> Git");
    }

    #[test]
    fn plain_text_has_no_paragraph() {
        assert_eq!(render_inline("2+2?"), "2+2?");
        assert_eq!(render_inline("4"), "4");
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_inline("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn multiple_paragraphs_are_kept() {
        let html = render_inline("first\n\nsecond");
        assert!(html.starts_with("<p>first</p>"));
        assert!(html.contains("<p>second</p>"));
    }
}
