//! Converts MDX post bodies to HTML and to plain text with
//! [`pulldown_cmark`]. JSX elements are HTML as far as the parser is
//! concerned, so they pass through [`to_html`] untouched and are dropped by
//! [`to_plain_text`].

use crate::heading::extract_headings_with_offsets;
use pulldown_cmark::{html, Event, Options, Parser, Tag};
use std::collections::HashMap;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts `markdown` to HTML. Every heading that
/// [`crate::heading::extract_headings`] reports is rendered with the same id,
/// so table-of-contents links land on it.
pub fn to_html(markdown: &str) -> String {
    let anchors: HashMap<usize, String> = extract_headings_with_offsets(markdown)
        .into_iter()
        .map(|(offset, heading)| (offset, heading.id.to_string()))
        .collect();

    let events = Parser::new_ext(markdown, options())
        .into_offset_iter()
        .map(|(ev, range)| match ev {
            Event::Start(Tag::Heading(level, None, classes)) => {
                let id = anchors.get(&range.start).map(String::as_str);
                Event::Start(Tag::Heading(level, id, classes))
            }
            _ => ev,
        });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Extracts the readable text of `markdown`: text and inline code, with
/// block boundaries turned into newlines. Raw HTML, JSX and link targets are
/// dropped.
pub fn to_plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for ev in Parser::new_ext(markdown, options()) {
        match ev {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                out.push('\n')
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_html_heading_ids() {
        let markdown = "# Title\n\n## Getting Started\n\ntext\n\n### 準備\n\n#### Step One\n";
        let html = to_html(markdown);
        assert!(html.contains("<h1>Title</h1>"), "{}", html);
        assert!(html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#), "{}", html);
        assert!(html.contains(r#"<h3 id="heading-3-1">準備</h3>"#), "{}", html);
        assert!(html.contains(r#"<h4 id="step-one">Step One</h4>"#), "{}", html);
    }

    #[test]
    fn test_to_html_matches_outline_ids_for_duplicates() {
        let markdown = "## 日本語の見出し\n\n本文\n\n## 日本語の見出し\n";
        let html = to_html(markdown);
        assert!(html.contains(r#"<h2 id="heading-2-0">"#), "{}", html);
        assert!(html.contains(r#"<h2 id="heading-2-1">"#), "{}", html);
    }

    #[test]
    fn test_to_html_extensions() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<table>"), "{}", html);
        assert!(html.contains("<del>gone</del>"), "{}", html);
        assert!(html.contains(r#"type="checkbox""#), "{}", html);
    }

    #[test]
    fn test_to_html_passes_jsx_through() {
        let html = to_html("<YouTube id=\"abc\" />\n\nBody\n");
        assert!(html.contains("<YouTube id=\"abc\" />"), "{}", html);
        assert!(html.contains("<p>Body</p>"), "{}", html);
    }

    #[test]
    fn test_to_plain_text() {
        let markdown = "## 概要\n\n\
            これは**要約**です。`code` と [リンク](https://example.com)。\n\n\
            <YouTube id=\"abc\" />\n\n\
            - 一つ目\n- 二つ目\n";
        let text = to_plain_text(markdown);
        assert!(text.contains("概要"));
        assert!(text.contains("これは要約です。code と リンク。"));
        assert!(text.contains("一つ目"));
        assert!(!text.contains("YouTube"));
        assert!(!text.contains("https://example.com"));
        assert!(!text.contains("**"));
    }
}
