//! Table-of-contents extraction. Headings are found by scanning the raw
//! document line by line, without parsing it, so the outline is available
//! even for MDX the markdown renderer can't make sense of.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{2,4})\s").unwrap());
static NON_ALPHANUMERIC_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A section heading in a document's outline. Only levels 2 through 4 are
/// extracted; the level-1 title is rendered separately from the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// The heading text, everything after the `#` marker and the whitespace
    /// character following it.
    pub text: String,

    /// The anchor id for the heading.
    pub id: HeadingId,

    /// The number of `#` characters in the marker (2-4).
    pub level: u8,
}

/// The anchor id of a [`Heading`]. A readable id is preferred; a positional
/// one is used only when the text has nothing left after normalization
/// (e.g., headings written entirely in Japanese).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadingId {
    /// The lower-cased heading text with every run of characters outside
    /// `[a-z0-9]` replaced by a single hyphen.
    Readable(String),

    /// Rendered as `heading-{level}-{index}`, where `index` is the heading's
    /// zero-based position among the extracted headings.
    Positional { level: u8, index: usize },
}

impl HeadingId {
    /// Derives the id for the heading at position `index`.
    pub fn new(text: &str, level: u8, index: usize) -> HeadingId {
        let lowered = text.to_lowercase();
        let readable = NON_ALPHANUMERIC_RUNS.replace_all(&lowered, "-");
        if readable.is_empty() || readable == "-" {
            HeadingId::Positional { level, index }
        } else {
            HeadingId::Readable(readable.into_owned())
        }
    }
}

impl fmt::Display for HeadingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeadingId::Readable(id) => f.write_str(id),
            HeadingId::Positional { level, index } => {
                write!(f, "heading-{}-{}", level, index)
            }
        }
    }
}

impl Serialize for HeadingId {
    /// Serializes the id as the string that appears in the `id` attribute.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a single line as a level 2-4 heading, returning the level and the
/// text.
pub(crate) fn parse_heading_line(line: &str) -> Option<(u8, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let marker = HEADING_MARKER.captures(line)?;
    let level = marker[1].len() as u8;
    Some((level, &line[marker[0].len()..]))
}

/// Extracts the level 2-4 headings from `content` in document order, along
/// with the byte offset of the line each one starts on.
pub(crate) fn extract_headings_with_offsets(content: &str) -> Vec<(usize, Heading)> {
    let mut headings = Vec::new();
    let mut offset = 0;
    for line in content.split('\n') {
        if let Some((level, text)) = parse_heading_line(line) {
            let id = HeadingId::new(text, level, headings.len());
            headings.push((
                offset,
                Heading {
                    text: text.to_owned(),
                    id,
                    level,
                },
            ));
        }
        offset += line.len() + 1;
    }
    headings
}

/// Extracts the outline of a markdown document: every line starting with
/// `##`, `###` or `####` followed by whitespace, in document order.
///
/// ```
/// use matome::heading::extract_headings;
///
/// let headings = extract_headings("# Title\n## Getting Started\n### 準備\n");
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[0].id.to_string(), "getting-started");
/// assert_eq!(headings[1].id.to_string(), "heading-3-1");
/// ```
pub fn extract_headings(content: &str) -> Vec<Heading> {
    extract_headings_with_offsets(content)
        .into_iter()
        .map(|(_, heading)| heading)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn readable(id: &str) -> HeadingId {
        HeadingId::Readable(id.to_owned())
    }

    #[test]
    fn test_extract_headings() {
        let content = "
# Main title (not extracted, only h2-h4)

## Getting Started
Some content here

### Installation
Installation steps

#### Prerequisites
Prerequisites content

## Configuration
Configuration instructions

### Advanced Configuration
Advanced configuration details
      ";

        let headings = extract_headings(content);
        let wanted = vec![
            Heading {
                text: "Getting Started".to_owned(),
                id: readable("getting-started"),
                level: 2,
            },
            Heading {
                text: "Installation".to_owned(),
                id: readable("installation"),
                level: 3,
            },
            Heading {
                text: "Prerequisites".to_owned(),
                id: readable("prerequisites"),
                level: 4,
            },
            Heading {
                text: "Configuration".to_owned(),
                id: readable("configuration"),
                level: 2,
            },
            Heading {
                text: "Advanced Configuration".to_owned(),
                id: readable("advanced-configuration"),
                level: 3,
            },
        ];
        assert_eq!(wanted, headings);
    }

    #[test]
    fn test_heading_id_new() {
        assert_eq!(readable("rust-tips"), HeadingId::new("Rust Tips", 2, 0));
        assert_eq!(readable("c-"), HeadingId::new("C++", 3, 4));
        assert_eq!(
            HeadingId::Positional { level: 3, index: 4 },
            HeadingId::new("所有権", 3, 4)
        );
        assert_eq!(HeadingId::Positional { level: 2, index: 0 }, HeadingId::new("", 2, 0));
    }

    #[test]
    fn test_extract_headings_without_headings() {
        assert!(extract_headings("").is_empty());
        let content = "\nThis is a paragraph.\nThis is another paragraph.\n";
        assert!(extract_headings(content).is_empty());
    }

    #[test]
    fn test_extract_headings_ignores_other_levels() {
        let content = "# One\n##### Five\n###### Six\n##NoSpace\n ## Indented\n## Two";
        let headings = extract_headings(content);
        assert_eq!(1, headings.len());
        assert_eq!("Two", headings[0].text);
        assert!(headings.iter().all(|h| (2..=4).contains(&h.level)));
    }

    #[test]
    fn test_heading_ids() {
        let content = "
## Special Characters: @#$%
## Multiple   Spaces   Here
## 日本語の見出し
## Mixed Case Heading
      ";

        let ids: Vec<String> = extract_headings(content)
            .iter()
            .map(|h| h.id.to_string())
            .collect();
        assert_eq!(
            vec![
                "special-characters-",
                "multiple-spaces-here",
                "heading-2-2",
                "mixed-case-heading",
            ],
            ids
        );
    }

    #[test]
    fn test_identical_cjk_headings_get_distinct_ids() {
        let content = "## 日本語の見出し\n本文\n## 日本語の見出し\n### ！？\n";
        let headings = extract_headings(content);
        assert_eq!(
            vec![
                HeadingId::Positional { level: 2, index: 0 },
                HeadingId::Positional { level: 2, index: 1 },
                HeadingId::Positional { level: 3, index: 2 },
            ],
            headings.into_iter().map(|h| h.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_extract_headings_is_repeatable() {
        let content = "## A\n### B\n## 見出し\n";
        assert_eq!(extract_headings(content), extract_headings(content));
    }

    #[test]
    fn test_extract_headings_crlf() {
        let headings = extract_headings("## Windows Line\r\nbody\r\n### Next\r\n");
        assert_eq!("Windows Line", headings[0].text);
        assert_eq!(readable("windows-line"), headings[0].id);
        assert_eq!(3, headings[1].level);
    }

    #[test]
    fn test_extract_headings_keeps_extra_whitespace_in_text() {
        let headings = extract_headings("##\t  Padded");
        assert_eq!("  Padded", headings[0].text);
        assert_eq!(readable("-padded"), headings[0].id);
    }

    #[test]
    fn test_extract_headings_offsets() {
        let content = "intro\n## First\ntext\n### Second";
        let offsets: Vec<usize> = extract_headings_with_offsets(content)
            .iter()
            .map(|(offset, _)| *offset)
            .collect();
        assert_eq!(vec![6, 20], offsets);
        assert!(content[20..].starts_with("### Second"));
    }

    #[test]
    fn test_heading_serializes_id_as_string() -> serde_json::Result<()> {
        let heading = Heading {
            text: "見出し".to_owned(),
            id: HeadingId::Positional { level: 4, index: 7 },
            level: 4,
        };
        assert_eq!(
            r#"{"text":"見出し","id":"heading-4-7","level":4}"#,
            serde_json::to_string(&heading)?
        );
        Ok(())
    }
}
