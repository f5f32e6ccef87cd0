//! Slug derivations for tag names. A tag can end up with two different slugs:
//! the one computed by [`tag_to_slug`] for tag pages, and the one stored by
//! the content sync ([`sync_slug`]). They agree for plain Latin names and
//! disagree for names with punctuation or non-Latin script, which is why
//! [`crate::tag::find_tag_by_slug`] tries both.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Characters `encodeURIComponent` leaves untouched. Everything else gets
/// percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static SPECIAL_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Returns true for Japanese kana, CJK ideographs, CJK punctuation and the
/// half/full-width forms.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303f}'
        | '\u{3040}'..='\u{309f}'
        | '\u{30a0}'..='\u{30ff}'
        | '\u{ff00}'..='\u{ff9f}'
        | '\u{4e00}'..='\u{9faf}'
        | '\u{3400}'..='\u{4dbf}')
}

/// Converts a tag name into the slug used in tag page URLs.
///
/// Names containing any CJK character are lower-cased, trimmed and
/// percent-encoded whole, so the full text survives in an ASCII-safe form.
/// Other names are reduced to `[a-z0-9_-]`: punctuation is dropped,
/// whitespace runs become a single hyphen, and hyphens never repeat or lead
/// or trail.
///
/// ```
/// use matome::slug::tag_to_slug;
///
/// assert_eq!(tag_to_slug("Web Development"), "web-development");
/// assert_eq!(tag_to_slug("日本語"), "%E6%97%A5%E6%9C%AC%E8%AA%9E");
/// ```
pub fn tag_to_slug(name: &str) -> String {
    if name.chars().any(is_cjk) {
        let normalized = name.trim().to_lowercase();
        return utf8_percent_encode(&normalized, URI_COMPONENT).to_string();
    }

    let lowered = name.to_lowercase();
    let stripped = SPECIAL_CHARACTERS.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}

/// The slug content sync stores alongside a tag: lower-case with whitespace
/// runs turned into hyphens, and nothing else removed.
pub fn sync_slug(name: &str) -> String {
    WHITESPACE_RUNS
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// Decodes a percent-encoded slug. Unlike [`percent_decode_str`] on its own
/// this rejects a `%` that isn't followed by two hex digits, in addition to
/// byte sequences that aren't UTF-8.
pub fn decode_slug(slug: &str) -> Result<String, DecodeError> {
    let bytes = slug.as_bytes();
    for (offset, _) in slug.match_indices('%') {
        let escape = bytes.get(offset + 1..offset + 3);
        if !matches!(escape, Some(e) if e.iter().all(u8::is_ascii_hexdigit)) {
            return Err(DecodeError::MalformedEscape(offset));
        }
    }

    percent_decode_str(slug)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(DecodeError::InvalidUtf8)
}

/// Represents a slug that couldn't be percent-decoded.
#[derive(Debug)]
pub enum DecodeError {
    /// A `%` at the given byte offset isn't followed by two hex digits.
    MalformedEscape(usize),

    /// The decoded bytes aren't valid UTF-8.
    InvalidUtf8(std::str::Utf8Error),
}

impl fmt::Display for DecodeError {
    /// Displays a [`DecodeError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::MalformedEscape(offset) => {
                write!(f, "malformed percent escape at byte {}", offset)
            }
            DecodeError::InvalidUtf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for DecodeError {
    /// Implements the [`std::error::Error`] trait for [`DecodeError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::MalformedEscape(_) => None,
            DecodeError::InvalidUtf8(err) => Some(err),
        }
    }
}
