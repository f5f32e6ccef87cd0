//! Defines the [`Post`] type, the summary of one YouTube video, and
//! [`PostSummary`], the subset of a post shown in listings.

use crate::tag::Tag;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A post as loaded from its MDX source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// Sequential id, assigned in source file-name order starting at 1.
    pub id: u64,

    pub title: String,

    /// The file name without its `.mdx` extension (or the bundle directory
    /// name).
    pub slug: String,

    /// The raw MDX body, everything after the frontmatter.
    pub content: String,

    pub excerpt: Option<String>,

    /// The id of the summarized YouTube video.
    pub video_id: String,

    pub video_url: String,

    pub published_at: DateTime<Utc>,

    /// The modification time of the source file.
    pub updated_at: DateTime<Utc>,

    pub tags: Vec<Tag>,

    pub reading_time_minutes: u32,
}

impl Post {
    /// Returns true if the post carries a tag named exactly `name`.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Returns the fields of the post shown in listings.
    pub fn summarize(&self) -> PostSummary<'_> {
        PostSummary {
            id: self.id,
            title: &self.title,
            slug: &self.slug,
            excerpt: self.excerpt.as_deref(),
            published_at: self.published_at,
            tags: self.tags.iter().map(|t| t.name.as_str()).collect(),
            reading_time_minutes: self.reading_time_minutes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary<'a> {
    pub id: u64,
    pub title: &'a str,
    pub slug: &'a str,
    pub excerpt: Option<&'a str>,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<&'a str>,
    pub reading_time_minutes: u32,
}

#[cfg(test)]
impl Post {
    /// Builds a post for tests. The publish date moves forward one day per
    /// id, so higher ids are more recent.
    pub(crate) fn fixture(id: u64, title: &str, tags: Vec<Tag>) -> Post {
        use chrono::{Duration, TimeZone};
        let published_at =
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap() + Duration::days(id as i64);
        Post {
            id,
            title: title.to_owned(),
            slug: format!("post-{}", id),
            content: format!("Content {}", id),
            excerpt: Some(format!("Excerpt {}", id)),
            video_id: format!("vid{}", id),
            video_url: format!("https://www.youtube.com/watch?v=vid{}", id),
            published_at,
            updated_at: published_at,
            tags,
            reading_time_minutes: 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tag(id: u64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_owned(),
            slug: name.to_lowercase(),
        }
    }

    #[test]
    fn test_has_tag() {
        let post = Post::fixture(1, "Post", vec![tag(1, "Rust"), tag(2, "機械学習")]);
        assert!(post.has_tag("Rust"));
        assert!(post.has_tag("機械学習"));
        assert!(!post.has_tag("rust"));
    }

    #[test]
    fn test_summarize() {
        let post = Post::fixture(3, "Three", vec![tag(1, "Rust")]);
        let summary = post.summarize();
        assert_eq!("Three", summary.title);
        assert_eq!("post-3", summary.slug);
        assert_eq!(Some("Excerpt 3"), summary.excerpt);
        assert_eq!(vec!["Rust"], summary.tags);
    }

    #[test]
    fn test_summary_serializes_camel_case() -> serde_json::Result<()> {
        let post = Post::fixture(1, "One", vec![]);
        let value = serde_json::to_value(post.summarize())?;
        assert_eq!(serde_json::json!("2025-05-02T00:00:00Z"), value["publishedAt"]);
        assert_eq!(serde_json::json!(1), value["readingTimeMinutes"]);
        Ok(())
    }
}
