//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag,
//! along with tag aggregation and slug resolution for tag pages.
//!
//! Tags are keyed by name: two [`Tag`] records with the same `name` are the
//! same tag as far as counting and filtering go, even if their ids differ.

use crate::post::Post;
use crate::slug::{decode_slug, sync_slug, tag_to_slug};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Represents a [`crate::post::Post`] tag as it is stored: `name` is the
/// free text from the post's frontmatter and `slug` is the stored slug
/// ([`sync_slug`]), which need not agree with [`tag_to_slug`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// A distinct tag name and the number of posts in a batch that carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    pub name: String,

    /// Always [`tag_to_slug`] of `name`.
    pub slug: String,

    pub count: usize,
}

/// Assigns ids to tags as posts are loaded. Tags are upserted by stored
/// slug, so `Machine Learning` and `machine learning` become one tag named
/// after whichever was seen first.
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: Vec<Tag>,
    by_slug: HashMap<String, usize>,
}

impl TagRegistry {
    pub fn new() -> TagRegistry {
        TagRegistry::default()
    }

    /// Returns the tag stored under `name`'s slug, creating it if needed.
    pub fn upsert(&mut self, name: &str) -> &Tag {
        let slug = sync_slug(name);
        let index = match self.by_slug.get(&slug) {
            Some(index) => *index,
            None => {
                let index = self.tags.len();
                self.tags.push(Tag {
                    id: index as u64 + 1,
                    name: name.to_owned(),
                    slug: slug.clone(),
                });
                self.by_slug.insert(slug, index);
                index
            }
        };
        &self.tags[index]
    }

    /// Resolves a post's tag names into tags, dropping names that resolve
    /// to a tag the post already has.
    pub fn attach<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<Tag> {
        let mut attached: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names {
            let tag = self.upsert(name.as_ref());
            if !attached.iter().any(|t| t.id == tag.id) {
                attached.push(tag.clone());
            }
        }
        attached
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// Collects the distinct tag names used by `posts` and counts how many times
/// each appears. The result is sorted by count, most used first; tags with
/// equal counts stay in the order they were first encountered.
pub fn get_all_tags(posts: &[Post]) -> Vec<TagWithCount> {
    let mut tags: Vec<TagWithCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tag in posts.iter().flat_map(|post| post.tags.iter()) {
        match positions.get(tag.name.as_str()) {
            Some(&i) => tags[i].count += 1,
            None => {
                positions.insert(&tag.name, tags.len());
                tags.push(TagWithCount {
                    name: tag.name.clone(),
                    slug: tag_to_slug(&tag.name),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, which keeps ties in encounter order.
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

/// Returns the posts carrying a tag named exactly `name`, in their original
/// order.
pub fn get_posts_by_tag<'a>(posts: &'a [Post], name: &str) -> Vec<&'a Post> {
    posts.iter().filter(|post| post.has_tag(name)).collect()
}

/// Maps a slug from a tag page URL back to the tag's name. Stops at the
/// first of these that matches:
///
/// 1. the slug equals a tag's slug;
/// 2. the slug contains `%` and its decoded form equals a tag's slug or,
///    ignoring case, its name;
/// 3. the slug equals a tag's name ignoring case, or the slug freshly
///    derived from the name.
pub fn find_tag_by_slug<'a>(slug: &str, tags: &'a [TagWithCount]) -> Option<&'a str> {
    if let Some(tag) = tags.iter().find(|tag| tag.slug == slug) {
        return Some(tag.name.as_str());
    }

    if slug.contains('%') {
        match decode_slug(slug) {
            Ok(decoded) => {
                let lowered = decoded.to_lowercase();
                if let Some(tag) = tags
                    .iter()
                    .find(|tag| tag.slug == decoded || tag.name.to_lowercase() == lowered)
                {
                    return Some(tag.name.as_str());
                }
            }
            Err(e) => debug!(slug, error = %e, "could not decode tag slug"),
        }
    }

    let lowered = slug.to_lowercase();
    tags.iter()
        .find(|tag| tag.name.to_lowercase() == lowered || tag_to_slug(&tag.name) == slug)
        .map(|tag| tag.name.as_str())
}
