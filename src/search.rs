//! Substring search over posts, with pagination.

use crate::post::Post;

/// The number of results per page when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of search results.
#[derive(Debug)]
pub struct SearchResult<'a> {
    /// The posts on the requested page, most recently published first.
    pub posts: Vec<&'a Post>,

    /// The number of posts matching the query across all pages.
    pub total: usize,

    /// The 1-based page number.
    pub page: usize,

    /// The maximum number of posts per page.
    pub limit: usize,
}

impl SearchResult<'_> {
    /// The number of pages needed to show every match.
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        match self.total % self.limit {
            0 => self.total / self.limit,
            _ => self.total / self.limit + 1,
        }
    }
}

/// Returns true if `post` matches the already-normalized `query` in its
/// title, any tag name, its excerpt or its content.
fn matches(post: &Post, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);
    contains(post.title.as_str())
        || post.tags.iter().any(|tag| contains(tag.name.as_str()))
        || post.excerpt.as_deref().is_some_and(contains)
        || contains(post.content.as_str())
}

/// Searches `posts` for `query`, ignoring case, and returns page `page`
/// (1-based; 0 is treated as 1) of `limit` results. An empty query matches
/// every post.
pub fn search_posts<'a>(
    posts: &'a [Post],
    query: &str,
    page: usize,
    limit: usize,
) -> SearchResult<'a> {
    let query = query.trim().to_lowercase();
    let page = page.max(1);

    let mut hits: Vec<&Post> = posts
        .iter()
        .filter(|post| query.is_empty() || matches(post, &query))
        .collect();
    hits.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let total = hits.len();
    let skip = (page - 1).saturating_mul(limit);
    SearchResult {
        posts: hits.into_iter().skip(skip).take(limit).collect(),
        total,
        page,
        limit,
    }
}
