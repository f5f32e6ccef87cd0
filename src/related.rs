//! Related posts: other posts that share a tag.

use crate::post::Post;

/// The number of related posts shown under a post when none is configured.
pub const DEFAULT_RELATED_POSTS: usize = 3;

/// Returns up to `limit` posts sharing at least one tag with `post`, in the
/// order they appear in `posts`. Tags are compared by id here, since `post`
/// and `posts` come from the same load. `post` itself is never included.
pub fn related_posts<'a>(post: &Post, posts: &'a [Post], limit: usize) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|candidate| candidate.id != post.id)
        .filter(|candidate| {
            candidate
                .tags
                .iter()
                .any(|tag| post.tags.iter().any(|t| t.id == tag.id))
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tag::Tag;

    fn tag(id: u64) -> Tag {
        Tag {
            id,
            name: format!("tag{}", id),
            slug: format!("tag{}", id),
        }
    }

    #[test]
    fn test_related_posts() {
        let posts = vec![
            Post::fixture(1, "one", vec![tag(1), tag(2)]),
            Post::fixture(2, "two", vec![tag(2)]),
            Post::fixture(3, "three", vec![tag(3)]),
            Post::fixture(4, "four", vec![tag(1)]),
            Post::fixture(5, "five", vec![tag(2), tag(3)]),
            Post::fixture(6, "six", vec![tag(1)]),
        ];
        let ids: Vec<u64> = related_posts(&posts[0], &posts, DEFAULT_RELATED_POSTS)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(vec![2, 4, 5], ids);
    }

    #[test]
    fn test_related_posts_without_tags() {
        let posts = vec![
            Post::fixture(1, "one", vec![]),
            Post::fixture(2, "two", vec![tag(1)]),
        ];
        assert!(related_posts(&posts[0], &posts, 3).is_empty());
        assert!(related_posts(&posts[1], &posts, 3).is_empty());
    }
}
