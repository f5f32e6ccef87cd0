//! The library code for `matome`, the content tooling behind a blog of
//! YouTube video summaries. Posts are MDX files with YAML frontmatter; the
//! library loads them ([`crate::parser`]) and answers the questions the
//! blog's pages ask about them:
//!
//! 1. Which tags exist and how often are they used, and which tag does a
//!    tag-page slug refer to ([`crate::tag`], [`crate::slug`])
//! 2. What is a post's outline, for the table of contents
//!    ([`crate::heading`]), and what does its body look like as HTML
//!    ([`crate::markdown`])
//! 3. How long does a post take to read ([`crate::reading_time`])
//! 4. Which posts match a search query, a page at a time
//!    ([`crate::search`]), and which posts are related to a post
//!    ([`crate::related`])
//!
//! Everything past loading is a pure function over the loaded posts.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod heading;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod reading_time;
pub mod related;
pub mod search;
pub mod slug;
pub mod tag;
