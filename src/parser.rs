//! Defines the [`Parser`] and [`Error`] types. Also defines the logic for
//! loading posts from MDX source files into memory.

use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{markdown, post::Post, reading_time::calculate_reading_time, tag::TagRegistry};

const MDX_EXTENSION: &str = "mdx";
const BUNDLE_INDEX: &str = "index.mdx";

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `posts_directory` holds one `{slug}.mdx` file or `{slug}/index.mdx`
    /// bundle per post.
    posts_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser for the posts in `posts_directory`.
    pub fn new(posts_directory: &'a Path) -> Parser<'a> {
        Parser { posts_directory }
    }

    /// Searches the posts directory for post files and returns a list of
    /// [`Post`] objects sorted by publish date (most recent first). Each post
    /// file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `publishedAt`, `videoId`,
    ///    `videoUrl` and optionally `excerpt` and `tags`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Rustの所有権を学ぶ
    /// publishedAt: 2025-05-09
    /// videoId: abc123
    /// videoUrl: https://www.youtube.com/watch?v=abc123
    /// tags: [Rust, プログラミング]
    /// ---
    /// ## 概要
    ///
    /// ...
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let mut registry = TagRegistry::new();
        let mut posts = Vec::new();

        for result in WalkDir::new(self.posts_directory)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = result?;
            if let Some(slug) = Self::post_slug(entry.path(), entry.depth()) {
                let id = posts.len() as u64 + 1;
                posts.push(self.parse_post(entry.path(), slug, id, &mut registry)?);
            }
        }

        // `sort_by` is stable, so posts published together stay in file
        // name order.
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        info!(
            posts = posts.len(),
            tags = registry.tags().len(),
            directory = %self.posts_directory.display(),
            "loaded posts"
        );
        Ok(posts)
    }

    /// Finds a single post by slug without loading the rest. Tag ids are
    /// local to the returned post.
    pub fn parse_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        match source_path(self.posts_directory, slug) {
            Some(path) => Ok(Some(self.parse_post(&path, slug, 1, &mut TagRegistry::new())?)),
            None => Ok(None),
        }
    }

    /// Returns the slug for a post source file, or [`None`] if `path` isn't
    /// one. Files directly in the posts directory are posts if they have the
    /// `.mdx` extension; one level down only bundle indexes are.
    fn post_slug(path: &Path, depth: usize) -> Option<&str> {
        match depth {
            1 if path.extension()? == MDX_EXTENSION && path.is_file() => {
                path.file_stem()?.to_str()
            }
            2 if path.file_name()? == BUNDLE_INDEX => path.parent()?.file_name()?.to_str(),
            _ => None,
        }
    }

    fn parse_post(
        &self,
        path: &Path,
        slug: &str,
        id: u64,
        registry: &mut TagRegistry,
    ) -> Result<Post> {
        match Self::_parse_post(path, slug, id, registry) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(
        path: &Path,
        slug: &str,
        id: u64,
        registry: &mut TagRegistry,
    ) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
        let updated_at: DateTime<Utc> = file.metadata()?.modified()?.into();

        let (frontmatter, body) = split_frontmatter(&contents)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(frontmatter)?;
        let published_at = parse_date(&frontmatter.published_at)?;

        let reading_time_minutes = calculate_reading_time(&markdown::to_plain_text(body));
        debug!(slug, reading_time_minutes, "parsed post");

        Ok(Post {
            id,
            title: frontmatter.title,
            slug: slug.to_owned(),
            content: body.to_owned(),
            excerpt: frontmatter.excerpt,
            video_id: frontmatter.video_id,
            video_url: frontmatter.video_url,
            published_at,
            updated_at,
            tags: registry.attach(&frontmatter.tags.unwrap_or_default()),
            reading_time_minutes,
        })
    }
}

/// Splits a source file into its YAML frontmatter and its body.
fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    const FENCE: &str = "---";
    let rest = input
        .strip_prefix('\u{feff}')
        .unwrap_or(input)
        .strip_prefix(FENCE)
        .ok_or(Error::FrontmatterMissingStartFence)?;

    // The closing fence has to start a line of its own.
    let yaml_stop = rest
        .find(&format!("\n{}", FENCE))
        .ok_or(Error::FrontmatterMissingEndFence)?
        + 1;
    let after_fence = &rest[yaml_stop + FENCE.len()..];
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => "",
    };
    Ok((&rest[..yaml_stop], body))
}

/// Parses a `publishedAt` value: a full RFC 3339 timestamp, a timestamp
/// without an offset (taken as UTC), or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Ok(date_time.with_timezone(&Utc));
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(date_time.and_utc());
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| Error::Date(input.to_owned(), e))?;
    // Midnight always exists.
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    /// The title of the post.
    pub title: String,

    /// A short description shown in listings.
    #[serde(default)]
    pub excerpt: Option<String>,

    /// The publish date of the post.
    pub published_at: String,

    /// The id of the summarized video.
    pub video_id: String,

    /// The URL of the summarized video.
    pub video_url: String,

    /// The tags associated with the post, in display order. A bare `tags:`
    /// key is null in YAML and means no tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when `publishedAt` is neither an RFC 3339 timestamp nor a
    /// `YYYY-MM-DD` date.
    Date(String, chrono::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Date(input, err) => {
                write!(f, "invalid publishedAt `{}`: {}", input, err)
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Date(_, err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

/// Returns the path of the source file for the post with `slug`, whichever
/// layout it uses.
fn source_path(posts_directory: &Path, slug: &str) -> Option<PathBuf> {
    let file = posts_directory.join(format!("{}.{}", slug, MDX_EXTENSION));
    let bundle = posts_directory.join(slug).join(BUNDLE_INDEX);
    [file, bundle].into_iter().find(|path| path.is_file())
}
