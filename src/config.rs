//! Loads project configuration from a `matome.yaml` file.

use crate::{related::DEFAULT_RELATED_POSTS, search::DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The name of the project file.
pub const PROJECT_FILE: &str = "matome.yaml";

const DEFAULT_CONTENT_DIRECTORY: &str = "content/posts";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
struct RelatedPosts(usize);
impl Default for RelatedPosts {
    fn default() -> Self {
        RelatedPosts(DEFAULT_RELATED_POSTS)
    }
}

fn default_content_directory() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIRECTORY)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default)]
    page_size: PageSize,

    #[serde(default)]
    related_posts: RelatedPosts,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            content_directory: default_content_directory(),
            page_size: PageSize::default(),
            related_posts: RelatedPosts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The directory containing the project file, or the starting directory
    /// if there is none.
    pub project_root: PathBuf,

    /// The directory holding the post source files.
    pub posts_directory: PathBuf,

    /// The number of posts per search results page.
    pub page_size: usize,

    /// The number of related posts to show for a post.
    pub related_posts: usize,
}

impl Config {
    /// Looks for `matome.yaml` in `dir` and then in each of its ancestors,
    /// loading the first one found. Without a project file the defaults
    /// apply, rooted at `dir`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path);
            }
        }
        info!(directory = %dir.display(), "no `{}` found, using defaults", PROJECT_FILE);
        Ok(Config::from_project(dir, Project::default()))
    }

    /// Loads the project file at `path`. Relative paths in it are resolved
    /// against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file).map_err(|err| Error::Parse {
            path: path.to_owned(),
            err,
        })?;
        debug!(path = %path.display(), "loaded project file");
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Config::from_project(project_root, project))
    }

    fn from_project(project_root: &Path, project: Project) -> Config {
        Config {
            project_root: project_root.to_owned(),
            posts_directory: project_root.join(project.content_directory),
            page_size: project.page_size.0,
            related_posts: project.related_posts.0,
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has unknown keys.
    Parse { path: PathBuf, err: serde_yaml::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Parsing project file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}
