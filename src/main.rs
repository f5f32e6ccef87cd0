use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use matome::config::Config;
use matome::heading::extract_headings;
use matome::markdown::to_html;
use matome::parser::Parser as PostParser;
use matome::post::Post;
use matome::related::related_posts;
use matome::search::search_posts;
use matome::tag::{find_tag_by_slug, get_all_tags, get_posts_by_tag};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Content tooling for a blog of YouTube video summaries.
#[derive(Parser)]
#[command(name = "matome", version)]
struct Cli {
    /// Directory to start looking for `matome.yaml` from (defaults to the
    /// current directory).
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every tag with the number of posts using it.
    Tags,

    /// List the posts for a tag page slug.
    Tag { slug: String },

    /// Search posts by title, tag, excerpt and content.
    Search {
        #[arg(default_value = "")]
        query: String,

        /// The 1-based results page.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Print the table of contents of a post.
    Toc { slug: String },

    /// Render the body of a post as HTML.
    Render { slug: String },

    /// List posts sharing a tag with a post.
    Related { slug: String },

    /// List every post with its reading time.
    ReadingTimes,
}

fn init_logger(verbose: bool) {
    let default = if verbose { "matome=debug" } else { "matome=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let start = match &cli.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Reading the current directory")?,
    };
    let config = Config::from_directory(&start)?;
    run(&cli.command, &config, cli.json)
}

fn run(command: &Command, config: &Config, json: bool) -> Result<()> {
    let parser = PostParser::new(&config.posts_directory);
    match command {
        Command::Tags => {
            let posts = parser.parse_posts()?;
            let tags = get_all_tags(&posts);
            if json {
                return print_json(&tags);
            }
            for tag in &tags {
                println!("{:>4}  {}  ({})", tag.count, tag.name, tag.slug);
            }
        }

        Command::Tag { slug } => {
            let posts = parser.parse_posts()?;
            let tags = get_all_tags(&posts);
            let name = find_tag_by_slug(slug, &tags)
                .ok_or_else(|| anyhow!("No tag matches slug `{}`", slug))?;
            let tagged = get_posts_by_tag(&posts, name);
            if json {
                return print_json(&json!({
                    "tag": name,
                    "posts": summaries(&tagged),
                }));
            }
            println!("{}: {} posts", name, tagged.len());
            tagged.iter().for_each(|post| print_post(post));
        }

        Command::Search { query, page } => {
            let posts = parser.parse_posts()?;
            let result = search_posts(&posts, query, *page, config.page_size);
            if json {
                return print_json(&json!({
                    "query": query,
                    "total": result.total,
                    "page": result.page,
                    "totalPages": result.total_pages(),
                    "posts": summaries(&result.posts),
                }));
            }
            println!(
                "{} results for \"{}\" (page {} of {})",
                result.total,
                query,
                result.page,
                result.total_pages()
            );
            result.posts.iter().for_each(|post| print_post(post));
        }

        Command::Toc { slug } => {
            let post = find_post(&parser, slug)?;
            let headings = extract_headings(&post.content);
            if json {
                return print_json(&headings);
            }
            for heading in &headings {
                let indent = "  ".repeat(usize::from(heading.level - 2));
                println!("{}- {} (#{})", indent, heading.text, heading.id);
            }
        }

        Command::Render { slug } => {
            let post = find_post(&parser, slug)?;
            let html = to_html(&post.content);
            if json {
                return print_json(&json!({ "slug": post.slug, "html": html }));
            }
            print!("{}", html);
        }

        Command::Related { slug } => {
            let posts = parser.parse_posts()?;
            let post = posts
                .iter()
                .find(|p| &p.slug == slug)
                .ok_or_else(|| anyhow!("No post with slug `{}`", slug))?;
            let related = related_posts(post, &posts, config.related_posts);
            if json {
                return print_json(&summaries(&related));
            }
            related.iter().for_each(|post| print_post(post));
        }

        Command::ReadingTimes => {
            let posts = parser.parse_posts()?;
            if json {
                let posts: Vec<&Post> = posts.iter().collect();
                return print_json(&summaries(&posts));
            }
            for post in &posts {
                println!(
                    "ID: {}, Slug: {}, Title: {}, Reading time: {} min",
                    post.id, post.slug, post.title, post.reading_time_minutes
                );
            }
        }
    }
    Ok(())
}

fn find_post(parser: &PostParser, slug: &str) -> Result<Post> {
    parser
        .parse_post_by_slug(slug)?
        .ok_or_else(|| anyhow!("No post with slug `{}`", slug))
}

fn summaries<'a>(posts: &[&'a Post]) -> Vec<matome::post::PostSummary<'a>> {
    posts.iter().map(|post| post.summarize()).collect()
}

fn print_post(post: &Post) {
    let tags: Vec<&str> = post.tags.iter().map(|t| t.name.as_str()).collect();
    println!(
        "{}  {}  {}  [{}]",
        post.published_at.format("%Y-%m-%d"),
        post.slug,
        post.title,
        tags.join(", ")
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
