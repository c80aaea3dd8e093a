//! Exports the [`build_site`] function which stitches together the steps of a
//! generation run: fetching the feed ([`crate::fetch`]), parsing it
//! ([`crate::parser`]), deriving posts ([`crate::post`]), writing post pages
//! ([`crate::write`]) and writing the sitemap and robots policy
//! ([`crate::sitemap`]).

use crate::config::Config;
use crate::fetch::{Error as FetchError, FeedSource};
use crate::parser::{parse_feed, Error as ParseError};
use crate::post::Post;
use crate::sitemap::{render_robots, render_sitemap, Error as SitemapError};
use crate::write::{post_template, Error as WriteError, Writer};
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};

/// Runs the whole pipeline once and returns the number of posts generated.
/// Output goes to `{output_directory}/posts/{slug}.html`,
/// `{output_directory}/sitemap.xml` and `{output_directory}/robots.txt`.
///
/// Any failure aborts the run; pages already written are left in place.
pub fn build_site(
    config: &Config,
    source: &dyn FeedSource,
    output_directory: &Path,
) -> Result<usize> {
    log::info!("Fetching RSS feed...");
    let xml = source.fetch_xml()?;

    log::info!("Parsing XML...");
    let feed = parse_feed(&xml)?;
    log::info!("Found {} posts in '{}'", feed.items.len(), feed.title);

    let posts = Post::from_items(&feed.items, &config.blog_home);

    let posts_template = post_template()?;
    let writer = Writer {
        posts_template: &posts_template,
        posts_output_directory: &output_directory.join("posts"),
        site_url: &config.site_url,
        brand: &config.brand,
        keywords: &config.keywords,
    };
    writer.write_posts(&posts)?;

    log::info!("Generating sitemap...");
    let today = Utc::now().date_naive();
    let sitemap = render_sitemap(&config.site_url, &posts, today)?;
    write_file(&output_directory.join("sitemap.xml"), &sitemap)?;

    log::info!("Generating robots.txt...");
    write_file(
        &output_directory.join("robots.txt"),
        &render_robots(&config.site_url),
    )?;

    Ok(posts.len())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|err| Error::WriteFile {
        path: path.to_owned(),
        err,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for a generation run. Errors can come from fetching,
/// parsing, writing pages, rendering the sitemap, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the feed XML can't be obtained.
    Fetch(FetchError),

    /// Returned when the feed XML is malformed.
    Parse(ParseError),

    /// Returned for errors rendering or writing post pages.
    Write(WriteError),

    /// Returned for errors rendering the sitemap.
    Sitemap(SitemapError),

    /// Returned when `sitemap.xml` or `robots.txt` can't be written.
    WriteFile { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fetch(err) => err.fmt(f),
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Sitemap(err) => err.fmt(f),
            Error::WriteFile { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fetch(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Sitemap(err) => Some(err),
            Error::WriteFile { path: _, err } => Some(err),
        }
    }
}

impl From<FetchError> for Error {
    /// Converts [`FetchError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FetchError) -> Error {
        Error::Fetch(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<SitemapError> for Error {
    /// Converts [`SitemapError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SitemapError) -> Error {
        Error::Sitemap(err)
    }
}
