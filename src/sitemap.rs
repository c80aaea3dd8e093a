//! Renders the discovery files written next to the post pages: `sitemap.xml`
//! and `robots.txt`.

use crate::post::Post;
use crate::value::SitemapEntry;
use chrono::NaiveDate;
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;

const SITEMAP_TEMPLATE: &str = include_str!("../templates/sitemap.xml");

const LASTMOD_FORMAT: &str = "%Y-%m-%d";

/// Crawlers named explicitly in `robots.txt`, in order.
const ROBOTS_AGENTS: [&str; 3] = ["*", "Yeti", "Googlebot"];

/// Builds the sitemap entries: the site root first (dated `today`, checked
/// daily), then one per post in order.
pub fn sitemap_entries(site_url: &str, posts: &[Post], today: NaiveDate) -> Vec<SitemapEntry> {
    let root = SitemapEntry {
        loc: format!("{}/", site_url),
        lastmod: today.format(LASTMOD_FORMAT).to_string(),
        changefreq: "daily",
        priority: "1.0",
    };

    std::iter::once(root)
        .chain(posts.iter().map(|post| SitemapEntry {
            loc: post.url(site_url),
            lastmod: post.last_modified(today).format(LASTMOD_FORMAT).to_string(),
            changefreq: "monthly",
            priority: "0.8",
        }))
        .collect()
}

/// Renders `sitemap.xml` for `posts`.
pub fn render_sitemap(site_url: &str, posts: &[Post], today: NaiveDate) -> Result<String> {
    let mut template = Template::default();
    template.parse(SITEMAP_TEMPLATE)?;

    let urls = sitemap_entries(site_url, posts, today)
        .iter()
        .map(Value::from)
        .collect();
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("urls".to_owned(), Value::Array(urls));

    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &gtmpl::Context::from(Value::Object(m))?)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

/// Renders `robots.txt`: everything is allowed for every agent, and the
/// sitemap is advertised.
pub fn render_robots(site_url: &str) -> String {
    let mut robots = String::new();
    for agent in ROBOTS_AGENTS.iter() {
        robots.push_str(&format!("User-agent: {}\nAllow: /\n\n", agent));
    }
    robots.push_str(&format!("Sitemap: {}/sitemap.xml", site_url));
    robots
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem rendering the sitemap.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),
}

impl From<String> for Error {
    /// Converts a template error message into an [`Error`].
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "rendering sitemap: {}", err),
        }
    }
}

impl std::error::Error for Error {}
