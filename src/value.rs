//! Conversions from domain types into [`Value`]s for templating.

use crate::category::Category;
use crate::post::Post;
use gtmpl::Value;
use std::collections::HashMap;

impl From<&Category> for Value {
    fn from(category: &Category) -> Value {
        Value::String(category.label().to_owned())
    }
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into a [`Value::Object`] with the fields the post
    /// template reads. A missing `thumbnail` becomes an empty string, which
    /// templates treat as false in `{{if .thumbnail}}`.
    fn from(post: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(post.title.clone()));
        m.insert("link".to_owned(), Value::String(post.link.clone()));
        m.insert(
            "description".to_owned(),
            Value::String(post.description.clone()),
        );
        m.insert("summary".to_owned(), Value::String(post.summary()));
        m.insert("date".to_owned(), Value::String(post.display_date()));
        m.insert("category".to_owned(), (&post.category).into());
        m.insert("slug".to_owned(), Value::String(post.slug.clone()));
        m.insert(
            "thumbnail".to_owned(),
            Value::String(post.thumbnail.clone().unwrap_or_default()),
        );
        Value::Object(m)
    }
}

/// One `<url>` entry of the sitemap.
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

impl From<&SitemapEntry> for Value {
    fn from(entry: &SitemapEntry) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("loc".to_owned(), Value::String(entry.loc.clone()));
        m.insert("lastmod".to_owned(), Value::String(entry.lastmod.clone()));
        m.insert(
            "changefreq".to_owned(),
            Value::String(entry.changefreq.to_owned()),
        );
        m.insert(
            "priority".to_owned(),
            Value::String(entry.priority.to_owned()),
        );
        Value::Object(m)
    }
}
