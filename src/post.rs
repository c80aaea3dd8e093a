//! Defines the [`Post`] type, the normalized record rendered into one page,
//! and its derivation from a [`FeedItem`].

use crate::category::Category;
use crate::parser::FeedItem;
use crate::slug::post_slug;
use crate::text;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

/// Title used for feed items without one.
pub const UNTITLED: &str = "Untitled";

/// The maximum number of characters kept from a description.
pub const DESCRIPTION_CHARS: usize = 300;

/// The maximum number of characters of the description used in meta tags,
/// before the trailing `...`.
pub const SUMMARY_CHARS: usize = 150;

/// A post derived from one feed item. Posts only live for a single
/// generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub title: String,

    /// The original post. Also the page's canonical URL.
    pub link: String,

    /// The raw publication timestamp, if the feed had one.
    pub pub_date: Option<String>,

    /// Plain text: tags stripped, entities decoded, at most
    /// [`DESCRIPTION_CHARS`] characters.
    pub description: String,

    /// The first image in the raw description.
    pub thumbnail: Option<String>,

    pub category: Category,

    /// `{1-based index}-{normalized title}`. Unique within a run.
    pub slug: String,
}

impl Post {
    /// Derives the post at 0-based `index` in feed order. Missing fields are
    /// defaulted, never rejected: the title falls back to [`UNTITLED`] and the
    /// link to `blog_home`.
    pub fn from_item(index: usize, item: &FeedItem, blog_home: &str) -> Post {
        let title = item.title.as_deref().unwrap_or(UNTITLED).to_owned();
        let raw_description = item.description.as_deref().unwrap_or_default();
        let description = text::plain_text(raw_description, DESCRIPTION_CHARS);

        Post {
            link: item.link.as_deref().unwrap_or(blog_home).to_owned(),
            pub_date: item.pub_date.clone(),
            thumbnail: text::extract_first_image(raw_description),
            category: Category::infer(&title, &description),
            slug: post_slug(index, &title),
            description,
            title,
        }
    }

    /// Derives posts for all items, in order.
    pub fn from_items(items: &[FeedItem], blog_home: &str) -> Vec<Post> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Post::from_item(i, item, blog_home))
            .collect()
    }

    /// The description shortened for meta tags: the first [`SUMMARY_CHARS`]
    /// characters followed by a literal `...`.
    pub fn summary(&self) -> String {
        format!("{}...", text::truncate(&self.description, SUMMARY_CHARS))
    }

    /// The page's file name relative to the posts directory.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }

    /// The page's public URL under `site_url`.
    pub fn url(&self, site_url: &str) -> String {
        format!("{}/posts/{}", site_url, self.file_name())
    }

    /// The publication timestamp, if present and parseable as RFC 2822 (the
    /// RSS format) or RFC 3339.
    pub fn published(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.pub_date.as_deref()?.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }

    /// The publication date as Korean readers write it, e.g. `2024. 1. 15.`,
    /// in the timestamp's own offset. Empty when there's no usable date.
    pub fn display_date(&self) -> String {
        match self.published() {
            Some(date) => format!("{}. {}. {}.", date.year(), date.month(), date.day()),
            None => String::new(),
        }
    }

    /// The sitemap `lastmod` date: the publication date in UTC, or `today`
    /// when there's no usable date.
    pub fn last_modified(&self, today: NaiveDate) -> NaiveDate {
        self.published()
            .map(|date| date.with_timezone(&Utc).date_naive())
            .unwrap_or(today)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const BLOG_HOME: &str = "https://blog.naver.com/dic-wannabe";

    fn item(title: &str, description: &str) -> FeedItem {
        FeedItem {
            title: Some(title.to_owned()),
            link: Some(String::from("https://blog.naver.com/dic-wannabe/1")),
            pub_date: Some(String::from("Mon, 15 Jan 2024 10:30:00 +0900")),
            description: Some(description.to_owned()),
        }
    }

    #[test]
    fn test_from_item() {
        let post = Post::from_item(
            0,
            &item("웨딩홀 투어 후기", r#"<p>좋았어요</p><img src="http://x/1.jpg">"#),
            BLOG_HOME,
        );
        assert_eq!(
            post,
            Post {
                title: String::from("웨딩홀 투어 후기"),
                link: String::from("https://blog.naver.com/dic-wannabe/1"),
                pub_date: Some(String::from("Mon, 15 Jan 2024 10:30:00 +0900")),
                description: String::from("좋았어요"),
                thumbnail: Some(String::from("http://x/1.jpg")),
                category: Category::WeddingHall,
                slug: String::from("1-웨딩홀-투어-후기"),
            }
        );
    }

    #[test]
    fn test_from_item_defaults_missing_fields() {
        let post = Post::from_item(2, &FeedItem::default(), BLOG_HOME);
        assert_eq!(post.title, UNTITLED);
        assert_eq!(post.link, BLOG_HOME);
        assert_eq!(post.pub_date, None);
        assert_eq!(post.description, "");
        assert_eq!(post.thumbnail, None);
        assert_eq!(post.category, Category::Other);
        assert_eq!(post.slug, "3-untitled");
        assert_eq!(post.display_date(), "");
    }

    #[test]
    fn test_from_items_slugs_are_unique() {
        let items = vec![
            item("같은 제목", ""),
            item("같은 제목", ""),
            item("같은 제목", ""),
        ];
        let slugs: Vec<String> = Post::from_items(&items, BLOG_HOME)
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["1-같은-제목", "2-같은-제목", "3-같은-제목"]);
    }

    #[test]
    fn test_description_is_bounded() {
        let long = format!("<div>{}</div>", "스드메 ".repeat(200));
        let post = Post::from_item(0, &item("t", &long), BLOG_HOME);
        assert_eq!(post.description.chars().count(), DESCRIPTION_CHARS);

        let summary = post.summary();
        assert!(summary.ends_with("..."));
        assert_eq!(
            summary.trim_end_matches("...").chars().count(),
            SUMMARY_CHARS
        );
    }

    #[test]
    fn test_category_uses_both_title_and_description() {
        let post = Post::from_item(0, &item("주말 일기", "<p>허니문 준비</p>"), BLOG_HOME);
        assert_eq!(post.category, Category::Honeymoon);
    }

    #[test]
    fn test_dates() {
        let post = Post::from_item(0, &item("t", ""), BLOG_HOME);
        assert_eq!(post.display_date(), "2024. 1. 15.");

        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            post.last_modified(today),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        // 01:00 in Seoul is the previous day in UTC
        let early = Post {
            pub_date: Some(String::from("Tue, 16 Jan 2024 01:00:00 +0900")),
            ..post.clone()
        };
        assert_eq!(early.display_date(), "2024. 1. 16.");
        assert_eq!(
            early.last_modified(today),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        let garbage = Post {
            pub_date: Some(String::from("sometime last week")),
            ..post
        };
        assert_eq!(garbage.display_date(), "");
        assert_eq!(garbage.last_modified(today), today);
    }

    #[test]
    fn test_url() {
        let post = Post::from_item(0, &item("웨딩홀 투어 후기", ""), BLOG_HOME);
        assert_eq!(
            post.url("https://seoul-wedding.site"),
            "https://seoul-wedding.site/posts/1-웨딩홀-투어-후기.html"
        );
    }
}
