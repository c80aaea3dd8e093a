use crate::post::Post;
use gtmpl::{Template, Value};
use std::fmt;
use std::io;
use std::path::Path;

const POST_TEMPLATE: &str = include_str!("../templates/post.html");

/// Parses the built-in post page template.
pub fn post_template() -> Result<Template> {
    let mut template = Template::default();
    template.parse(POST_TEMPLATE)?;
    Ok(template)
}

/// Responsible for templating and writing post pages to disk.
pub struct Writer<'a> {
    /// The template for post pages.
    pub posts_template: &'a Template,

    /// The directory in which post pages are written, one
    /// `{slug}.html` file per post.
    pub posts_output_directory: &'a Path,

    /// The public site root. Used for each page's `og:url`.
    pub site_url: &'a str,

    /// The site brand appended to page titles.
    pub brand: &'a str,

    /// The fixed meta keywords following the post's category.
    pub keywords: &'a [String],
}

impl Writer<'_> {
    /// Renders a single [`Post`] to its page HTML.
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let mut value = Value::from(post);
        if let Value::Object(obj) = &mut value {
            obj.insert("brand".to_owned(), Value::String(self.brand.to_owned()));
            obj.insert(
                "keywords".to_owned(),
                Value::String(self.keywords.join(", ")),
            );
            obj.insert("url".to_owned(), Value::String(post.url(self.site_url)));
        }

        let mut out: Vec<u8> = Vec::new();
        self.posts_template
            .execute(&mut out, &gtmpl::Context::from(value)?)?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }

    /// Renders every post and writes it to
    /// `{posts_output_directory}/{slug}.html`, creating the directory if needed
    /// and overwriting existing pages. Stops at the first failure.
    pub fn write_posts(&self, posts: &[Post]) -> Result<()> {
        std::fs::create_dir_all(self.posts_output_directory)?;
        for post in posts {
            let html = self.render_post(post)?;
            std::fs::write(self.posts_output_directory.join(post.file_name()), html)?;
            log::info!("Generated: {}", post.file_name());
        }
        Ok(())
    }
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "rendering post page: {}", err),
            Error::Io(err) => write!(f, "writing post page: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::FeedItem;

    fn writer<'a>(template: &'a Template, dir: &'a Path, keywords: &'a [String]) -> Writer<'a> {
        Writer {
            posts_template: template,
            posts_output_directory: dir,
            site_url: "https://seoul-wedding.site",
            brand: "쭈령이 커플 웨딩준비",
            keywords,
        }
    }

    fn post(description: &str) -> Post {
        Post::from_item(
            0,
            &FeedItem {
                title: Some(String::from("웨딩홀 투어 후기")),
                link: Some(String::from("https://blog.naver.com/dic-wannabe/1")),
                pub_date: Some(String::from("Mon, 15 Jan 2024 10:30:00 +0900")),
                description: Some(description.to_owned()),
            },
            "https://blog.naver.com/dic-wannabe",
        )
    }

    #[test]
    fn test_render_post() -> Result<()> {
        let template = post_template()?;
        let keywords = vec![String::from("웨딩준비"), String::from("스드메")];
        let w = writer(&template, Path::new("unused"), &keywords);
        let html = w.render_post(&post(r#"<p>좋았어요</p><img src="http://x/1.jpg">"#))?;

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>웨딩홀 투어 후기 | 쭈령이 커플 웨딩준비</title>"));
        assert!(html.contains(
            r#"<meta name="description" content="좋았어요..." />"#
        ));
        assert!(html.contains(
            r#"<meta name="keywords" content="웨딩홀, 웨딩준비, 스드메" />"#
        ));
        assert!(html.contains(r#"<meta property="og:type" content="article" />"#));
        assert!(html.contains(
            r#"<meta property="og:url" content="https://seoul-wedding.site/posts/1-웨딩홀-투어-후기.html" />"#
        ));
        assert!(html.contains(r#"<meta property="og:image" content="http://x/1.jpg" />"#));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://blog.naver.com/dic-wannabe/1" />"#
        ));
        assert!(html.contains(r#"<a href="/" class="back-link">"#));
        assert!(html.contains(r#"<span class="category">웨딩홀</span>"#));
        assert!(html.contains("<span>2024. 1. 15.</span>"));
        assert!(html.contains(
            r#"<img src="http://x/1.jpg" alt="웨딩홀 투어 후기" class="thumbnail" />"#
        ));
        assert!(html.contains("<p>좋았어요</p>"));
        assert!(html.contains(
            r#"<a href="https://blog.naver.com/dic-wannabe/1" class="btn" target="_blank" rel="noopener">"#
        ));
        Ok(())
    }

    #[test]
    fn test_render_post_without_thumbnail() -> Result<()> {
        let template = post_template()?;
        let keywords = Vec::new();
        let w = writer(&template, Path::new("unused"), &keywords);
        let html = w.render_post(&post("<p>텍스트만</p>"))?;
        assert!(!html.contains("og:image"));
        assert!(!html.contains("class=\"thumbnail\""));
        Ok(())
    }

    #[test]
    fn test_write_posts_overwrites() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let posts_dir = dir.path().join("posts");
        let template = post_template()?;
        let keywords = Vec::new();
        let w = writer(&template, &posts_dir, &keywords);

        std::fs::create_dir_all(&posts_dir)?;
        let path = posts_dir.join("1-웨딩홀-투어-후기.html");
        std::fs::write(&path, "stale")?;

        w.write_posts(&[post("<p>새 글</p>")])?;
        let html = std::fs::read_to_string(&path)?;
        assert!(html.contains("<p>새 글</p>"));
        assert!(!html.contains("stale"));
        Ok(())
    }
}
