//! Best-effort helpers for turning a feed item's HTML description into plain
//! text. None of these are full HTML parsers: image extraction only sees the
//! first `<img ... src="...">` and entity decoding only knows a fixed table.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[^;]+;").unwrap());

const ENTITIES: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Returns the `src` of the first `<img>` tag in `html`, if any.
pub fn extract_first_image(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|src| src.as_str().to_owned())
}

/// Removes everything that looks like an HTML tag.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Decodes the entities in [`ENTITIES`]. Any other `&...;` sequence passes
/// through untouched.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[0];
            ENTITIES
                .iter()
                .find(|(name, _)| *name == entity)
                .map_or(entity, |(_, decoded)| *decoded)
                .to_owned()
        })
        .into_owned()
}

/// Keeps at most `max` characters of `text`.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}

/// Strips tags, decodes entities and truncates a raw description to `max`
/// characters.
pub fn plain_text(html: &str, max: usize) -> String {
    truncate(&decode_entities(&strip_tags(html)), max)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_first_image() {
        assert_eq!(
            extract_first_image(r#"<p>hi</p><img src="http://x/1.jpg"><img src="http://x/2.jpg">"#),
            Some(String::from("http://x/1.jpg"))
        );
        assert_eq!(
            extract_first_image(r#"<IMG class='a' SRC='http://x/a.png' />"#),
            Some(String::from("http://x/a.png"))
        );
        assert_eq!(extract_first_image("<p>no images</p>"), None);
        assert_eq!(extract_first_image(""), None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>좋았어요</p><img src=\"http://x/1.jpg\">"), "좋았어요");
        assert_eq!(strip_tags("a <b>bold</b> move"), "a bold move");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(
            decode_entities("&lt;tag&gt; &quot;q&quot; it&#39;s&nbsp;here"),
            "<tag> \"q\" it's here"
        );
        assert_eq!(decode_entities("&#40; &copy;"), "&#40; &copy;");
    }

    #[test]
    fn test_decode_entities_leaves_plain_text_alone() {
        let plain = "A & B < C > \"D\" 'E'";
        assert_eq!(decode_entities(plain), plain);
        let once = decode_entities("x &gt; y");
        assert_eq!(decode_entities(&once), once);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("웨딩홀투어", 3), "웨딩홀");
        assert_eq!(truncate("short", 300), "short");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_plain_text() {
        let html = format!("<p>{}</p>", "가".repeat(400));
        let text = plain_text(&html, 300);
        assert_eq!(text.chars().count(), 300);
        assert_eq!(plain_text("<p>A &amp; B</p>", 300), "A & B");
    }
}
