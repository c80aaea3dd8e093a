//! Slug normalization for post file names and URLs.

use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9가-힣\s-]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The maximum number of characters kept from the normalized title.
pub const MAX_TITLE_CHARS: usize = 50;

/// Normalizes a title: lowercases it, drops everything but ASCII letters and
/// digits, Hangul syllables, whitespace and hyphens, turns whitespace runs into
/// single hyphens and keeps the first [`MAX_TITLE_CHARS`] characters.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let hyphenated = WHITESPACE.replace_all(&kept, "-");
    hyphenated.chars().take(MAX_TITLE_CHARS).collect()
}

/// The slug for the post at 0-based `index` in feed order. Slugs are 1-based
/// so the first post's slug starts with `1-`.
pub fn post_slug(index: usize, title: &str) -> String {
    format!("{}-{}", index + 1, slugify(title))
}
