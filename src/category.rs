//! Defines the [`Category`] type and the keyword rules that assign one to a
//! [`crate::post::Post`].

use std::fmt;

/// The fixed set of categories a post can land in. Every post gets exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Wedding venues and hall tours.
    WeddingHall,

    /// Studio, dress and make-up (스드메).
    Styling,

    /// Honeymoon trips.
    Honeymoon,

    /// Anything the keyword rules don't recognize.
    Other,
}

impl Category {
    /// The label shown on pages and used as the first meta keyword.
    pub fn label(&self) -> &'static str {
        match self {
            Category::WeddingHall => "웨딩홀",
            Category::Styling => "스드메",
            Category::Honeymoon => "신혼여행",
            Category::Other => "기타",
        }
    }

    /// Picks the category of the first rule in [`RULES`] with a keyword
    /// contained in `"{title} {description}"`, compared case-insensitively.
    /// Rule order breaks ties: a post mentioning both a venue and a dress is a
    /// [`Category::WeddingHall`] post.
    pub fn infer(title: &str, description: &str) -> Category {
        let text = format!("{} {}", title, description).to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map_or(Category::Other, |(_, category)| *category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword rules, evaluated in order. Keywords are lowercase.
const RULES: [(&[&str], Category); 3] = [
    (&["웨딩홀", "홀투어", "예식장"], Category::WeddingHall),
    (&["스드메", "드레스", "메이크업", "스튜디오"], Category::Styling),
    (&["신혼여행", "허니문", "바르셀로나", "크루즈"], Category::Honeymoon),
];
