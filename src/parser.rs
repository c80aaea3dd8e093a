//! Defines the [`FeedItem`] type and [`parse_feed`], which turns the raw RSS
//! XML relayed by the proxy into items in feed order.

use rss::{Channel, Item};
use std::fmt;

/// A raw item from the upstream feed. Every field may be missing; an empty
/// string is normalized to `None` so callers only have one case to handle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,

    /// The description as an HTML fragment.
    pub description: Option<String>,
}

impl From<&Item> for FeedItem {
    fn from(item: &Item) -> FeedItem {
        fn non_empty(value: Option<&str>) -> Option<String> {
            value.filter(|s| !s.is_empty()).map(str::to_owned)
        }

        FeedItem {
            title: non_empty(item.title()),
            link: non_empty(item.link()),
            pub_date: non_empty(item.pub_date()),
            description: non_empty(item.description()),
        }
    }
}

/// The parsed feed: the channel's title and its items in document order.
#[derive(Debug)]
pub struct Feed {
    pub title: String,
    pub items: Vec<FeedItem>,
}

/// Parses an RSS document. Fails on anything that isn't well-formed RSS with a
/// `<channel>`; a channel without items is fine.
pub fn parse_feed(xml: &str) -> Result<Feed> {
    let channel = Channel::read_from(xml.as_bytes())?;
    Ok(Feed {
        title: channel.title().to_owned(),
        items: channel.items().iter().map(FeedItem::from).collect(),
    })
}

/// Represents the result of a feed-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing the feed XML.
#[derive(Debug)]
pub enum Error {
    /// Returned when the document is malformed or isn't RSS.
    Rss(rss::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Rss(err) => write!(f, "parsing feed XML: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Rss(err) => Some(err),
        }
    }
}

impl From<rss::Error> for Error {
    /// Converts an [`rss::Error`] into an [`Error`]. It allows us to use the
    /// `?` operator with [`Channel::read_from`].
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}
