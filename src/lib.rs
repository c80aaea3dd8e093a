//! The library code for `feedpages`, which publishes a blog's RSS feed as a
//! static site. There are two independent halves:
//!
//! 1. The feed proxy ([`crate::proxy`]), which relays the upstream RSS document
//!    wrapped in a JSON envelope with permissive CORS headers.
//! 2. The generator ([`crate::build`]), which fetches the feed through the proxy
//!    and renders it to disk.
//!
//! The generator is a single linear pass:
//!
//! 1. Fetch the envelope and extract the XML ([`crate::fetch`])
//! 2. Parse the XML into feed items ([`crate::parser`])
//! 3. Derive one [`crate::post::Post`] per item, in feed order
//! 4. Render each post to `posts/{slug}.html` ([`crate::write`])
//! 5. Render `sitemap.xml` and `robots.txt` ([`crate::sitemap`])
//!
//! Any failure aborts the run. Missing item fields are not failures; they are
//! replaced with defaults during step 3.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod category;
pub mod config;
pub mod fetch;
pub mod http_client;
pub mod parser;
pub mod post;
pub mod proxy;
pub mod sitemap;
pub mod slug;
pub mod text;
pub mod value;
pub mod write;
