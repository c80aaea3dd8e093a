//! The feed proxy: relays the upstream RSS document as a JSON envelope with
//! permissive CORS headers, so browsers and the generator can fetch it without
//! knowing the upstream URL.
//!
//! [`handle`] is a pure function from a request line to a [`ProxyResponse`];
//! the outbound fetch goes through the [`Upstream`] trait. [`serve`] wires both
//! into a [`tiny_http::Server`] and answers requests one at a time.

use crate::config::ProxyConfig;
use crate::http_client;
use isahc::prelude::*;
use isahc::Request;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use tiny_http::{Header, Method, Response, Server, StatusCode};

const USER_AGENT: &str = "Mozilla/5.0";
const ACCEPT_RSS: &str = "application/rss+xml, application/xml;q=0.9, */*;q=0.8";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const CACHE_CONTROL: &str = "public, max-age=300";

const FETCH_FAILED: &str = "Failed to fetch RSS";

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    ("Access-Control-Allow-Headers", "*"),
];

/// What the upstream server answered. Non-success statuses are not errors at
/// this level; [`handle`] turns them into a 502.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Fetches the upstream feed.
pub trait Upstream {
    fn fetch(&self, url: &str) -> Result<UpstreamResponse>;
}

/// The production [`Upstream`], backed by the shared isahc client.
pub struct IsahcUpstream;

impl Upstream for IsahcUpstream {
    fn fetch(&self, url: &str) -> Result<UpstreamResponse> {
        let request = Request::get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT_RSS)
            .body(())?;

        let mut response = http_client::client()?.send(request)?;
        let status = response.status().as_u16();
        let body = if response.status().is_success() {
            response.text()?
        } else {
            String::new()
        };
        Ok(UpstreamResponse { status, body })
    }
}

/// A fully-buffered response, independent of the server library.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    fn new(status: u16) -> ProxyResponse {
        ProxyResponse {
            status,
            headers: CORS_HEADERS
                .iter()
                .map(|(name, value)| (*name, value.to_string()))
                .collect(),
            body: Vec::new(),
        }
    }

    fn text(status: u16, body: String) -> ProxyResponse {
        let mut response = ProxyResponse::new(status);
        response
            .headers
            .push(("Content-Type", TEXT_CONTENT_TYPE.to_owned()));
        response.body = body.into_bytes();
        response
    }

    fn json<T: Serialize>(status: u16, value: &T) -> ProxyResponse {
        let mut response = ProxyResponse::new(status);
        response
            .headers
            .push(("Content-Type", JSON_CONTENT_TYPE.to_owned()));
        response
            .headers
            .push(("Cache-Control", CACHE_CONTROL.to_owned()));
        // Serializing these envelopes only fails on non-string map keys.
        response.body = serde_json::to_vec(value).unwrap_or_default();
        response
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn into_tiny(self) -> Response<Cursor<Vec<u8>>> {
        let mut response =
            Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in &self.headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => log::warn!("Dropping invalid header {}: {:?}", name, value),
            }
        }
        response
    }
}

#[derive(Serialize)]
struct FeedEnvelope<'a> {
    xml: &'a str,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

/// Answers one request.
///
/// * `OPTIONS` on any path: 204 with CORS headers and no body.
/// * Any path other than `config.path` (query string ignored): 200 with a
///   plain-text hint.
/// * `config.path`: fetches `config.upstream`. Success yields 200
///   `{"xml": ...}`; an upstream error status yields 502
///   `{"error": "Failed to fetch RSS", "status": <code>}`; a transport failure
///   yields the same 502 without `status`.
pub fn handle<U: Upstream>(
    method: &Method,
    url: &str,
    config: &ProxyConfig,
    upstream: &U,
) -> ProxyResponse {
    if *method == Method::Options {
        return ProxyResponse::new(204);
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    if path != config.path {
        return ProxyResponse::text(200, format!("OK: use {}", config.path));
    }

    match upstream.fetch(&config.upstream) {
        Ok(response) if (200..300).contains(&response.status) => {
            ProxyResponse::json(200, &FeedEnvelope { xml: &response.body })
        }
        Ok(response) => {
            log::error!(
                "Upstream {} answered {}",
                config.upstream,
                response.status
            );
            ProxyResponse::json(
                502,
                &ErrorEnvelope {
                    error: FETCH_FAILED,
                    status: Some(response.status),
                },
            )
        }
        Err(err) => {
            log::error!("Fetching upstream {} failed: {}", config.upstream, err);
            ProxyResponse::json(
                502,
                &ErrorEnvelope {
                    error: FETCH_FAILED,
                    status: None,
                },
            )
        }
    }
}

/// Binds `config.listen` and serves requests sequentially until the process
/// is stopped.
pub fn serve<U: Upstream>(config: &ProxyConfig, upstream: &U) -> Result<()> {
    let server = Server::http(&config.listen).map_err(|e| Error::Bind {
        addr: config.listen.clone(),
        msg: e.to_string(),
    })?;
    log::info!("Proxy listening on http://{}{}", config.listen, config.path);
    run(&server, config, upstream);
    Ok(())
}

/// Answers requests arriving on an already-bound `server`.
fn run<U: Upstream>(server: &Server, config: &ProxyConfig, upstream: &U) {
    for request in server.incoming_requests() {
        let response = handle(request.method(), request.url(), config, upstream);
        log::info!("{} {} -> {}", request.method(), request.url(), response.status);
        if let Err(err) = request.respond(response.into_tiny()) {
            log::error!("Failed to send response: {}", err);
        }
    }
}

/// Represents the result of a proxy operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in the proxy.
#[derive(Debug)]
pub enum Error {
    /// Returned when the listen address can't be bound.
    Bind { addr: String, msg: String },

    /// Returned when the upstream request can't be built, e.g. for a bad URL.
    Request(isahc::http::Error),

    /// Returned when the upstream can't be reached.
    Http(isahc::Error),

    /// Returned when the upstream body can't be read.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bind { addr, msg } => write!(f, "binding '{}': {}", addr, msg),
            Error::Request(err) => write!(f, "building upstream request: {}", err),
            Error::Http(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bind { .. } => None,
            Error::Request(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<isahc::http::Error> for Error {
    fn from(err: isahc::http::Error) -> Error {
        Error::Request(err)
    }
}

impl From<isahc::Error> for Error {
    fn from(err: isahc::Error) -> Error {
        Error::Http(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
