//! Defines the [`FeedSource`] trait through which the generator obtains the
//! raw feed XML, with a proxy-backed and a file-backed implementation.

use crate::http_client;
use isahc::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Yields the raw RSS XML for one generation run.
pub trait FeedSource {
    fn fetch_xml(&self) -> Result<String>;
}

/// The JSON envelope served by the proxy. A successful response carries
/// `xml`; a failed one carries `error` and possibly the upstream `status`.
#[derive(Deserialize)]
struct Envelope {
    xml: Option<String>,
    error: Option<String>,
    status: Option<u16>,
}

/// Fetches the feed through the proxy endpoint.
pub struct ProxySource<'a> {
    pub endpoint: &'a str,
}

impl FeedSource for ProxySource<'_> {
    fn fetch_xml(&self) -> Result<String> {
        let mut response = http_client::client()?.get(self.endpoint)?;
        let body = response.text()?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        match envelope.xml {
            Some(xml) => Ok(xml),
            None => Err(Error::MissingXml {
                error: envelope.error,
                status: envelope.status,
            }),
        }
    }
}

/// Reads the feed from a local XML file instead of the network.
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: &Path) -> FileSource {
        FileSource {
            path: path.to_owned(),
        }
    }
}

impl FeedSource for FileSource {
    fn fetch_xml(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|err| Error::ReadFile {
            path: self.path.clone(),
            err,
        })
    }
}

/// Represents the result of a feed-fetch operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error obtaining the feed XML.
#[derive(Debug)]
pub enum Error {
    /// Returned when the proxy can't be reached.
    Http(isahc::Error),

    /// Returned when the proxy's response body can't be read.
    Io(std::io::Error),

    /// Returned when the proxy's response isn't a JSON envelope.
    Json(serde_json::Error),

    /// Returned when the envelope has no `xml`, i.e. the proxy reported a
    /// failure.
    MissingXml {
        error: Option<String>,
        status: Option<u16>,
    },

    /// Returned when a local feed file can't be read.
    ReadFile { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "fetching feed: {}", err),
            Error::Io(err) => write!(f, "reading feed response: {}", err),
            Error::Json(err) => write!(f, "decoding feed envelope: {}", err),
            Error::MissingXml { error, status } => {
                write!(f, "feed envelope has no `xml`")?;
                if let Some(error) = error {
                    write!(f, ": {}", error)?;
                }
                if let Some(status) = status {
                    write!(f, " (upstream status {})", status)?;
                }
                Ok(())
            }
            Error::ReadFile { path, err } => {
                write!(f, "reading feed file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::MissingXml { .. } => None,
            Error::ReadFile { path: _, err } => Some(err),
        }
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_envelope_with_xml() -> Result<()> {
        let envelope: Envelope = serde_json::from_str(r#"{"xml":"<rss></rss>"}"#)?;
        assert_eq!(envelope.xml.as_deref(), Some("<rss></rss>"));
        Ok(())
    }

    /// Starts a loopback server answering successive requests with `bodies`,
    /// in order, and returns its URL.
    fn serve_bodies(bodies: &'static [&'static str]) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        std::thread::spawn(move || {
            for body in bodies {
                let request = server.recv().unwrap();
                request
                    .respond(tiny_http::Response::from_string(*body))
                    .unwrap();
            }
        });
        format!("http://127.0.0.1:{}/feed", port)
    }

    #[test]
    fn test_proxy_source() {
        let endpoint = serve_bodies(&[
            "not json",
            r#"{"error":"Failed to fetch RSS","status":500}"#,
            r#"{"xml":"<rss/>"}"#,
        ]);
        let source = ProxySource {
            endpoint: &endpoint,
        };

        assert!(matches!(source.fetch_xml(), Err(Error::Json(_))));

        match source.fetch_xml() {
            Err(err @ Error::MissingXml {
                status: Some(500), ..
            }) => assert_eq!(
                err.to_string(),
                "feed envelope has no `xml`: Failed to fetch RSS (upstream status 500)"
            ),
            other => panic!("expected a missing-xml error, got {:?}", other),
        }

        assert_eq!(source.fetch_xml().unwrap(), "<rss/>");
    }

    #[test]
    fn test_proxy_source_unreachable() {
        // bind then drop to get a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let endpoint = format!("http://127.0.0.1:{}/feed", port);
        let source = ProxySource {
            endpoint: &endpoint,
        };
        assert!(matches!(source.fetch_xml(), Err(Error::Http(_))));
    }

    #[test]
    fn test_file_source() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("feed.xml");
        std::fs::write(&path, "<rss/>")?;
        assert_eq!(FileSource::new(&path).fetch_xml()?, "<rss/>");

        let missing = FileSource::new(&dir.path().join("missing.xml"));
        assert!(matches!(missing.fetch_xml(), Err(Error::ReadFile { .. })));
        Ok(())
    }
}
