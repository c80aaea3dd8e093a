//! The outbound HTTP client shared by the proxy (upstream feed) and the
//! generator (proxy endpoint).

use isahc::config::{Configurable, RedirectPolicy};
use isahc::HttpClient;
use std::sync::OnceLock;

static CLIENT: OnceLock<Result<HttpClient, isahc::Error>> = OnceLock::new();

/// Returns the process-wide client, building it on first use. No request
/// timeout is configured; an unresponsive server is left to the platform's
/// network defaults.
pub fn client() -> Result<&'static HttpClient, isahc::Error> {
    CLIENT.get_or_init(init_client).as_ref().map_err(Clone::clone)
}

fn init_client() -> Result<HttpClient, isahc::Error> {
    HttpClient::builder()
        .redirect_policy(RedirectPolicy::Limit(10))
        .build()
}
