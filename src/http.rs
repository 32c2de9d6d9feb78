//! Blocking HTTP helpers shared by the release fetcher and archive extractor

use reqwest::blocking::{Client, Response};

use crate::error::{Result, release};

/// Build the HTTP client used for the whole run.
///
/// Requests carry no timeout: a stalled endpoint blocks the run until the
/// installer kills it.
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("rke2-genconfig/", env!("CARGO_PKG_VERSION")))
        .timeout(None)
        .build()
        .map_err(|e| release::network("<client>", e))
}

/// GET a URL, failing on transport errors and non-2xx statuses
pub fn get(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!("GET {}", url);
    client
        .get(url)
        .send()
        .and_then(Response::error_for_status)
        .map_err(|e| release::network(url, e))
}
