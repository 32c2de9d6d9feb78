//! Release descriptor download

use reqwest::blocking::Client;

use super::ReleaseDescriptor;
use crate::error::{Result, release};
use crate::http;

/// Downloads and parses release descriptors
pub struct ReleaseFetcher<'a> {
    client: &'a Client,
}

impl<'a> ReleaseFetcher<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch the descriptor at `url`.
    ///
    /// Transport failures and non-2xx responses are network errors; a body
    /// that is not a descriptor-shaped YAML document is a parse error.
    pub fn fetch(&self, url: &str) -> Result<ReleaseDescriptor> {
        let body = http::get(self.client, url)?
            .text()
            .map_err(|e| release::network(url, e))?;

        let descriptor = ReleaseDescriptor::from_yaml(&body)?;
        tracing::info!("Got Release: {}", descriptor.name());
        Ok(descriptor)
    }
}
