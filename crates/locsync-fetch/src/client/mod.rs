//! HTTP client for the Tesla location directory.

use std::time::Duration;

use locsync_core::{by_country, Location, LocationType};
use reqwest::Client;

use crate::cache::FetchCache;
use crate::error::FetchError;

/// Production endpoint returning every location as one JSON array.
pub const LOCATION_URL: &str = "https://www.tesla.com/all-locations";

const LOCATIONS_PATH: &str = "all-locations";

/// Fetches the full location list, reusing a cached copy while it is fresh.
///
/// A cache miss costs exactly one GET. Non-2xx responses and network
/// failures are returned as errors without retrying; retry policy belongs to
/// whoever schedules runs.
pub struct LocationClient {
    client: Client,
    url: String,
    cache: Box<dyn FetchCache>,
}

impl LocationClient {
    /// Creates a client for the production endpoint.
    ///
    /// `timeout_secs` bounds the whole request. `user_agent` is sent on every
    /// request; the endpoint blocks the default agents of HTTP libraries.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        cache: Box<dyn FetchCache>,
    ) -> Result<Self, FetchError> {
        Self::build(timeout_secs, user_agent, LOCATION_URL.to_string(), cache)
    }

    /// Creates a client that fetches `{base_url}/all-locations` (for tests
    /// against a mock server).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`FetchError::Http`] if the client cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
        cache: Box<dyn FetchCache>,
    ) -> Result<Self, FetchError> {
        let url = Self::locations_url(base_url)?;
        Self::build(timeout_secs, user_agent, url, cache)
    }

    fn build(
        timeout_secs: u64,
        user_agent: &str,
        url: String,
        cache: Box<dyn FetchCache>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, url, cache })
    }

    fn locations_url(base_url: &str) -> Result<String, FetchError> {
        let mut base = reqwest::Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(LOCATIONS_PATH)
            .map(String::from)
            .map_err(|e| FetchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns every location tagged with at least one of `types`.
    ///
    /// An empty `types` slice matches nothing; ask for the types you want.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`]: network or TLS failure, or timeout.
    /// - [`FetchError::UnexpectedStatus`]: any non-2xx response.
    /// - [`FetchError::Deserialize`]: body is not a JSON array of locations.
    pub async fn fetch_all(&self, types: &[LocationType]) -> Result<Vec<Location>, FetchError> {
        let body = match self.cache.load() {
            Some(bytes) => {
                tracing::debug!(bytes = bytes.len(), "using cached location list");
                bytes
            }
            None => self.fetch_remote().await?,
        };

        let all: Vec<Location> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Deserialize {
                context: format!("location list from {}", self.url),
                source: e,
            })?;

        if types.is_empty() {
            tracing::warn!("no location types requested; nothing will match");
        }

        let total = all.len();
        let matching: Vec<Location> = all.into_iter().filter(|l| l.has_any(types)).collect();

        tracing::debug!(
            total,
            matching = matching.len(),
            types = ?types.iter().map(LocationType::as_str).collect::<Vec<_>>(),
            "filtered locations by type"
        );

        Ok(matching)
    }

    /// [`Self::fetch_all`] narrowed to the given country codes.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_all`].
    pub async fn countries(
        &self,
        countries: &[String],
        types: &[LocationType],
    ) -> Result<Vec<Location>, FetchError> {
        let all = self.fetch_all(types).await?;
        Ok(by_country(all, countries))
    }

    async fn fetch_remote(&self) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %self.url, "fetching location list");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?.to_vec();

        // Cache before parsing so a bad body is still inspectable next run.
        if let Err(e) = self.cache.store(&body) {
            tracing::warn!(error = %e, "could not write location cache");
        }

        Ok(body)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
