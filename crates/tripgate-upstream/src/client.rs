use crate::{map_reqwest_error, parse_base_url, USER_AGENT};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use tripgate_core::{FetchError, ProfileId, TripSource};
use typed_builder::TypedBuilder;

pub const DEFAULT_API_URL: &str = "https://api.polarsteps.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`TripApiClient`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct UpstreamConfig {
    /// Base URL of the trip API.
    #[builder(default = DEFAULT_API_URL.to_string(), setter(into))]
    pub base_url: String,
    /// Upper bound for one profile fetch, body included.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Client for `GET <base>/users/byusername/<profile>`.
#[derive(Debug, Clone)]
pub struct TripApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl TripApiClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    /// The URL fetched for `profile`.
    pub fn profile_url(&self, profile: &ProfileId) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", "byusername", profile.as_str()]);
        }
        url
    }
}

#[async_trait]
impl TripSource for TripApiClient {
    async fn fetch_profile(&self, profile: &ProfileId) -> Result<Value, FetchError> {
        let url = self.profile_url(profile);
        debug!(profile = %profile, url = %url, "Fetching profile from upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(profile = %profile, status = status.as_u16(), "Upstream returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let payload = response.json::<Value>().await.map_err(map_reqwest_error)?;
        trace!(profile = %profile, "Upstream payload decoded");
        Ok(payload)
    }
}
