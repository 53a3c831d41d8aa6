use crate::{map_reqwest_error, parse_base_url, USER_AGENT};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, trace};
use tripgate_core::{FetchError, GeoLocation, GeoLocator};
use typed_builder::TypedBuilder;

const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(3);
const FIELDS: &str = "status,message,country,city";

#[derive(Debug, Clone, TypedBuilder)]
pub struct LocatorConfig {
    /// Base URL of an ip-api compatible service, e.g. `http://ip-api.com`.
    #[builder(setter(into))]
    pub base_url: String,
    #[builder(default = DEFAULT_LOCATOR_TIMEOUT)]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

/// [`GeoLocator`] backed by an ip-api style JSON endpoint
/// (`GET <base>/json/<ip>`).
///
/// Addresses that cannot be routed publicly (loopback, private, link-local,
/// unspecified) are never sent upstream.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: reqwest::Client,
    base_url: Url,
}

impl IpApiLocator {
    pub fn new(config: LocatorConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    fn lookup_url(&self, ip: IpAddr) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["json", ip.to_string().as_str()]);
        }
        url.query_pairs_mut().append_pair("fields", FIELDS);
        url
    }
}

fn is_public(ip: IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !(v4.is_private() || v4.is_link_local() || v4.is_broadcast()),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link local
            (first & 0xfe00) != 0xfc00 && (first & 0xffc0) != 0xfe80
        }
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, ip: IpAddr) -> Result<Option<GeoLocation>, FetchError> {
        if !is_public(ip) {
            trace!(ip = %ip, "Skipping geolocation for non-public address");
            return Ok(None);
        }

        let response = self
            .client
            .get(self.lookup_url(ip))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: IpApiResponse = response.json().await.map_err(map_reqwest_error)?;
        if body.status != "success" {
            debug!(ip = %ip, message = ?body.message, "Geolocation lookup failed");
            return Ok(None);
        }

        Ok(Some(GeoLocation {
            country: body.country.unwrap_or_else(|| "unknown".to_string()),
            city: body.city.unwrap_or_else(|| "unknown".to_string()),
        }))
    }
}
