//! HTTP clients for the services Tripgate consumes.
//!
//! - [`TripApiClient`] fetches a profile payload from the upstream trip API.
//! - [`IpApiLocator`] resolves a client IP to a country and city.
//!
//! Both clients use a bounded request timeout.

pub mod client;
pub mod geo;

pub use client::{TripApiClient, UpstreamConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use geo::{IpApiLocator, LocatorConfig};

use tripgate_core::FetchError;

const USER_AGENT: &str = concat!("tripgate/", env!("CARGO_PKG_VERSION"));

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let message = err.to_string();

    if err.is_timeout() {
        FetchError::Timeout(message)
    } else if err.is_decode() {
        FetchError::Decode(message)
    } else {
        FetchError::Transport(message)
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<reqwest::Url, FetchError> {
    let url = reqwest::Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| FetchError::Transport(format!("invalid base url '{}': {e}", raw)))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Transport(format!(
            "base url cannot carry a path: '{}'",
            raw
        )));
    }
    Ok(url)
}
