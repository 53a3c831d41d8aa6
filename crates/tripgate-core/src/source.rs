use crate::error::FetchError;
use crate::host::ProfileId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::IpAddr;

/// Fetches the raw profile payload from the upstream trip API.
///
/// Implementations return the decoded JSON as-is; shape handling is left to
/// [`crate::normalize`].
#[async_trait]
pub trait TripSource: Send + Sync + 'static {
    async fn fetch_profile(&self, profile: &ProfileId) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
}

/// Best-effort IP geolocation.
#[async_trait]
pub trait GeoLocator: Send + Sync + 'static {
    /// Returns `Ok(None)` when the address cannot be located.
    async fn locate(&self, ip: IpAddr) -> Result<Option<GeoLocation>, FetchError>;
}

/// A locator that never knows where anyone is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLocator;

#[async_trait]
impl GeoLocator for NoopLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<Option<GeoLocation>, FetchError> {
        Ok(None)
    }
}
