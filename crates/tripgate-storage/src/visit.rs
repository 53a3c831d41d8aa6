use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use tripgate_core::{GeoLocation, NormalizedHost};

pub const UNKNOWN_LOCATION: &str = "unknown";

/// One visit of a resolved host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub host: NormalizedHost,
    pub at: Timestamp,
    pub country: String,
    pub city: String,
}

impl VisitRecord {
    /// Builds a visit, filling in `"unknown"` when the location is missing.
    pub fn new(host: NormalizedHost, at: Timestamp, location: Option<GeoLocation>) -> Self {
        let (country, city) = match location {
            Some(GeoLocation { country, city }) => (country, city),
            None => (UNKNOWN_LOCATION.to_string(), UNKNOWN_LOCATION.to_string()),
        };
        Self {
            host,
            at,
            country,
            city,
        }
    }
}

/// Append-only store of visits.
#[async_trait]
pub trait VisitStore: Send + Sync + 'static {
    /// Appends a visit.
    async fn record(&self, visit: &VisitRecord) -> Result<()>;

    /// Number of visits recorded for `host`.
    async fn count_for(&self, host: &NormalizedHost) -> Result<u64>;

    /// Total number of visits recorded.
    async fn count(&self) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_location_is_unknown() {
        let visit = VisitRecord::new(NormalizedHost::new("a.example"), Timestamp::UNIX_EPOCH, None);
        assert_eq!(visit.country, UNKNOWN_LOCATION);
        assert_eq!(visit.city, UNKNOWN_LOCATION);
    }

    #[test]
    fn location_is_copied() {
        let visit = VisitRecord::new(
            NormalizedHost::new("a.example"),
            Timestamp::UNIX_EPOCH,
            Some(GeoLocation {
                country: "Peru".into(),
                city: "Cusco".into(),
            }),
        );
        assert_eq!(visit.country, "Peru");
        assert_eq!(visit.city, "Cusco");
    }
}
