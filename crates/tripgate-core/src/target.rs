use crate::error::{CoreError, Result};
use crate::host::ProfileId;
use crate::trip::TripRecord;
use url::Url;

pub const DEFAULT_PROFILE_BASE_URL: &str = "https://polarsteps.com";

/// Builds redirect targets below the public profile site.
///
/// Profile and trip segments are percent-encoded, so upstream text can never
/// produce a target that is not a valid `Location` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrls {
    base_url: Url,
}

impl ProfileUrls {
    pub fn new(base_url: &str) -> Result<Self> {
        let invalid = |reason: String| CoreError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical url".to_owned()));
        }

        Ok(Self { base_url: url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The fallback target, `<base>/<profile>`.
    pub fn profile_url(&self, profile: &ProfileId) -> String {
        self.join(&[profile.as_str()])
    }

    /// The trip target, `<base>/<profile>/<id>-<slug>`.
    pub fn trip_url(&self, profile: &ProfileId, trip: &TripRecord) -> String {
        self.join(&[profile.as_str(), trip.path_segment().as_str()])
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use std::num::NonZeroU64;

    fn alice() -> ProfileId {
        ProfileId::new("alice").unwrap()
    }

    fn trip(slug: &str) -> TripRecord {
        TripRecord {
            id: NonZeroU64::new(5).unwrap(),
            slug: slug.to_string(),
            start: Timestamp::UNIX_EPOCH,
            end: None,
        }
    }

    #[test]
    fn profile_url() {
        let urls = ProfileUrls::new(DEFAULT_PROFILE_BASE_URL).unwrap();
        assert_eq!(urls.profile_url(&alice()), "https://polarsteps.com/alice");
    }

    #[test]
    fn trip_url() {
        let urls = ProfileUrls::new("https://trips.example/").unwrap();
        assert_eq!(
            urls.trip_url(&alice(), &trip("peru")),
            "https://trips.example/alice/5-peru"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let urls = ProfileUrls::new("https://trips.example/u/").unwrap();
        assert_eq!(urls.profile_url(&alice()), "https://trips.example/u/alice");
    }

    #[test]
    fn unsafe_slug_characters_are_encoded() {
        let urls = ProfileUrls::new(DEFAULT_PROFILE_BASE_URL).unwrap();

        let target = urls.trip_url(&alice(), &trip("peru\u{7}trip"));
        assert_eq!(target, "https://polarsteps.com/alice/5-peru%07trip");

        let target = urls.trip_url(&alice(), &trip("a/b c"));
        assert_eq!(target, "https://polarsteps.com/alice/5-a%2Fb%20c");

        let target = urls.trip_url(&alice(), &trip("café"));
        assert!(target.is_ascii(), "got {target}");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(ProfileUrls::new("not a url").is_err());
        assert!(ProfileUrls::new("mailto:someone@example.com").is_err());
    }
}
