use crate::error::SinkError;
use crate::host::{NormalizedHost, ProfileId};
use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;
use std::fmt::Display;
use std::net::IpAddr;
use std::num::NonZeroU64;

/// Classification of one resolution, reported to the side-effect sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The target was served from the freshness cache.
    CacheHit,
    /// A trip was selected and its target cached.
    Trip { id: NonZeroU64, slug: String },
    /// Upstream returned no usable trips; fallback target.
    NoTrips,
    /// Trips exist but none fell into a selection bucket; fallback target.
    NoMatch,
    /// Upstream could not be fetched or decoded; fallback target.
    UpstreamError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::CacheHit => "cache_hit",
            Outcome::Trip { .. } => "trip",
            Outcome::NoTrips => "no_trips",
            Outcome::NoMatch => "no_match",
            Outcome::UpstreamError => "upstream_error",
        }
    }

    /// Returns `true` if the target is the profile fallback page.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Outcome::NoTrips | Outcome::NoMatch | Outcome::UpstreamError
        )
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request details carried along for analytics and visit logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub path: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub client_ip: Option<IpAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A known host was resolved to a target.
    Resolved {
        host: NormalizedHost,
        profile: ProfileId,
        outcome: Outcome,
        target: String,
        request: RequestContext,
        at: Timestamp,
    },
    /// The host is not in the domain table.
    UnknownHost {
        host: NormalizedHost,
        request: RequestContext,
        at: Timestamp,
    },
}

impl Event {
    pub fn host(&self) -> &NormalizedHost {
        match self {
            Event::Resolved { host, .. } | Event::UnknownHost { host, .. } => host,
        }
    }

    pub fn request(&self) -> &RequestContext {
        match self {
            Event::Resolved { request, .. } | Event::UnknownHost { request, .. } => request,
        }
    }

    pub fn at(&self) -> Timestamp {
        match self {
            Event::Resolved { at, .. } | Event::UnknownHost { at, .. } => *at,
        }
    }
}

/// A fire-and-forget consumer of resolution events.
///
/// Errors are logged by the caller and never reach the redirect response.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &Event) -> Result<(), SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_classification() {
        assert!(!Outcome::CacheHit.is_fallback());
        assert!(!Outcome::Trip {
            id: NonZeroU64::new(1).unwrap(),
            slug: "x".into()
        }
        .is_fallback());
        assert!(Outcome::NoTrips.is_fallback());
        assert!(Outcome::NoMatch.is_fallback());
        assert!(Outcome::UpstreamError.is_fallback());
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(Outcome::Trip {
            id: NonZeroU64::new(5).unwrap(),
            slug: "peru".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "trip");
        assert_eq!(json["id"], 5);
        assert_eq!(json["slug"], "peru");
    }

    #[test]
    fn accessors_cover_both_variants() {
        let at = Timestamp::UNIX_EPOCH;
        let request = RequestContext {
            path: "/".into(),
            ..Default::default()
        };
        let event = Event::UnknownHost {
            host: NormalizedHost::new("nope.example"),
            request: request.clone(),
            at,
        };
        assert_eq!(event.host().as_str(), "nope.example");
        assert_eq!(event.request(), &request);
        assert_eq!(event.at(), at);
    }
}
