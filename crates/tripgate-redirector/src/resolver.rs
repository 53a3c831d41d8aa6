use crate::dispatch::Dispatcher;
use crate::redirector::{Redirector, Resolution};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use tripgate_cache::TargetCache;
use tripgate_core::{
    normalize, select_trip, Clock, Event, NormalizedHost, Outcome, ProfileId, ProfileUrls,
    RequestContext, SystemClock, TripSource,
};

/// Resolves hosts to trip pages, falling back to the profile page.
///
/// Only a selected trip target is cached; fallbacks are recomputed on every
/// request so a profile that gains a trip is picked up without waiting for
/// the next cache reset.
#[derive(Debug)]
pub struct TripResolver<S, C, K = SystemClock> {
    source: Arc<S>,
    cache: C,
    urls: ProfileUrls,
    dispatcher: Dispatcher,
    clock: K,
}

impl<S, C> TripResolver<S, C, SystemClock>
where
    S: TripSource,
    C: TargetCache,
{
    pub fn new(source: S, cache: C, urls: ProfileUrls, dispatcher: Dispatcher) -> Self {
        Self {
            source: Arc::new(source),
            cache,
            urls,
            dispatcher,
            clock: SystemClock,
        }
    }
}

impl<S, C, K> TripResolver<S, C, K>
where
    S: TripSource,
    C: TargetCache,
    K: Clock,
{
    /// Replaces the clock used for trip selection and event timestamps.
    pub fn with_clock<K2: Clock>(self, clock: K2) -> TripResolver<S, C, K2> {
        TripResolver {
            source: self.source,
            cache: self.cache,
            urls: self.urls,
            dispatcher: self.dispatcher,
            clock,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Computes the target without consulting or reporting to anything else.
    async fn compute(&self, host: &NormalizedHost, profile: &ProfileId) -> Resolution {
        if let Some(target) = self.cache.get(host) {
            trace!(host = %host, "Serving cached target");
            return Resolution {
                target,
                outcome: Outcome::CacheHit,
            };
        }

        let fallback = || self.urls.profile_url(profile);

        let payload = match self.source.fetch_profile(profile).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(host = %host, profile = %profile, error = %e, "Upstream fetch failed");
                return Resolution {
                    target: fallback(),
                    outcome: Outcome::UpstreamError,
                };
            }
        };

        let trips = match normalize(&payload) {
            Ok(trips) => trips,
            Err(e) => {
                warn!(host = %host, profile = %profile, error = %e, "Upstream payload rejected");
                return Resolution {
                    target: fallback(),
                    outcome: Outcome::UpstreamError,
                };
            }
        };

        if trips.is_empty() {
            debug!(host = %host, profile = %profile, "Profile has no trips");
            return Resolution {
                target: fallback(),
                outcome: Outcome::NoTrips,
            };
        }

        let Some(selection) = select_trip(&trips, self.clock.now()) else {
            debug!(host = %host, profile = %profile, trips = trips.len(), "No trip selected");
            return Resolution {
                target: fallback(),
                outcome: Outcome::NoMatch,
            };
        };

        let trip = selection.trip;
        let target = self.urls.trip_url(profile, trip);
        self.cache.put(host.clone(), target.clone());

        info!(
            host = %host,
            trip_id = trip.id.get(),
            bucket = selection.bucket.as_str(),
            target = %target,
            "Selected trip"
        );

        Resolution {
            target,
            outcome: Outcome::Trip {
                id: trip.id,
                slug: trip.slug.clone(),
            },
        }
    }
}

#[async_trait]
impl<S, C, K> Redirector for TripResolver<S, C, K>
where
    S: TripSource,
    C: TargetCache,
    K: Clock,
{
    async fn resolve(
        &self,
        host: &NormalizedHost,
        profile: &ProfileId,
        request: RequestContext,
    ) -> Resolution {
        let resolution = self.compute(host, profile).await;

        self.dispatcher.emit(Event::Resolved {
            host: host.clone(),
            profile: profile.clone(),
            outcome: resolution.outcome.clone(),
            target: resolution.target.clone(),
            request,
            at: self.clock.now(),
        });

        resolution
    }
}
