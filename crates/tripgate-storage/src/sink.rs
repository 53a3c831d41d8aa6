use crate::visit::{VisitRecord, VisitStore};
use async_trait::async_trait;
use tracing::{info, warn};
use tripgate_core::{Event, EventSink, GeoLocator, SinkError};

/// [`EventSink`] that persists one visit per resolved request.
///
/// The client IP is geolocated first; a failed lookup still records the
/// visit with an unknown location. Unknown-host events are not visits.
#[derive(Debug, Clone)]
pub struct VisitSink<S, G> {
    store: S,
    locator: G,
}

impl<S: VisitStore, G: GeoLocator> VisitSink<S, G> {
    pub fn new(store: S, locator: G) -> Self {
        Self { store, locator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: VisitStore, G: GeoLocator> EventSink for VisitSink<S, G> {
    fn name(&self) -> &'static str {
        "visits"
    }

    async fn handle(&self, event: &Event) -> Result<(), SinkError> {
        let Event::Resolved {
            host,
            profile,
            request,
            at,
            ..
        } = event
        else {
            return Ok(());
        };

        let location = match request.client_ip {
            Some(ip) => match self.locator.locate(ip).await {
                Ok(location) => location,
                Err(e) => {
                    warn!(ip = %ip, error = %e, "Could not geolocate client");
                    None
                }
            },
            None => None,
        };

        let visit = VisitRecord::new(host.clone(), *at, location);
        info!(
            host = %host,
            profile = %profile,
            country = %visit.country,
            city = %visit.city,
            "Visit"
        );

        self.store.record(&visit).await.map_err(SinkError::new)
    }
}
