use serde::Serialize;
use tripgate_core::{Event, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Pageview,
    CustomEvent,
    Performance,
    Outbound,
    Error,
}

/// Payload accepted by the Rybbit tracking endpoint. Empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RybbitEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl RybbitEvent {
    /// Maps a resolution event, tagging it with `site_id`.
    ///
    /// Unknown hosts and upstream failures are `error` events, fallbacks are
    /// `pageview` events and trip redirects are `outbound` events.
    pub fn from_event(event: &Event, site_id: &str) -> Self {
        let request = event.request();

        let (kind, user_id, page_title) = match event {
            Event::UnknownHost { .. } => (EventType::Error, None, None),
            Event::Resolved {
                profile, outcome, ..
            } => {
                let user_id = Some(profile.to_string());
                match outcome {
                    Outcome::UpstreamError => (EventType::Error, user_id, None),
                    Outcome::NoTrips | Outcome::NoMatch => (EventType::Pageview, user_id, None),
                    Outcome::Trip { slug, .. } => (
                        EventType::Outbound,
                        user_id,
                        Some(format!("Trip: {slug}")),
                    ),
                    Outcome::CacheHit => (EventType::Outbound, user_id, None),
                }
            }
        };

        Self {
            kind,
            site_id: Some(site_id.to_string()),
            pathname: Some(request.path.clone()).filter(|p| !p.is_empty()),
            hostname: Some(event.host().to_string()),
            page_title,
            referrer: request.referrer.clone(),
            user_id,
            user_agent: request.user_agent.clone(),
            ip_address: request.client_ip.map(|ip| ip.to_string()),
        }
    }
}
