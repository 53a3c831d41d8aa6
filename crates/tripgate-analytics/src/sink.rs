use crate::config::RybbitConfig;
use crate::error::{AnalyticsError, Result};
use crate::event::RybbitEvent;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, trace};
use tripgate_core::{Event, EventSink, SinkError};

/// Posts resolution events to a Rybbit endpoint.
#[derive(Debug, Clone)]
pub struct RybbitSink {
    client: reqwest::Client,
    config: RybbitConfig,
}

impl RybbitSink {
    pub fn new(config: RybbitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalyticsError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn site_id(&self) -> &str {
        &self.config.site_id
    }

    /// Sends one event and checks the response status.
    pub async fn send(&self, event: &RybbitEvent) -> Result<()> {
        trace!(kind = ?event.kind, "Sending analytics event");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(event)
            .send()
            .await
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => {
                debug!(kind = ?event.kind, "Analytics event accepted");
                Ok(())
            }
            status => Err(AnalyticsError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl EventSink for RybbitSink {
    fn name(&self) -> &'static str {
        "rybbit"
    }

    async fn handle(&self, event: &Event) -> std::result::Result<(), SinkError> {
        let payload = RybbitEvent::from_event(event, self.site_id());
        self.send(&payload).await.map_err(SinkError::new)
    }
}
