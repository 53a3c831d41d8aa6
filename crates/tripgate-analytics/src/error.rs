use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("failed to create analytics client: {0}")]
    Client(String),
    #[error("analytics request failed: {0}")]
    Transport(String),
    #[error("analytics endpoint returned status {0}")]
    Status(u16),
}
