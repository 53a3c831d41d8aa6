//! Rybbit analytics for resolution events.
//!
//! [`RybbitSink`] is an [`EventSink`](tripgate_core::EventSink): each event is
//! mapped to one Rybbit event and posted to the configured endpoint. Analytics
//! is only enabled when the endpoint, API key and site id are all set.

pub mod config;
pub mod error;
pub mod event;
pub mod sink;

pub use config::RybbitConfig;
pub use error::{AnalyticsError, Result};
pub use event::{EventType, RybbitEvent};
pub use sink::RybbitSink;
