//! HTTP front end: maps the request host to a profile and redirects.

pub mod app;
pub mod cli;
pub mod domains;
pub mod error;
pub mod handlers;
pub mod model;
pub mod request;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use domains::DomainTable;
pub use error::{AppError, GatewayError};
pub use state::AppState;
