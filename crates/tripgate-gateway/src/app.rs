use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, not_found_handler, redirect_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", any(redirect_handler))
            .route("/health", get(health_handler))
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
