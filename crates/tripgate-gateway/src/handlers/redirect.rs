use crate::error::AppError;
use crate::request::{request_context, requested_host};
use crate::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;
use std::net::SocketAddr;
use tracing::{info, warn};
use tripgate_core::{Event, NormalizedHost};

/// `/` with any method: redirects the request host to its current trip page.
pub async fn redirect_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let headers = request.headers();
    let context = request_context(headers, request.uri().path(), peer);
    let host = NormalizedHost::new(requested_host(headers, request.uri()).unwrap_or_default());

    let Some(profile) = state.domains().lookup(&host) else {
        warn!(host = %host, "Unknown host");
        state.dispatcher().emit(Event::UnknownHost {
            host: host.clone(),
            request: context,
            at: Timestamp::now(),
        });
        return Err(AppError::UnknownHost(host.to_string()));
    };

    let resolution = state.redirector().resolve(&host, profile, context).await;
    info!(
        host = %host,
        profile = %profile,
        outcome = %resolution.outcome,
        target = %resolution.target,
        "Redirecting"
    );

    Ok((StatusCode::FOUND, [(LOCATION, resolution.target)]).into_response())
}

/// Every path other than `/` and `/health`.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
