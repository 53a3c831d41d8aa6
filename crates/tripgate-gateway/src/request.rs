//! Extraction of the routing host and request details from headers.

use axum::http::header::{HOST, REFERER, USER_AGENT};
use axum::http::{HeaderMap, Uri};
use std::net::{IpAddr, SocketAddr};
use tripgate_core::RequestContext;

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

fn header_str<'a>(headers: &'a HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// The host the client asked for: `X-Forwarded-Host`, else `Host`, else the
/// authority of the request target (HTTP/2 `:authority`).
///
/// Only the first entry of a comma separated `X-Forwarded-Host` is used.
pub fn requested_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    header_str(headers, X_FORWARDED_HOST)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, HOST))
        .or_else(|| uri.authority().map(|a| a.host()))
}

/// Client address: first `X-Forwarded-For` entry, else `X-Real-IP`, else the
/// peer address. Unparseable header values are skipped.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    header_str(headers, X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| header_str(headers, X_REAL_IP).and_then(|v| v.parse().ok()))
        .or_else(|| peer.map(|addr| addr.ip()))
}

pub fn request_context(headers: &HeaderMap, path: &str, peer: Option<SocketAddr>) -> RequestContext {
    RequestContext {
        path: path.to_owned(),
        user_agent: header_str(headers, USER_AGENT).map(str::to_owned),
        referrer: header_str(headers, REFERER).map(str::to_owned),
        client_ip: client_ip(headers, peer),
    }
}
