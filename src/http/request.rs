//! Request identity and metadata extraction.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID as early as possible
//! - Propagate `x-request-id` to the response
//! - Extract routing-relevant metadata (method, URL, caller IP) into an
//!   explicit context value for the instrumentation wrapper
//!
//! # Design Decisions
//! - The request ID is attached by middleware before any handler runs, so
//!   every log line and span for the request can carry it
//! - Metadata is pulled through a dedicated extractor; handlers never read
//!   ambient request state

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request};
use std::convert::Infallible;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::observability::RequestContext;

/// Canonical request ID header.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator used by `SetRequestIdLayer`.
#[derive(Clone, Copy, Default)]
pub struct MakeCatalogRequestId;

impl MakeRequestId for MakeCatalogRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Metadata extracted from an inbound request.
///
/// Converted into a `RequestContext` once the handler knows its route label.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    pub url: String,
    pub ip: String,
    pub request_id: String,
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            method: parts.method.to_string(),
            url: parts.uri.to_string(),
            ip,
            request_id,
        })
    }
}

impl RequestMeta {
    /// Bind the metadata to a canonical route label, starting the clock.
    pub fn into_context(self, route: &'static str) -> RequestContext {
        RequestContext {
            route,
            method: self.method,
            url: self.url,
            ip: self.ip,
            request_id: self.request_id,
            started: Instant::now(),
        }
    }
}
