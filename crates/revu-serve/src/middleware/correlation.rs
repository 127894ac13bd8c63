//! Every API call carries a correlation id that also tags the events it
//! emits, so a dashboard action can be traced through the event log.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use ulid::Ulid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone, Debug)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    fn mint() -> Self {
        Self(format!("corr_{}", Ulid::new()))
    }

    fn from_request(request: &Request<Body>) -> Option<Self> {
        let value = request.headers().get(CORRELATION_HEADER)?.to_str().ok()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }
}

/// Adopts the caller's id when the header is present, mints one
/// otherwise, and echoes the id back on the response.
pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = CorrelationId::from_request(&request).unwrap_or_else(CorrelationId::mint);
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.0) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_HEADER), value);
    }
    response
}
