//! API Middleware
//!
//! Builds the per-request operation context and logs request outcomes.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::domain::{Locale, OperationContext};

/// Header carrying the requested interface language ("uz"/"ru"/"en").
const LANGUAGE_HEADER: &str = "hl";
/// Header naming the acting user for audit stamping.
const USERNAME_HEADER: &str = "x-username";

/// Build the [`OperationContext`] for this request from the `hl` and
/// `X-Username` headers and attach it as a request extension. Every core
/// operation receives the context as an explicit parameter from here on.
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let context = context_from_headers(request.headers());
    request.extensions_mut().insert(context);
    next.run(request).await
}

fn context_from_headers(headers: &HeaderMap) -> OperationContext {
    let locale = headers
        .get(LANGUAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(Locale::parse)
        .unwrap_or_default();

    let actor = headers
        .get(USERNAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("anonymous")
        .to_string();

    OperationContext::new(actor)
        .with_locale(locale)
        .with_correlation_id(Uuid::new_v4())
}

/// Log method, path, status and latency for every request.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let correlation_id = request
        .extensions()
        .get::<OperationContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms = elapsed.as_millis() as u64,
        correlation_id = ?correlation_id,
        "request handled"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(LANGUAGE_HEADER, HeaderValue::from_static("ru"));
        headers.insert(USERNAME_HEADER, HeaderValue::from_static("admin"));

        let ctx = context_from_headers(&headers);
        assert_eq!(ctx.locale, Locale::Ru);
        assert_eq!(ctx.actor, "admin");
        assert!(ctx.correlation_id.is_some());
    }

    #[test]
    fn test_context_defaults() {
        let ctx = context_from_headers(&HeaderMap::new());
        assert_eq!(ctx.locale, Locale::Uz);
        assert_eq!(ctx.actor, "anonymous");
    }

    #[test]
    fn test_invalid_language_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(LANGUAGE_HEADER, HeaderValue::from_static("de"));
        let ctx = context_from_headers(&headers);
        assert_eq!(ctx.locale, Locale::Uz);
    }
}
