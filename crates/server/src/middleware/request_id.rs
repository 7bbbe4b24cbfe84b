//! # Request ID Middleware
//!
//! Assigns every request an id, runs the rest of the stack inside a span that
//! carries it, logs the outcome and echoes the id in `x-request-id`. Error
//! bodies also carry the id as `request_id`.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use error::ErrorBody;
use logging::{RequestId, REQUEST_ID_HEADER};
use tracing::Instrument;

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_default();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %path);

    let started = Instant::now();
    let mut response = next.run(request).instrument(span).await;

    logging::log_api_request!(
        request_id,
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    if let Some(body) = response.extensions_mut().remove::<ErrorBody>() {
        if let Ok(bytes) = serde_json::to_vec(&body.with_request_id(request_id.as_str())) {
            response.headers_mut().remove(header::CONTENT_LENGTH);
            *response.body_mut() = Body::from(bytes);
        }
    }

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
