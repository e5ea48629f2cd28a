use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};
use serde_json::Value;

use crate::types::HttpResponse;

pub fn build_response(
    body_text: String,
    status_code: StatusCode,
    content_type: &str,
) -> anyhow::Result<HttpResponse> {
    let mut r = Response::builder()
        .status(status_code)
        .body(Full::new(Bytes::from(body_text)))?;
    r.headers_mut()
        .insert(header::CONTENT_TYPE, content_type.parse()?);
    Ok(r)
}

pub fn ok_json(v: Value) -> anyhow::Result<HttpResponse> {
    ret_json(StatusCode::OK, v)
}

pub fn ret_json(status_code: StatusCode, v: Value) -> anyhow::Result<HttpResponse> {
    build_response(v.to_string(), status_code, "application/json")
}

pub fn not_found(path: &str) -> anyhow::Result<HttpResponse> {
    build_response(
        format!("Not found: {}", path),
        StatusCode::NOT_FOUND,
        "text/html",
    )
}

/// Logs `error` and turns it into a plain 500 page.
pub fn internal_server_error(error: anyhow::Error) -> anyhow::Result<HttpResponse> {
    log::error!("request failed: {:#}", error);
    build_response(
        format!("Error: {}", error),
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/html",
    )
}
