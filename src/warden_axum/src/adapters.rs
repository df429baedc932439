//! Axum implementations of the `warden_core` HTTP traits.
//!
//! `AxumRequest` buffers the body so the framework-agnostic handlers can read
//! it as a byte slice; `AxumResponseBuilder` turns builder calls into an
//! `axum::response::Response`.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{Response, StatusCode, request::Parts},
    response::IntoResponse,
};
use warden_adapters::ApiError;
use warden_core::{ApiRequest, ApiResponseBuilder};

const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// A request with its body already collected.
pub struct AxumRequest {
    parts: Parts,
    body: Bytes,
}

impl<S> FromRequest<S> for AxumRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_SIZE)
            .await
            .map_err(|_| ApiError::bad_request("Failed to read request body"))?;

        Ok(Self { parts, body })
    }
}

impl ApiRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name)?.to_str().ok()
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        let cookie_header = self.header("cookie")?;

        cookie_header.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    fn method(&self) -> &str {
        self.parts.method.as_str()
    }

    fn path(&self) -> &str {
        self.parts.uri.path()
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<String>,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
        }
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiResponseBuilder for AxumResponseBuilder {
    type Response = axum::response::Response;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.unwrap_or_default();
        self.builder.body(Body::from(body)).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
    }
}

pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
