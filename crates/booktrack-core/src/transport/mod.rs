//! HTTP transport for the remote API
//!
//! A [`Transport`] sends one JSON request and hands back the status and raw
//! body. Interpreting the body (envelopes, ids) is left to the caller.
//!
//! ## Usage
//!
//! ```ignore
//! let transport = HttpTransport::new(&config.api_url, config.request_timeout())?;
//! let response = transport.send(ApiRequest::get(["books"])).await?;
//! let body = response.json()?;
//! ```

mod http;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::token::AuthToken;

pub use http::HttpTransport;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A request against the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments appended to the base URL (percent-encoded on send)
    pub segments: Vec<String>,
    /// Bearer token; the Authorization header is omitted when `None`
    pub bearer: Option<AuthToken>,
    /// JSON body
    pub body: Option<Value>,
    /// Send `Content-Type: application/json` even without a body
    pub json_content_type: bool,
}

impl ApiRequest {
    fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            bearer: None,
            body: None,
            json_content_type: false,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Get, segments)
    }

    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Post, segments).with_body(body)
    }

    pub fn put<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Put, segments).with_body(body)
    }

    /// DELETE carries the JSON content type even though it has no body
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::new(Method::Delete, segments);
        request.json_content_type = true;
        request
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self.json_content_type = true;
        self
    }

    /// Attach a bearer token (or none)
    pub fn with_bearer(mut self, bearer: Option<AuthToken>) -> Self {
        self.bearer = bearer;
        self
    }

    /// Path relative to the base URL, for logging
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> ApiResult<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::InvalidResponse("empty body".to_string()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Fail with [`ApiError::Status`] unless the status is 2xx
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
            })
        }
    }
}

/// Sends requests to the remote API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request; fails only when no response was received
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}
