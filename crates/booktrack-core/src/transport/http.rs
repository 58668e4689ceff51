//! reqwest-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::debug;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{ApiError, ApiResult};

const USER_AGENT: &str = concat!("booktrack/", env!("CARGO_PKG_VERSION"));

/// Transport that sends requests over HTTP(S)
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the given base URL
    ///
    /// Requests never time out unless `timeout` is set.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport {
            url: base_url.to_string(),
            source: Box::new(e),
        })?;

        Ok(Self { client, base_url })
    }

    /// The base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve request segments against the base URL
    pub fn url_for(&self, segments: &[String]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request.segments)?;
        debug!("{} {}", request.method, url);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url.clone());
        if let Some(ref token) = request.bearer {
            builder = builder.header(AUTHORIZATION, token.header_value());
        }
        if request.json_content_type {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let transport_err = |e: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        };

        let response = builder.send().await.map_err(transport_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_err)?.to_vec();
        debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());

        Ok(ApiResponse { status, body })
    }
}
