//! Scripted transport for tests

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::{ApiError, ApiResult};

enum Reply {
    Response(ApiResponse),
    NetworkError,
}

/// Replays queued replies in order and records every request it sees
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply
    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.reply_raw(status, body.to_string().into_bytes())
    }

    /// Queue a reply with an arbitrary body
    pub fn reply_raw(&self, status: u16, body: Vec<u8>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Response(ApiResponse { status, body }));
        self
    }

    /// Queue a failure to reach the server
    pub fn fail_network(&self) -> &Self {
        self.replies.lock().unwrap().push_back(Reply::NetworkError);
        self
    }

    /// Requests sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = format!("mock://{}", request.path());
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::NetworkError) => Err(ApiError::Transport {
                url,
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            }),
            None => panic!("no reply queued for {}", url),
        }
    }
}
