//! Test doubles shared by unit tests

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records every request
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: impl IntoIterator<Item = TransportResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        })
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Other("no scripted response left".to_string()))
    }
}

/// A 200 response with a JSON body
pub(crate) fn ok(body: Value) -> TransportResponse {
    TransportResponse::new(200, body.to_string())
}

/// An error response with an empty JSON body
pub(crate) fn status(code: u16) -> TransportResponse {
    TransportResponse::new(code, "{\"errors\":[{\"message\":\"failed\"}]}")
}

/// Client against `https://app.asana.com/api/1.0` backed by `transport`
pub(crate) fn client_with(transport: &Arc<ScriptedTransport>) -> Client {
    Client::builder()
        .transport(transport.clone())
        .build()
        .unwrap()
}
