#![allow(dead_code)]

use litmus::{Error, HttpRequest, HttpResponse, Result, Transport};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// transport that replays queued responses and counts requests
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("status");
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(Error::Transport {
            status: None,
            message: message.to_string(),
        }));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn body_json(&self, index: usize) -> serde_json::Value {
        let body = self.request(index).body.expect("body");
        serde_json::from_slice(&body).expect("json body")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no response queued"))
    }
}

pub const LOGIN_OK: &str = r#"{"accessToken": "jwt-token", "projectID": "p1", "expiresIn": 86400, "type": "Bearer"}"#;

/// client logged in through `transport`, scoped to project `p1`
pub fn logged_in(transport: &Arc<RecordingTransport>) -> litmus::Client {
    transport.push(200, LOGIN_OK);
    litmus::Client::with_transport(
        litmus::ClientConfig::new("http://chaos.local:9002", "admin", "correct-pw"),
        transport.clone(),
    )
    .expect("login")
}
