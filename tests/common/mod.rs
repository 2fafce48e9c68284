// Shared test transport: scripted responses, no network, call counting.
#![allow(dead_code)]

use keyprobe::error::ProbeError;
use keyprobe::models::{Method, Outcome};
use keyprobe::transport::{ProbeRequest, Transport};
use serde_json::Value;
use std::sync::Mutex;

pub struct Script {
    pub method: Option<Method>,
    pub host_contains: Option<String>,
    pub path_contains: String,
    pub status: u16,
    pub body: Option<Value>,
    pub transport_error: Option<String>,
}

/// In-memory Transport that replays scripted responses and records every
/// invocation, so tests can assert both outcomes and call counts.
pub struct StubTransport {
    default_status: u16,
    scripts: Vec<Script>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl StubTransport {
    /// Every request succeeds with 200 and an empty JSON object.
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            default_status: status,
            scripts: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `status`/`body` for requests whose path contains the
    /// fragment. Scripts are matched in insertion order, first hit wins.
    pub fn script(mut self, method: Option<Method>, path_contains: &str, status: u16, body: Option<Value>) -> Self {
        self.scripts.push(Script {
            method,
            host_contains: None,
            path_contains: path_contains.to_string(),
            status,
            body,
            transport_error: None,
        });
        self
    }

    /// Respond with `status` for every request against a matching host.
    pub fn script_host(mut self, host_contains: &str, status: u16) -> Self {
        self.scripts.push(Script {
            method: None,
            host_contains: Some(host_contains.to_string()),
            path_contains: String::new(),
            status,
            body: None,
            transport_error: None,
        });
        self
    }

    /// Simulate a network-level failure for matching paths.
    pub fn fail_on(mut self, path_contains: &str) -> Self {
        self.scripts.push(Script {
            method: None,
            host_contains: None,
            path_contains: path_contains.to_string(),
            status: 0,
            body: None,
            transport_error: Some("connection refused".to_string()),
        });
        self
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: &ProbeRequest) -> Outcome {
        let path = request.resolved_path();
        self.calls
            .lock()
            .unwrap()
            .push((request.method, path.clone()));

        for script in &self.scripts {
            let method_matches = script.method.map_or(true, |m| m == request.method);
            let host_matches = script
                .host_contains
                .as_ref()
                .map_or(true, |h| request.host.contains(h.as_str()));
            if method_matches && host_matches && path.contains(&script.path_contains) {
                if let Some(err) = &script.transport_error {
                    return request.failure_outcome(ProbeError::Transport(err.clone()));
                }
                let bytes = script
                    .body
                    .as_ref()
                    .map(|b| b.to_string().len())
                    .unwrap_or(0);
                return request.response_outcome(
                    script.status,
                    Some("application/json".to_string()),
                    bytes,
                    script.body.clone(),
                    None,
                );
            }
        }

        request.response_outcome(
            self.default_status,
            Some("application/json".to_string()),
            2,
            Some(serde_json::json!({})),
            None,
        )
    }
}
