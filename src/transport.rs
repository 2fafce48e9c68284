// Async HTTP transport for keyprobe
// Uses reqwest and tokio; every attempt resolves to exactly one Outcome,
// network faults included.

use crate::auth::AuthVariant;
use crate::error::ProbeError;
use crate::models::{Category, Credential, EndpointSpec, HostCandidate, Method, Outcome};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Response previews are truncated to this many characters when the body
/// does not parse as JSON.
const TEXT_PREVIEW_LIMIT: usize = 200;

/// One concrete attempt: a (host, endpoint, auth) combination ready to send.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub host: String,
    pub category: Category,
    pub method: Method,
    /// Path template; `{placeholder}` segments are substituted from
    /// `path_params` before the request goes out.
    pub path: String,
    pub label: String,
    pub auth: AuthVariant,
    pub path_params: HashMap<String, String>,
    pub body: Option<Value>,
}

impl ProbeRequest {
    pub fn new(
        host: &HostCandidate,
        spec: &EndpointSpec,
        auth: &AuthVariant,
        path_params: &HashMap<String, String>,
    ) -> Self {
        Self {
            host: host.base_url().to_string(),
            category: spec.category,
            method: spec.method,
            path: spec.path.to_string(),
            label: spec.label.to_string(),
            auth: auth.clone(),
            path_params: path_params.clone(),
            body: spec.sample_payload.clone(),
        }
    }

    /// Path with `{placeholder}` segments substituted. Unknown placeholders
    /// are left verbatim so the attempt still goes out and gets recorded.
    pub fn resolved_path(&self) -> String {
        let mut path = self.path.clone();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{}}}", name), value);
        }
        path
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.resolved_path())
    }

    /// A failed Outcome for this attempt that never reached the network.
    pub fn failure_outcome(&self, error: ProbeError) -> Outcome {
        Outcome {
            host: self.host.clone(),
            category: self.category,
            method: self.method,
            path: self.resolved_path(),
            label: self.label.clone(),
            auth_name: self.auth.name.to_string(),
            status: None,
            success: false,
            content_type: None,
            body_bytes: 0,
            body_sample: None,
            error: Some(error),
        }
    }

    /// An Outcome for an HTTP response to this attempt. Success requires
    /// `status < 400` and no transport-level error; a body read that dies
    /// mid-stream is a failure even on a 200. Parse errors stay non-fatal.
    pub fn response_outcome(
        &self,
        status: u16,
        content_type: Option<String>,
        body_bytes: usize,
        body_sample: Option<Value>,
        error: Option<ProbeError>,
    ) -> Outcome {
        let transport_failed = matches!(error, Some(ProbeError::Transport(_)));
        Outcome {
            host: self.host.clone(),
            category: self.category,
            method: self.method,
            path: self.resolved_path(),
            label: self.label.clone(),
            auth_name: self.auth.name.to_string(),
            status: Some(status),
            success: status < 400 && !transport_failed,
            content_type,
            body_bytes,
            body_sample,
            error,
        }
    }
}

/// Anything that can turn a ProbeRequest into an Outcome. The HTTP client,
/// the safety gate, and test stubs all sit behind this seam.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &ProbeRequest) -> Outcome;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, request: &ProbeRequest) -> Outcome {
        (**self).send(request).await
    }
}

/// Live transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
    credential: Credential,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(credential: Credential) -> Self {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .user_agent("keyprobe/1.0")
            .build()
            .unwrap();
        Self {
            client,
            credential,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ProbeRequest) -> Outcome {
        let url = request.url();

        let mut req = self
            .client
            .request(request.method.as_reqwest(), &url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .timeout(self.timeout);
        req = request.auth.apply(req, &self.credential);
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        log::debug!("{} {}", request.method, url);

        let response = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::debug!("transport failure for {}: {}", url, e);
                return request.failure_outcome(ProbeError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                // Got a status line but the body read failed mid-stream.
                return request.response_outcome(
                    status,
                    content_type,
                    0,
                    None,
                    Some(ProbeError::Transport(e.to_string())),
                );
            }
        };

        let is_json = content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let (sample, parse_error) = if bytes.is_empty() {
            (None, None)
        } else if is_json {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => (Some(sample_body(value)), None),
                Err(e) => {
                    // Declared JSON but did not parse; keep a preview instead
                    // of failing the outcome.
                    (
                        Some(Value::String(text_preview(&bytes))),
                        Some(ProbeError::Parse(e.to_string())),
                    )
                }
            }
        } else {
            (Some(Value::String(text_preview(&bytes))), None)
        };

        request.response_outcome(status, content_type, bytes.len(), sample, parse_error)
    }
}

/// Shallow sample of a parsed body: arrays keep their first element only,
/// everything else is kept whole. Mirrors what the report needs without
/// dragging full collection payloads around.
fn sample_body(value: Value) -> Value {
    match value {
        Value::Array(arr) => Value::Array(arr.into_iter().take(1).collect()),
        other => other,
    }
}

fn text_preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.chars().take(TEXT_PREVIEW_LIMIT).collect()
}
