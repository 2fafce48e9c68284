// Core data models for keyprobe

use crate::error::ProbeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

impl Method {
    /// Methods that can change remote state. The safety gate refuses these
    /// while locked.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Method::POST | Method::PUT | Method::DELETE | Method::PATCH
        )
    }

    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
            Method::PATCH => reqwest::Method::PATCH,
            Method::OPTIONS => reqwest::Method::OPTIONS,
            Method::HEAD => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
            Method::PATCH => write!(f, "PATCH"),
            Method::OPTIONS => write!(f, "OPTIONS"),
            Method::HEAD => write!(f, "HEAD"),
        }
    }
}

/// Functional grouping of catalog entries. Fixed at catalog authoring time,
/// never inferred from path strings at aggregation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Read,
    Write,
    Management,
    Delete,
    AccountInfo,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Read => write!(f, "read"),
            Category::Write => write!(f, "write"),
            Category::Management => write!(f, "management"),
            Category::Delete => write!(f, "delete"),
            Category::AccountInfo => write!(f, "account_info"),
        }
    }
}

/// An opaque integration key. Redacted everywhere it is printed: only the
/// first ten characters survive into logs, reports, or Debug output.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Result<Self, ProbeError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ProbeError::MissingCredential);
        }
        Ok(Credential(key))
    }

    /// The full secret, for header construction only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted prefix suitable for reports and logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

/// One candidate base URL. Regional and legacy variants are tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCandidate(pub String);

impl HostCandidate {
    pub fn new(base_url: impl Into<String>) -> Self {
        HostCandidate(base_url.into())
    }

    pub fn base_url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A probe target from the static catalog. Paths may contain `{placeholder}`
/// segments that the transport substitutes before sending.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub category: Category,
    pub method: Method,
    pub path: &'static str,
    pub label: &'static str,
    pub sample_payload: Option<Value>,
}

impl EndpointSpec {
    pub fn new(
        category: Category,
        method: Method,
        path: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            category,
            method,
            path,
            label,
            sample_payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.sample_payload = Some(payload);
        self
    }
}

/// The recorded result of exactly one attempt. Immutable after creation;
/// nothing below the engine retries inside an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub host: String,
    pub category: Category,
    pub method: Method,
    /// Path after placeholder substitution.
    pub path: String,
    pub label: String,
    pub auth_name: String,
    /// None when the request never produced an HTTP response.
    pub status: Option<u16>,
    /// `status < 400` and no transport error.
    pub success: bool,
    pub content_type: Option<String>,
    pub body_bytes: usize,
    /// Shallow sample of a structured response body, when one parsed.
    pub body_sample: Option<Value>,
    pub error: Option<ProbeError>,
}

impl Outcome {
    /// True when the body parsed as JSON and holds at least one record
    /// (a non-empty array or non-empty object).
    pub fn has_data(&self) -> bool {
        match &self.body_sample {
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            _ => false,
        }
    }
}

/// One safety-gate decision. Append-only; every guarded call produces
/// exactly one entry, blocked calls included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub method: Method,
    pub endpoint: String,
    pub allowed: bool,
    pub success: bool,
    pub detail: String,
}
