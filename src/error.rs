// Error kinds for keyprobe
// Everything below the Report boundary is absorbed into an Outcome;
// only MissingCredential is surfaced to the caller as a hard failure.

use crate::models::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kinds recorded on an `Outcome` or returned at construction time.
///
/// `PolicyBlocked` is deliberately a distinct variant from `Transport` so
/// tests can assert that a block happened locally, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum ProbeError {
    /// Network-level failure: DNS, timeout, connection refused. Recoverable;
    /// the run continues.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body was not in the expected structured format. Degrades to
    /// a text preview, never fatal.
    #[error("parse error: {0}")]
    Parse(String),

    /// The safety gate rejected the method before any network I/O.
    #[error("method {0} blocked by read-only policy")]
    PolicyBlocked(Method),

    /// No credential was supplied at construction. Fatal; the run never starts.
    #[error("integration key is required (set PENDO_API_KEY or pass --api-key)")]
    MissingCredential,
}

impl ProbeError {
    /// True when the failure was produced locally by the safety gate.
    pub fn is_policy_block(&self) -> bool {
        matches!(self, ProbeError::PolicyBlocked(_))
    }
}
