// Safety gate for keyprobe
// Enforces a read-only method allow-list in front of the transport and keeps
// a complete audit trail: exactly one entry per guarded call, blocked calls
// included. A blocked call never reaches the network.

use crate::error::ProbeError;
use crate::models::{AuditEntry, Method, Outcome};
use crate::transport::{ProbeRequest, Transport};
use chrono::Utc;
use std::sync::Mutex;

/// Methods that pass a locked gate.
pub const READ_ONLY_METHODS: [Method; 3] = [Method::GET, Method::OPTIONS, Method::HEAD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Default. Only `READ_ONLY_METHODS` reach the inner transport.
    Locked,
    /// Raw passthrough, for callers explicitly running write probes.
    Unlocked,
}

/// Wraps any transport with the method allow-list and the audit sink. The
/// sink is owned by the gate instance, never ambient, so concurrent runs do
/// not interleave their trails.
pub struct SafetyGate<T> {
    inner: T,
    mode: GateMode,
    audit: Mutex<Vec<AuditEntry>>,
}

impl<T> SafetyGate<T> {
    pub fn locked(inner: T) -> Self {
        Self {
            inner,
            mode: GateMode::Locked,
            audit: Mutex::new(Vec::new()),
        }
    }

    pub fn unlocked(inner: T) -> Self {
        Self {
            inner,
            mode: GateMode::Unlocked,
            audit: Mutex::new(Vec::new()),
        }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Snapshot of the audit trail in decision order.
    pub fn audit(&self) -> Vec<AuditEntry> {
        self.audit.lock().unwrap().clone()
    }

    fn record(&self, method: Method, endpoint: &str, allowed: bool, success: bool, detail: String) {
        self.audit.lock().unwrap().push(AuditEntry {
            timestamp: Utc::now(),
            method,
            endpoint: endpoint.to_string(),
            allowed,
            success,
            detail,
        });
    }
}

impl<T: Transport> Transport for SafetyGate<T> {
    async fn send(&self, request: &ProbeRequest) -> Outcome {
        let endpoint = request.resolved_path();

        if self.mode == GateMode::Locked && !READ_ONLY_METHODS.contains(&request.method) {
            log::warn!(
                "policy block: {} {} rejected before network",
                request.method,
                endpoint
            );
            self.record(
                request.method,
                &endpoint,
                false,
                false,
                format!("{} not in read-only allow-list", request.method),
            );
            return request.failure_outcome(ProbeError::PolicyBlocked(request.method));
        }

        let outcome = self.inner.send(request).await;
        let detail = match outcome.status {
            Some(status) => format!("status {}", status),
            None => outcome
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no response".to_string()),
        };
        self.record(request.method, &endpoint, true, outcome.success, detail);
        outcome
    }
}
