// Verdict engine for keyprobe
// Maps aggregate success rates to a coarse access level, and read-only probe
// triples to an advisory write-capability level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse access level for the credential, derived from the overall success
/// rate of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessVerdict {
    Full,
    Moderate,
    Limited,
    Minimal,
}

impl fmt::Display for AccessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessVerdict::Full => write!(f, "FULL"),
            AccessVerdict::Moderate => write!(f, "MODERATE"),
            AccessVerdict::Limited => write!(f, "LIMITED"),
            AccessVerdict::Minimal => write!(f, "MINIMAL"),
        }
    }
}

/// Map an overall success ratio to a verdict. Band lower bounds are
/// inclusive: exactly 75% is FULL, exactly 50% is MODERATE, exactly 25% is
/// LIMITED. An empty run is MINIMAL.
pub fn classify_ratio(successes: usize, total: usize) -> AccessVerdict {
    if total == 0 {
        return AccessVerdict::Minimal;
    }
    let rate = successes as f64 * 100.0 / total as f64;
    if rate >= 75.0 {
        AccessVerdict::Full
    } else if rate >= 50.0 {
        AccessVerdict::Moderate
    } else if rate >= 25.0 {
        AccessVerdict::Limited
    } else {
        AccessVerdict::Minimal
    }
}

/// Advisory likelihood that the key could write to an endpoint, inferred
/// from read-only probes only. This is a proxy signal, never proof: only an
/// actual mutating call (which the locked gate prevents) would prove write
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapabilityLevel {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityLevel::None => write!(f, "NONE"),
            CapabilityLevel::Low => write!(f, "LOW"),
            CapabilityLevel::Medium => write!(f, "MEDIUM"),
            CapabilityLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Capability heuristic over one endpoint's OPTIONS/HEAD/GET triple:
/// HIGH when GET succeeds and returns non-empty structured data, MEDIUM when
/// GET succeeds without data, LOW when only HEAD succeeds, NONE otherwise.
/// OPTIONS reachability is recorded alongside the finding but does not move
/// the level.
pub fn capability_level(head_ok: bool, get_ok: bool, get_has_data: bool) -> CapabilityLevel {
    if get_ok && get_has_data {
        CapabilityLevel::High
    } else if get_ok {
        CapabilityLevel::Medium
    } else if head_ok {
        CapabilityLevel::Low
    } else {
        CapabilityLevel::None
    }
}
