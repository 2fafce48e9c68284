// Probe engine for keyprobe
// Walks the hosts x endpoints x auth-variants cross product sequentially,
// in a fixed order (hosts outer, endpoints middle, auths inner), producing
// exactly one Outcome per attempt. A failing attempt never aborts the run.

use crate::auth::{self, AuthVariant};
use crate::catalog;
use crate::models::{Category, EndpointSpec, HostCandidate, Method, Outcome};
use crate::transport::{ProbeRequest, Transport};
use std::collections::HashMap;

/// Everything a run produced: the outcome stream plus, when host pinning was
/// active, the host the run settled on (so results stay attributable).
#[derive(Debug, Clone)]
pub struct ProbeRun {
    pub outcomes: Vec<Outcome>,
    pub pinned_host: Option<String>,
}

impl ProbeRun {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            pinned_host: None,
        }
    }
}

pub struct ProbeEngine<T: Transport> {
    transport: T,
    path_params: HashMap<String, String>,
    /// Once any host yields a success, skip the remaining hosts for the rest
    /// of the run. An optimization only; correctness never depends on it.
    pin_on_success: bool,
}

impl<T: Transport> ProbeEngine<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            path_params: catalog::default_path_params(),
            pin_on_success: true,
        }
    }

    pub fn pin_on_success(mut self, pin: bool) -> Self {
        self.pin_on_success = pin;
        self
    }

    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Drive every (host, endpoint, auth) attempt through the transport.
    /// Iteration order is deterministic; individual failures are recorded
    /// and skipped over, never propagated.
    pub async fn run(
        &self,
        hosts: &[HostCandidate],
        endpoints: &[&EndpointSpec],
        auths: &[AuthVariant],
    ) -> ProbeRun {
        let mut run = ProbeRun::new();

        for host in hosts {
            if let Some(pinned) = &run.pinned_host {
                if pinned != host.base_url() {
                    continue;
                }
            }

            for endpoint in endpoints {
                for auth in auths {
                    let request = ProbeRequest::new(host, endpoint, auth, &self.path_params);
                    let outcome = self.transport.send(&request).await;

                    if self.pin_on_success && run.pinned_host.is_none() && outcome.success {
                        log::info!("pinning host {} after first success", host);
                        run.pinned_host = Some(host.base_url().to_string());
                    }
                    run.outcomes.push(outcome);
                }
            }
        }

        run
    }

    /// Baseline scan: the read and account-info rows with the platform's
    /// canonical auth scheme. Safe under any gate mode.
    pub async fn baseline_scan(&self, hosts: &[HostCandidate]) -> ProbeRun {
        let mut endpoints = catalog::entries(Some(Category::Read));
        endpoints.extend(catalog::entries(Some(Category::AccountInfo)));
        endpoints.extend(catalog::entries(Some(Category::Management)));
        self.run(hosts, &endpoints, &[auth::canonical_variant()]).await
    }

    /// Auth-scheme discovery: one known-good read endpoint crossed with the
    /// whole strategy set. Each variant is tried independently.
    pub async fn auth_discovery(&self, hosts: &[HostCandidate]) -> ProbeRun {
        let endpoints = catalog::entries(Some(Category::Read));
        let probe = endpoints.into_iter().take(1).collect::<Vec<_>>();
        self.run(hosts, &probe, &auth::default_variants()).await
    }

    /// Write-capability indicators: for each write-category row, probe the
    /// same path with OPTIONS, HEAD, and GET. No mutating verb is issued;
    /// the classifier turns the triples into advisory capability levels.
    pub async fn write_capability_scan(&self, hosts: &[HostCandidate]) -> ProbeRun {
        let auth = auth::canonical_variant();
        let mut run = ProbeRun::new();

        for host in hosts {
            if let Some(pinned) = &run.pinned_host {
                if pinned != host.base_url() {
                    continue;
                }
            }

            for endpoint in catalog::entries(Some(Category::Write)) {
                for method in [Method::OPTIONS, Method::HEAD, Method::GET] {
                    let mut request = ProbeRequest::new(host, endpoint, &auth, &self.path_params);
                    request.method = method;
                    // Indicator probes are read-shaped; never send the
                    // sample payload with them.
                    request.body = None;

                    let outcome = self.transport.send(&request).await;
                    if self.pin_on_success && run.pinned_host.is_none() && outcome.success {
                        run.pinned_host = Some(host.base_url().to_string());
                    }
                    run.outcomes.push(outcome);
                }
            }
        }

        run
    }
}
