// Static endpoint catalog for keyprobe
// Adding a probe target means appending a row here, not touching engine
// logic. Categories are assigned at authoring time and carried on every
// Outcome, so the classifier never re-derives them from path strings.

use crate::models::{Category, EndpointSpec, HostCandidate, Method};
use lazy_static::lazy_static;
use serde_json::json;
use std::collections::HashMap;

/// Bumped whenever rows are added or removed, so reports stay comparable.
pub const CATALOG_VERSION: &str = "2024.2";

lazy_static! {
    static ref CATALOG: Vec<EndpointSpec> = build_catalog();
}

fn build_catalog() -> Vec<EndpointSpec> {
    use Category::*;
    use Method::*;

    vec![
        // Read: listing endpoints known from the platform's v1 API.
        EndpointSpec::new(Read, GET, "/api/v1/guide", "List guides"),
        EndpointSpec::new(Read, GET, "/api/v1/feature", "List features"),
        EndpointSpec::new(Read, GET, "/api/v1/page", "List pages"),
        EndpointSpec::new(Read, GET, "/api/v1/report", "List reports"),
        EndpointSpec::new(Read, GET, "/api/v1/guide/{guideId}", "Get guide"),
        EndpointSpec::new(
            Read,
            GET,
            "/api/v1/metadata/schema/visitor",
            "Visitor metadata schema",
        ),
        EndpointSpec::new(
            Read,
            GET,
            "/api/v1/metadata/schema/guide",
            "Guide metadata schema",
        ),
        // Account info: who/what this key belongs to.
        EndpointSpec::new(AccountInfo, GET, "/api/v1/user/me", "User profile"),
        EndpointSpec::new(AccountInfo, GET, "/api/v1/account/me", "Account profile"),
        EndpointSpec::new(AccountInfo, GET, "/api/v1/subscription", "Subscription info"),
        EndpointSpec::new(AccountInfo, GET, "/api/v1/usage", "Usage statistics"),
        // Management: settings surfaces that only elevated keys can list.
        EndpointSpec::new(
            Management,
            GET,
            "/api/v1/integrationkeys",
            "Integration keys",
        ),
        EndpointSpec::new(Management, GET, "/api/v1/webhooks", "Webhook settings"),
        EndpointSpec::new(Management, GET, "/api/v1/featureFlags", "Feature flags"),
        EndpointSpec::new(Management, GET, "/api/v1/data-settings", "Data settings"),
        EndpointSpec::new(Management, GET, "/api/v1/visitor", "List visitors"),
        EndpointSpec::new(Management, GET, "/api/v1/account", "List accounts"),
        // Write: mutating entries carry harmless, clearly-labeled sample
        // payloads. These only go out through an unlocked gate.
        EndpointSpec::new(Write, POST, "/api/v1/visitor", "Create/update visitor")
            .with_payload(json!({
                "visitorId": "keyprobe-test-visitor",
                "values": {
                    "email": "test@example.com",
                    "firstName": "Test",
                    "lastName": "User",
                    "testField": "keyprobe capability check"
                }
            })),
        EndpointSpec::new(Write, POST, "/api/v1/account", "Create/update account")
            .with_payload(json!({
                "accountId": "keyprobe-test-account",
                "values": {
                    "name": "Test Account",
                    "industry": "Technology",
                    "testField": "keyprobe capability check"
                }
            })),
        EndpointSpec::new(Write, POST, "/api/v1/track", "Track event").with_payload(json!({
            "type": "track",
            "event": "keyprobe-capability-check",
            "visitorId": "keyprobe-test-visitor",
            "properties": { "source": "keyprobe" }
        })),
        EndpointSpec::new(Write, POST, "/api/v1/aggregation", "Aggregation query")
            .with_payload(json!({
                "response": { "mimeType": "application/json" },
                "request": {
                    "pipeline": [
                        { "source": { "visitors": null } },
                        { "limit": 1 }
                    ]
                }
            })),
        EndpointSpec::new(Write, POST, "/api/v1/visitors/bulk", "Bulk visitor upsert")
            .with_payload(json!([{
                "visitorId": "keyprobe-test-visitor",
                "values": { "testField": "keyprobe capability check" }
            }])),
        EndpointSpec::new(Write, PUT, "/api/v1/guide/{guideId}", "Update guide")
            .with_payload(json!({ "name": "keyprobe guide rename check" })),
        // Delete: only ever reaches the network with an unlocked gate, and
        // only against ids this tool created itself.
        EndpointSpec::new(Delete, DELETE, "/api/v1/visitor/{visitorId}", "Delete visitor"),
        EndpointSpec::new(Delete, DELETE, "/api/v1/account/{accountId}", "Delete account"),
        EndpointSpec::new(Delete, DELETE, "/api/v1/guide/{guideId}", "Delete guide"),
    ]
}

/// Catalog rows, optionally filtered to one category. Order is the authoring
/// order, which the engine relies on for reproducible runs.
pub fn entries(category: Option<Category>) -> Vec<&'static EndpointSpec> {
    CATALOG
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect()
}

/// Base URLs to try, primary region first, then regional and legacy hosts.
pub fn default_hosts() -> Vec<HostCandidate> {
    vec![
        HostCandidate::new("https://app.pendo.io"),
        HostCandidate::new("https://app.eu.pendo.io"),
        HostCandidate::new("https://us1.app.pendo.io"),
        HostCandidate::new("https://app.jpn.pendo.io"),
        HostCandidate::new("https://app.au.pendo.io"),
        HostCandidate::new("https://api.pendo.io"),
    ]
}

/// Substitution values for `{placeholder}` path segments. The ids point at
/// records the write probes themselves would have created.
pub fn default_path_params() -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("guideId".to_string(), "keyprobe-test-guide".to_string());
    params.insert(
        "visitorId".to_string(),
        "keyprobe-test-visitor".to_string(),
    );
    params.insert(
        "accountId".to_string(),
        "keyprobe-test-account".to_string(),
    );
    params
}
