/// Classifier and report tests: verdict thresholds, capability heuristic,
/// idempotent report building, and partial-run tolerance.
use keyprobe::models::{Category, Method, Outcome};
use keyprobe::reporting::Report;
use keyprobe::verdict::{capability_level, classify_ratio, AccessVerdict, CapabilityLevel};
use serde_json::json;

fn outcome(category: Category, method: Method, success: bool) -> Outcome {
    Outcome {
        host: "https://app.pendo.io".to_string(),
        category,
        method,
        path: format!("/api/v1/{}", category),
        label: format!("{} probe", category),
        auth_name: "X-Pendo-Integration-Key".to_string(),
        status: Some(if success { 200 } else { 403 }),
        success,
        content_type: Some("application/json".to_string()),
        body_bytes: 2,
        body_sample: Some(json!({})),
        error: None,
    }
}

fn outcomes_with_rate(successes: usize, total: usize) -> Vec<Outcome> {
    (0..total)
        .map(|i| outcome(Category::Read, Method::GET, i < successes))
        .collect()
}

#[test]
fn verdict_threshold_table() {
    // Band lower bounds are inclusive; ties are deterministic
    assert_eq!(classify_ratio(75, 100), AccessVerdict::Full);
    assert_eq!(classify_ratio(74, 100), AccessVerdict::Moderate);
    assert_eq!(classify_ratio(50, 100), AccessVerdict::Moderate);
    assert_eq!(classify_ratio(49, 100), AccessVerdict::Limited);
    assert_eq!(classify_ratio(25, 100), AccessVerdict::Limited);
    assert_eq!(classify_ratio(24, 100), AccessVerdict::Minimal);
    assert_eq!(classify_ratio(0, 100), AccessVerdict::Minimal);
    assert_eq!(classify_ratio(100, 100), AccessVerdict::Full);
}

#[test]
fn report_verdict_follows_thresholds() {
    let outcomes = outcomes_with_rate(75, 100);
    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.verdict, AccessVerdict::Full);
    assert_eq!(report.successes, 75);
    assert_eq!(report.total, 100);

    let outcomes = outcomes_with_rate(74, 100);
    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.verdict, AccessVerdict::Moderate);
}

#[test]
fn all_failed_run_still_builds_a_report() {
    // 0% success is a valid, non-exceptional terminal state
    let outcomes = outcomes_with_rate(0, 12);
    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.verdict, AccessVerdict::Minimal);
    assert_eq!(report.overall_rate, 0.0);
    assert_eq!(report.outcomes.len(), 12);
}

#[test]
fn empty_run_is_minimal_not_an_error() {
    let report = Report::build(&[], &[], "key-prefix...", None);
    assert_eq!(report.verdict, AccessVerdict::Minimal);
    assert_eq!(report.total, 0);
    assert!(report.categories.is_empty());
}

#[test]
fn one_success_per_category_is_full() {
    // One GET per {read, write, management}, all succeeding: 3/3 = 100%
    let outcomes = vec![
        outcome(Category::Read, Method::GET, true),
        outcome(Category::Write, Method::GET, true),
        outcome(Category::Management, Method::GET, true),
    ];
    let report = Report::build(&outcomes, &[], "key-prefix...", None);

    assert_eq!(report.verdict, AccessVerdict::Full);
    assert_eq!(report.categories.len(), 3);
    for row in &report.categories {
        assert_eq!(row.successes, 1);
        assert_eq!(row.total, 1);
        assert_eq!(row.success_rate, 100.0);
    }
}

#[test]
fn category_table_ignores_absent_categories() {
    let outcomes = vec![
        outcome(Category::Read, Method::GET, true),
        outcome(Category::Read, Method::GET, false),
    ];
    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].category, Category::Read);
    assert_eq!(report.categories[0].success_rate, 50.0);
}

#[test]
fn report_build_is_idempotent() {
    let outcomes = vec![
        outcome(Category::Read, Method::GET, true),
        outcome(Category::Write, Method::GET, false),
        outcome(Category::Delete, Method::DELETE, false),
    ];
    let a = Report::build(&outcomes, &[], "key-prefix...", Some("https://app.pendo.io".into()));
    let b = Report::build(&outcomes, &[], "key-prefix...", Some("https://app.pendo.io".into()));

    // Identical up to the generation timestamp: no hidden mutable state
    assert_eq!(a.verdict, b.verdict);
    assert_eq!(a.successes, b.successes);
    assert_eq!(a.total, b.total);
    assert_eq!(
        serde_json::to_value(&a.categories).unwrap(),
        serde_json::to_value(&b.categories).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.capability_findings).unwrap(),
        serde_json::to_value(&b.capability_findings).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.outcomes).unwrap(),
        serde_json::to_value(&b.outcomes).unwrap()
    );
}

#[test]
fn report_accepts_partial_runs() {
    // A report built from a prefix of the outcomes is as valid as the full
    // one; an interrupted run still terminates with a report.
    let outcomes = outcomes_with_rate(6, 10);
    let partial = Report::build(&outcomes[..4], &[], "key-prefix...", None);
    assert_eq!(partial.total, 4);
    assert_eq!(partial.successes, 4);
    assert_eq!(partial.verdict, AccessVerdict::Full);
}

#[test]
fn capability_level_mapping() {
    // HIGH: GET succeeds with non-empty structured data
    assert_eq!(capability_level(true, true, true), CapabilityLevel::High);
    assert_eq!(capability_level(false, true, true), CapabilityLevel::High);
    // MEDIUM: GET succeeds without data
    assert_eq!(capability_level(true, true, false), CapabilityLevel::Medium);
    assert_eq!(capability_level(false, true, false), CapabilityLevel::Medium);
    // LOW: only HEAD succeeds
    assert_eq!(capability_level(true, false, false), CapabilityLevel::Low);
    // NONE: nothing reachable
    assert_eq!(capability_level(false, false, false), CapabilityLevel::None);
}

fn triple(path: &'static str, head_ok: bool, get_ok: bool, get_body: serde_json::Value, get_status: u16) -> Vec<Outcome> {
    let mk = |method: Method, success: bool, status: u16, sample: Option<serde_json::Value>| Outcome {
        host: "https://app.pendo.io".to_string(),
        category: Category::Write,
        method,
        path: path.to_string(),
        label: path.to_string(),
        auth_name: "X-Pendo-Integration-Key".to_string(),
        status: Some(status),
        success,
        content_type: Some("application/json".to_string()),
        body_bytes: 0,
        body_sample: sample,
        error: None,
    };
    vec![
        mk(Method::OPTIONS, false, 405, None),
        mk(Method::HEAD, head_ok, if head_ok { 200 } else { 404 }, None),
        mk(
            Method::GET,
            get_ok,
            if get_ok { get_status } else { 403 },
            Some(get_body),
        ),
    ]
}

#[test]
fn capability_findings_from_probe_triples() {
    let mut outcomes = Vec::new();
    outcomes.extend(triple("/api/v1/visitor", true, true, json!([{"id": "v1"}]), 200));
    outcomes.extend(triple("/api/v1/account", true, true, json!([]), 200));
    outcomes.extend(triple("/api/v1/track", true, false, json!(null), 403));
    outcomes.extend(triple("/api/v1/aggregation", false, false, json!(null), 403));

    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.capability_findings.len(), 4);

    let level_of = |path: &str| {
        report
            .capability_findings
            .iter()
            .find(|f| f.path == path)
            .unwrap()
            .level
    };
    assert_eq!(level_of("/api/v1/visitor"), CapabilityLevel::High);
    assert_eq!(level_of("/api/v1/account"), CapabilityLevel::Medium);
    assert_eq!(level_of("/api/v1/track"), CapabilityLevel::Low);
    assert_eq!(level_of("/api/v1/aggregation"), CapabilityLevel::None);
}

#[test]
fn same_path_rows_get_separate_findings() {
    // Two write rows can share a path under different labels (create vs
    // update); each finding is graded from its own outcomes only.
    let labeled = |label: &str, method: Method, success: bool, sample: Option<serde_json::Value>| Outcome {
        host: "https://app.pendo.io".to_string(),
        category: Category::Write,
        method,
        path: "/api/v1/visitor".to_string(),
        label: label.to_string(),
        auth_name: "X-Pendo-Integration-Key".to_string(),
        status: Some(if success { 200 } else { 403 }),
        success,
        content_type: Some("application/json".to_string()),
        body_bytes: 0,
        body_sample: sample,
        error: None,
    };
    let outcomes = vec![
        labeled("Create visitor", Method::HEAD, true, None),
        labeled("Create visitor", Method::GET, true, Some(json!([{"id": "v1"}]))),
        labeled("Update visitor", Method::HEAD, false, None),
        labeled("Update visitor", Method::GET, false, None),
    ];

    let report = Report::build(&outcomes, &[], "key-prefix...", None);
    assert_eq!(report.capability_findings.len(), 2);

    let level_of = |label: &str| {
        report
            .capability_findings
            .iter()
            .find(|f| f.label == label)
            .unwrap()
            .level
    };
    assert_eq!(level_of("Create visitor"), CapabilityLevel::High);
    // The failed row must not inherit the sibling's reachability.
    assert_eq!(level_of("Update visitor"), CapabilityLevel::None);
}

#[test]
fn findings_are_advisory_not_category_successes() {
    // A HIGH finding does not inflate the write category's success count
    // beyond the probes that actually succeeded.
    let outcomes = triple("/api/v1/visitor", true, true, json!([{"id": "v1"}]), 200);
    let report = Report::build(&outcomes, &[], "key-prefix...", None);

    let write_row = report
        .categories
        .iter()
        .find(|r| r.category == Category::Write)
        .unwrap();
    assert_eq!(write_row.total, 3);
    assert_eq!(write_row.successes, 2); // HEAD + GET
}
