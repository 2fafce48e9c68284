// Report building and export for keyprobe
// Report::build is the classifier's aggregation step: pure, idempotent, and
// tolerant of partial runs. Export writes JSON and Markdown files with
// timestamped names; the core itself never touches disk elsewhere.

use crate::models::{AuditEntry, Category, Outcome};
use crate::verdict::{capability_level, classify_ratio, AccessVerdict, CapabilityLevel};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Fixed aggregation order for the category table.
const CATEGORY_ORDER: [Category; 5] = [
    Category::Read,
    Category::Write,
    Category::Management,
    Category::Delete,
    Category::AccountInfo,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub successes: usize,
    pub total: usize,
    pub success_rate: f64,
}

/// One advisory write-capability finding, built from an endpoint's
/// OPTIONS/HEAD/GET triple. Advisory only; see `CapabilityLevel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityFinding {
    pub host: String,
    pub path: String,
    pub label: String,
    pub options_reachable: bool,
    pub head_reachable: bool,
    pub get_reachable: bool,
    pub get_has_data: bool,
    pub level: CapabilityLevel,
}

/// The sole externally consumed artifact of a run. Immutable after
/// construction; collaborators persist or render it, the core only builds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
    /// Redacted key prefix, never the full credential.
    pub credential: String,
    pub pinned_host: Option<String>,
    pub categories: Vec<CategoryStats>,
    pub successes: usize,
    pub total: usize,
    pub overall_rate: f64,
    pub verdict: AccessVerdict,
    pub capability_findings: Vec<CapabilityFinding>,
    pub outcomes: Vec<Outcome>,
    pub audit: Vec<AuditEntry>,
}

impl Report {
    /// Aggregate a run's outcomes and audit trail. Pure function of its
    /// inputs: the same outcome list always builds the same report, and a
    /// partial outcome list (an interrupted run) is as valid as a full one.
    pub fn build(
        outcomes: &[Outcome],
        audit: &[AuditEntry],
        credential_redacted: &str,
        pinned_host: Option<String>,
    ) -> Report {
        let mut categories = Vec::new();
        for category in CATEGORY_ORDER {
            let total = outcomes.iter().filter(|o| o.category == category).count();
            if total == 0 {
                continue;
            }
            let successes = outcomes
                .iter()
                .filter(|o| o.category == category && o.success)
                .count();
            categories.push(CategoryStats {
                category,
                successes,
                total,
                success_rate: successes as f64 * 100.0 / total as f64,
            });
        }

        let total = outcomes.len();
        let successes = outcomes.iter().filter(|o| o.success).count();
        let overall_rate = if total == 0 {
            0.0
        } else {
            successes as f64 * 100.0 / total as f64
        };

        Report {
            generated_at: Utc::now(),
            catalog_version: crate::catalog::CATALOG_VERSION.to_string(),
            credential: credential_redacted.to_string(),
            pinned_host,
            categories,
            successes,
            total,
            overall_rate,
            verdict: classify_ratio(successes, total),
            capability_findings: capability_findings(outcomes),
            outcomes: outcomes.to_vec(),
            audit: audit.to_vec(),
        }
    }
}

/// Fold write-category OPTIONS/HEAD/GET outcomes into per-endpoint findings.
/// Grouping is by (host, path, label) in first-seen order, so findings are
/// deterministic for a deterministic run.
fn capability_findings(outcomes: &[Outcome]) -> Vec<CapabilityFinding> {
    use crate::models::Method;

    let mut keys: Vec<(String, String, String)> = Vec::new();
    for o in outcomes {
        if o.category != Category::Write {
            continue;
        }
        if !matches!(o.method, Method::OPTIONS | Method::HEAD | Method::GET) {
            continue;
        }
        let key = (o.host.clone(), o.path.clone(), o.label.clone());
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|(host, path, label)| {
            let triple: Vec<&Outcome> = outcomes
                .iter()
                .filter(|o| {
                    o.host == host
                        && o.path == path
                        && o.label == label
                        && o.category == Category::Write
                })
                .collect();
            let reachable = |m: Method| triple.iter().any(|o| o.method == m && o.success);
            let options_reachable = reachable(Method::OPTIONS);
            let head_reachable = reachable(Method::HEAD);
            let get_reachable = reachable(Method::GET);
            let get_has_data = triple
                .iter()
                .any(|o| o.method == Method::GET && o.success && o.has_data());

            CapabilityFinding {
                host,
                path,
                label,
                options_reachable,
                head_reachable,
                get_reachable,
                get_has_data,
                level: capability_level(head_reachable, get_reachable, get_has_data),
            }
        })
        .collect()
}

pub fn export_json(report: &Report) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("keyprobe_report_{}.json", timestamp);
    let mut file = File::create(&filename)?;
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    file.write_all(json.as_bytes())?;
    Ok(filename)
}

pub fn export_markdown(report: &Report) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("keyprobe_report_{}.md", timestamp);
    let mut file = File::create(&filename)?;

    writeln!(file, "# keyprobe Report\n")?;
    writeln!(file, "- Key: `{}`", report.credential)?;
    writeln!(file, "- Catalog: {}", report.catalog_version)?;
    if let Some(host) = &report.pinned_host {
        writeln!(file, "- Pinned host: {}", host)?;
    }
    writeln!(
        file,
        "- Overall: **{}** ({}/{} = {:.1}%)\n",
        report.verdict, report.successes, report.total, report.overall_rate
    )?;

    writeln!(file, "## Access by category\n")?;
    writeln!(file, "| Category | Success | Total | Rate |")?;
    writeln!(file, "|---|---|---|---|")?;
    for row in &report.categories {
        writeln!(
            file,
            "| {} | {} | {} | {:.1}% |",
            row.category, row.successes, row.total, row.success_rate
        )?;
    }

    if !report.capability_findings.is_empty() {
        writeln!(file, "\n## Write-capability indicators (advisory)\n")?;
        writeln!(file, "| Endpoint | OPTIONS | HEAD | GET | Data | Level |")?;
        writeln!(file, "|---|---|---|---|---|---|")?;
        for f in &report.capability_findings {
            writeln!(
                file,
                "| {} | {} | {} | {} | {} | {} |",
                f.path, f.options_reachable, f.head_reachable, f.get_reachable, f.get_has_data, f.level
            )?;
        }
    }

    writeln!(file, "\n## Attempts\n")?;
    for o in &report.outcomes {
        let status = o
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let error = o
            .error
            .as_ref()
            .map(|e| format!(" ({})", e))
            .unwrap_or_default();
        writeln!(
            file,
            "- `{}` **{} {}{}** [{}] status {}{}",
            if o.success { "OK" } else { "FAIL" },
            o.method,
            o.host,
            o.path,
            o.auth_name,
            status,
            error
        )?;
    }

    if !report.audit.is_empty() {
        writeln!(file, "\n## Audit trail\n")?;
        for entry in &report.audit {
            writeln!(
                file,
                "- {} {} {} allowed={} success={} {}",
                entry.timestamp.to_rfc3339(),
                entry.method,
                entry.endpoint,
                entry.allowed,
                entry.success,
                entry.detail
            )?;
        }
    }

    Ok(filename)
}
