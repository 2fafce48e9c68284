// Main CLI entry point for keyprobe
// Uses clap for argument parsing; the binary is a thin wrapper that wires
// credential loading, the probe engine, and report export together.

use clap::{Arg, Command};
use keyprobe::auth;
use keyprobe::catalog;
use keyprobe::engine::{ProbeEngine, ProbeRun};
use keyprobe::models::{Credential, HostCandidate, Outcome};
use keyprobe::reporting::{export_json, export_markdown, Report};
use keyprobe::safety::SafetyGate;
use keyprobe::transport::HttpTransport;
use std::time::Duration;

/// Resolve the integration key from the CLI flag or the environment.
fn resolve_credential(flag: Option<&String>) -> Result<Credential, keyprobe::error::ProbeError> {
    match flag {
        Some(key) => Credential::new(key.clone()),
        None => Credential::new(std::env::var("PENDO_API_KEY").unwrap_or_default()),
    }
}

/// Fold one scan's results into the accumulator. The first host any scan
/// pins wins, so follow-up scans that pin on their own still land in the
/// report.
fn absorb_run(outcomes: &mut Vec<Outcome>, pinned_host: &mut Option<String>, run: ProbeRun) {
    if pinned_host.is_none() {
        *pinned_host = run.pinned_host;
    }
    outcomes.extend(run.outcomes);
}

fn print_outcomes(outcomes: &[Outcome]) {
    for o in outcomes {
        let icon = if o.success { "✅" } else { "❌" };
        let status = o
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        match &o.error {
            Some(e) => println!("  {} {} {}{} [{}] {}", icon, o.method, o.host, o.path, status, e),
            None => println!("  {} {} {}{} [{}]", icon, o.method, o.host, o.path, status),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = Command::new("keyprobe")
        .version("1.0.0")
        .author("Jake Abendroth")
        .about("Probes what an analytics-platform integration key can actually do")
        .after_help("EXAMPLES:\n  keyprobe --api-key KEY\n  PENDO_API_KEY=KEY keyprobe --auth-scan --markdown-report\n  keyprobe -k KEY -b https://app.eu.pendo.io --no-write-analysis\n\nSAFETY:\n  Runs are read-only by default: POST/PUT/DELETE/PATCH are blocked locally\n  and audited before any network call. --unlock-writes disables the gate and\n  sends the catalog's mutating probes for real. Only use it against data you\n  own.")
        .arg(Arg::new("api_key")
            .short('k')
            .long("api-key")
            .num_args(1)
            .help("Integration key (falls back to PENDO_API_KEY)"))
        .arg(Arg::new("base_url")
            .short('b')
            .long("base-url")
            .num_args(1)
            .action(clap::ArgAction::Append)
            .help("Base URL override; repeatable (default: known regional hosts)"))
        .arg(Arg::new("timeout")
            .long("timeout")
            .num_args(1)
            .default_value("15")
            .help("Per-request timeout in seconds"))
        .arg(Arg::new("auth_scan")
            .long("auth-scan")
            .action(clap::ArgAction::SetTrue)
            .help("Also try every credential-injection scheme"))
        .arg(Arg::new("no_write_analysis")
            .long("no-write-analysis")
            .action(clap::ArgAction::SetTrue)
            .help("Skip read-only write-capability indicator probes"))
        .arg(Arg::new("no_pin")
            .long("no-pin")
            .action(clap::ArgAction::SetTrue)
            .help("Keep scanning all hosts instead of pinning the first working one"))
        .arg(Arg::new("unlock_writes")
            .long("unlock-writes")
            .action(clap::ArgAction::SetTrue)
            .help("DANGEROUS: disable the read-only gate and run real write/delete probes"))
        .arg(Arg::new("json_report")
            .long("json-report")
            .action(clap::ArgAction::SetTrue)
            .help("Output JSON report (default: on)"))
        .arg(Arg::new("markdown_report")
            .long("markdown-report")
            .action(clap::ArgAction::SetTrue)
            .help("Output Markdown report (default: off)"))
        .get_matches();

    let credential = match resolve_credential(matches.get_one::<String>("api_key")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let timeout: u64 = matches
        .get_one::<String>("timeout")
        .and_then(|t| t.parse().ok())
        .unwrap_or(15);
    let auth_scan = matches.get_flag("auth_scan");
    let write_analysis = !matches.get_flag("no_write_analysis");
    let pin = !matches.get_flag("no_pin");
    let unlock_writes = matches.get_flag("unlock_writes");
    let json_report = matches.get_flag("json_report") || !matches.get_flag("markdown_report");
    let markdown_report = matches.get_flag("markdown_report");

    let hosts: Vec<HostCandidate> = match matches.get_many::<String>("base_url") {
        Some(urls) => urls.map(HostCandidate::new).collect(),
        None => catalog::default_hosts(),
    };

    println!("🔑 Key: {}", credential);
    println!("🌐 Hosts: {}", hosts.len());
    if unlock_writes {
        println!("⚠️  Gate UNLOCKED: mutating probes will reach the network");
    } else {
        println!("🛡️  Gate locked: read-only methods only");
    }

    let transport = HttpTransport::new(credential.clone()).with_timeout(Duration::from_secs(timeout));
    let gate = if unlock_writes {
        SafetyGate::unlocked(transport)
    } else {
        SafetyGate::locked(transport)
    };
    let engine = ProbeEngine::new(gate).pin_on_success(pin);

    let mut outcomes = Vec::new();
    let mut pinned_host: Option<String> = None;

    println!("\n📖 Baseline scan");
    let run = engine.baseline_scan(&hosts).await;
    print_outcomes(&run.outcomes);
    absorb_run(&mut outcomes, &mut pinned_host, run);

    // Higher-value probes stay on the pinned host when one was found.
    let followup_hosts: Vec<HostCandidate> = match &pinned_host {
        Some(host) => vec![HostCandidate::new(host.clone())],
        None => hosts.clone(),
    };

    if auth_scan {
        println!("\n🔐 Auth-scheme discovery");
        let run = engine.auth_discovery(&followup_hosts).await;
        print_outcomes(&run.outcomes);
        absorb_run(&mut outcomes, &mut pinned_host, run);
    }

    if write_analysis {
        println!("\n✏️  Write-capability indicators (read-only)");
        let run = engine.write_capability_scan(&followup_hosts).await;
        print_outcomes(&run.outcomes);
        absorb_run(&mut outcomes, &mut pinned_host, run);
    }

    if unlock_writes {
        println!("\n🚨 Live write/delete probes");
        let mut mutating = catalog::entries(Some(keyprobe::models::Category::Write));
        mutating.extend(catalog::entries(Some(keyprobe::models::Category::Delete)));
        let run = engine
            .run(&followup_hosts, &mutating, &[auth::canonical_variant()])
            .await;
        print_outcomes(&run.outcomes);
        absorb_run(&mut outcomes, &mut pinned_host, run);
    }

    let report = Report::build(
        &outcomes,
        &engine.transport().audit(),
        &credential.redacted(),
        pinned_host,
    );

    println!("\n📊 Access by category:");
    for row in &report.categories {
        println!(
            "   {}: {}/{} ({:.1}%)",
            row.category, row.successes, row.total, row.success_rate
        );
    }
    for finding in &report.capability_findings {
        println!("   write indicator {} -> {}", finding.path, finding.level);
    }
    println!(
        "\n🎯 Verdict: {} ({}/{} = {:.1}%)",
        report.verdict, report.successes, report.total, report.overall_rate
    );

    if json_report {
        match export_json(&report) {
            Ok(filename) => println!("💾 JSON report: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
    if markdown_report {
        match export_markdown(&report) {
            Ok(filename) => println!("💾 Markdown report: {}", filename),
            Err(e) => eprintln!("Failed to write Markdown report: {}", e),
        }
    }
}
