//! Rendering helpers (markdown and terminal text) for comparison reports.

use diffy::PatchFormatter;
use schemaeq_types::display_path;
use schemaeq_types::report::{CompareReport, Finding, Severity, VerdictStatus, codes};

pub fn render_report_md(report: &CompareReport) -> String {
    let mut out = String::new();
    out.push_str("# schemaeq report\n\n");
    out.push_str(&format!(
        "- Verdict: `{}`\n",
        verdict_label(report.verdict.status)
    ));
    let counts = &report.verdict.counts;
    out.push_str(&format!(
        "- Resources: {} (equivalent {}, mismatched {}, errors {})\n",
        counts.resources, counts.equivalent, counts.mismatched, counts.errors
    ));
    out.push_str(&format!("- Inputs: {}\n", report.inputs.len()));
    if let Some(ms) = report.run.duration_ms {
        out.push_str(&format!("- Duration: {} ms\n", ms));
    }
    for reason in &report.verdict.reasons {
        out.push_str(&format!("- Reason: {}\n", reason));
    }
    out.push('\n');

    out.push_str("## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("_No resources compared._\n");
        return out;
    }

    for (i, f) in report.findings.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, f.resource));
        out.push_str(&format!("- Code: `{}`\n", f.code));
        out.push_str(&format!("- Severity: `{}`\n", severity_label(f.severity)));
        if let Some(path) = &f.path {
            out.push_str(&format!("- Path: `{}`\n", display_path(path)));
        }
        out.push_str(&format!("\n{}\n", f.message));

        if let Some(diff) = node_diff(f) {
            out.push_str("\n```diff\n");
            out.push_str(&diff);
            if !diff.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
    }

    out
}

/// One line per resource plus a verdict line, for terminals.
pub fn render_summary_text(report: &CompareReport) -> String {
    let mut out = String::new();
    for f in &report.findings {
        let status = match (f.severity, f.code.as_str()) {
            (_, codes::EQUIVALENT) => "ok",
            (Severity::Info, _) => "note",
            (Severity::Error, _) => "FAIL",
        };
        match &f.path {
            Some(path) => out.push_str(&format!(
                "{:<4} {} [{}] {}: {}\n",
                status,
                f.resource,
                f.code,
                display_path(path),
                f.message
            )),
            None if f.code == codes::EQUIVALENT => {
                out.push_str(&format!("{:<4} {}\n", status, f.resource))
            }
            None => out.push_str(&format!(
                "{:<4} {} [{}] {}\n",
                status, f.resource, f.code, f.message
            )),
        }
    }

    let counts = &report.verdict.counts;
    out.push_str(&format!(
        "{}: {} resources, {} equivalent, {} mismatched, {} errors\n",
        verdict_label(report.verdict.status),
        counts.resources,
        counts.equivalent,
        counts.mismatched,
        counts.errors
    ));
    out
}

/// Unified diff of the two nodes carried by a value mismatch.
fn node_diff(finding: &Finding) -> Option<String> {
    if finding.code != codes::VALUE_MISMATCH {
        return None;
    }
    let data = finding.data.as_ref()?;
    let old = serde_json::to_string_pretty(data.get("authoritative")?).ok()?;
    let new = serde_json::to_string_pretty(data.get("candidate")?).ok()?;

    let patch = diffy::create_patch(&old, &new);
    let formatter = PatchFormatter::new();
    Some(format!("{}", formatter.fmt_patch(&patch)))
}

fn verdict_label(s: VerdictStatus) -> &'static str {
    match s {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Fail => "fail",
        VerdictStatus::Skip => "skip",
    }
}

fn severity_label(s: Severity) -> &'static str {
    match s {
        Severity::Info => "info",
        Severity::Error => "error",
    }
}
