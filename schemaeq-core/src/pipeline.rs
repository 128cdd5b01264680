//! Core compare pipeline, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: all filesystem operations are performed through the port
//! traits.

use crate::ports::{SchemaSource, WritePort};
use crate::settings::CompareSettings;
use anyhow::Context;
use glob::Pattern;
use schemaeq_domain::{SchemaMismatch, equal};
use schemaeq_load::{LoadedSchema, SchemaLoadError};
use schemaeq_render::render_report_md;
use schemaeq_types::report::{
    CompareReport, Counts, Finding, InputRef, Severity, ToolInfo, Verdict, VerdictStatus, codes,
};
use schemaeq_types::{ObjectSchema, Side};
use std::collections::BTreeMap;
use tracing::debug;

/// Error type for pipeline results. Exit code 2 = structural mismatch, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("schemas are not structurally equivalent")]
    Mismatch,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Mismatch => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome of `run_compare`.
#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub report: CompareReport,
}

impl CompareOutcome {
    /// Map the verdict onto the pipeline's error taxonomy.
    ///
    /// Schemas that failed to load or break the element/kind invariant are tool errors; any other
    /// failing finding is a mismatch.
    pub fn into_result(self) -> Result<CompareReport, ToolError> {
        let counts = &self.report.verdict.counts;
        if counts.errors > 0 {
            return Err(ToolError::Internal(anyhow::anyhow!(
                "{} resource schema(s) could not be compared",
                counts.errors
            )));
        }
        if counts.mismatched > 0 {
            return Err(ToolError::Mismatch);
        }
        Ok(self.report)
    }
}

/// Run the compare pipeline and build the report.
///
/// The caller is responsible for writing artifacts to disk (via `WritePort`) or the convenience
/// `write_compare_artifacts` helper.
pub fn run_compare(
    settings: &CompareSettings,
    source: &dyn SchemaSource,
    tool: ToolInfo,
) -> Result<CompareOutcome, ToolError> {
    let started_at = chrono::Utc::now();
    let filter = ResourceFilter::new(&settings.allow, &settings.deny)?;

    let authoritative = source.load(Side::Authoritative)?;
    let candidate = source.load(Side::Candidate)?;

    let mut report = CompareReport::new(tool, started_at);
    let mut findings = Vec::new();

    let authoritative = index_side(
        Side::Authoritative,
        authoritative,
        &filter,
        &mut report.inputs,
        &mut findings,
    );
    let candidate = index_side(
        Side::Candidate,
        candidate,
        &filter,
        &mut report.inputs,
        &mut findings,
    );

    let mut resources: Vec<&String> = authoritative.keys().chain(candidate.keys()).collect();
    resources.sort();
    resources.dedup();

    for resource in &resources {
        let finding = match (authoritative.get(*resource), candidate.get(*resource)) {
            (Some(a), Some(c)) => compare_pair(resource, a, c, &settings.root_path),
            (Some(a), None) => match &a.schema {
                Err(e) => load_failed(a, Side::Authoritative, e),
                Ok(_) => Finding {
                    resource: resource.to_string(),
                    severity: Severity::Error,
                    code: codes::MISSING_CANDIDATE.to_string(),
                    message: "no candidate schema for this resource".to_string(),
                    path: None,
                    data: None,
                },
            },
            (None, Some(c)) => match &c.schema {
                Err(e) => load_failed(c, Side::Candidate, e),
                Ok(_) => Finding {
                    resource: resource.to_string(),
                    severity: if settings.strict {
                        Severity::Error
                    } else {
                        Severity::Info
                    },
                    code: codes::UNEXPECTED_CANDIDATE.to_string(),
                    message: "candidate schema has no authoritative counterpart".to_string(),
                    path: None,
                    data: None,
                },
            },
            (None, None) => continue,
        };
        findings.push(finding);
    }

    findings.sort_by(|a, b| a.resource.cmp(&b.resource));
    report.verdict = verdict(resources.len() as u64, &findings);
    report.findings = findings;

    let ended_at = chrono::Utc::now();
    report.run.ended_at = Some(ended_at);
    report.run.duration_ms = u64::try_from((ended_at - started_at).num_milliseconds()).ok();

    debug!(
        resources = report.verdict.counts.resources,
        mismatched = report.verdict.counts.mismatched,
        errors = report.verdict.counts.errors,
        "compare finished"
    );

    Ok(CompareOutcome { report })
}

/// Write report.json and report.md to the output directory.
pub fn write_compare_artifacts(
    outcome: &CompareOutcome,
    out_dir: &camino::Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_report_md(&outcome.report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    Ok(())
}

/// Allow/deny glob patterns over resource names. Deny wins.
#[derive(Debug, Default)]
struct ResourceFilter {
    allow: Vec<Pattern>,
    deny: Vec<Pattern>,
}

impl ResourceFilter {
    fn new(allow: &[String], deny: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            allow: compile(allow).context("invalid allow pattern")?,
            deny: compile(deny).context("invalid deny pattern")?,
        })
    }

    fn admits(&self, resource: &str) -> bool {
        if self.deny.iter().any(|p| p.matches(resource)) {
            return false;
        }
        self.allow.is_empty() || self.allow.iter().any(|p| p.matches(resource))
    }
}

fn compile(patterns: &[String]) -> anyhow::Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("pattern {:?}", p)))
        .collect()
}

/// Record inputs, report duplicates and keep the first file per resource.
fn index_side(
    side: Side,
    loaded: Vec<LoadedSchema>,
    filter: &ResourceFilter,
    inputs: &mut Vec<InputRef>,
    findings: &mut Vec<Finding>,
) -> BTreeMap<String, LoadedSchema> {
    let mut out: BTreeMap<String, LoadedSchema> = BTreeMap::new();
    for entry in loaded {
        if !filter.admits(&entry.resource) {
            debug!(side = %side, resource = %entry.resource, "resource filtered out");
            continue;
        }
        inputs.push(InputRef {
            side,
            resource: entry.resource.clone(),
            path: entry.path.to_string(),
            sha256: entry.sha256.clone(),
        });
        if let Some(first) = out.get(&entry.resource) {
            let err = match &entry.schema {
                Err(e @ SchemaLoadError::DuplicateResource { .. }) => e.clone(),
                _ => SchemaLoadError::DuplicateResource {
                    resource: entry.resource.clone(),
                    first: first.path.to_string(),
                },
            };
            findings.push(load_failed(&entry, side, &err));
            continue;
        }
        out.insert(entry.resource.clone(), entry);
    }
    out
}

fn compare_pair(resource: &str, a: &LoadedSchema, c: &LoadedSchema, root_path: &str) -> Finding {
    let (mut left, mut right) = match (&a.schema, &c.schema) {
        (Ok(l), Ok(r)) => (l.clone(), r.clone()),
        (Err(e), _) => return load_failed(a, Side::Authoritative, e),
        (_, Err(e)) => return load_failed(c, Side::Candidate, e),
    };

    match equal(&mut left, &mut right, root_path) {
        Ok(()) => Finding {
            resource: resource.to_string(),
            severity: Severity::Info,
            code: codes::EQUIVALENT.to_string(),
            message: "schemas are structurally equivalent".to_string(),
            path: None,
            data: None,
        },
        Err(mismatch) => {
            debug!(
                resource = %resource,
                path = %mismatch.path(),
                code = mismatch.code(),
                "resource differs"
            );
            mismatch_finding(resource, &mismatch)
        }
    }
}

fn mismatch_finding(resource: &str, mismatch: &SchemaMismatch) -> Finding {
    let (message, data) = match mismatch {
        SchemaMismatch::ValueMismatch { left, right, .. } => (
            "attribute differs from the authoritative schema".to_string(),
            Some(serde_json::json!({
                "authoritative": serde_json::to_value(left.as_ref()).ok(),
                "candidate": serde_json::to_value(right.as_ref()).ok(),
            })),
        ),
        SchemaMismatch::CardinalityMismatch { left, right, .. } => (
            mismatch.to_string(),
            Some(serde_json::json!({
                "authoritative_keys": keys(left),
                "candidate_keys": keys(right),
            })),
        ),
        SchemaMismatch::MissingKey { key, .. } => (
            mismatch.to_string(),
            Some(serde_json::json!({ "key": key })),
        ),
        SchemaMismatch::InvalidSchema { side, .. } => (
            mismatch.to_string(),
            Some(serde_json::json!({ "side": side })),
        ),
    };

    Finding {
        resource: resource.to_string(),
        severity: Severity::Error,
        code: mismatch.code().to_string(),
        message,
        path: Some(mismatch.path().to_string()),
        data,
    }
}

fn keys(schema: &ObjectSchema) -> Vec<&str> {
    schema.keys().collect()
}

fn load_failed(entry: &LoadedSchema, side: Side, err: &SchemaLoadError) -> Finding {
    Finding {
        resource: entry.resource.clone(),
        severity: Severity::Error,
        code: codes::LOAD_FAILED.to_string(),
        message: format!("{} schema {}: {}", side, entry.path, err),
        path: None,
        data: Some(serde_json::json!({ "side": side, "path": entry.path.as_str() })),
    }
}

fn verdict(resources: u64, findings: &[Finding]) -> Verdict {
    let mut counts = Counts {
        resources,
        ..Counts::default()
    };
    for f in findings {
        match f.code.as_str() {
            codes::EQUIVALENT => counts.equivalent += 1,
            codes::LOAD_FAILED | codes::INVALID_SCHEMA => counts.errors += 1,
            _ if f.severity == Severity::Error => counts.mismatched += 1,
            _ => {}
        }
    }

    let mut reasons = Vec::new();
    if counts.mismatched > 0 {
        reasons.push(format!("{} resource(s) differ structurally", counts.mismatched));
    }
    if counts.errors > 0 {
        reasons.push(format!("{} resource(s) could not be compared", counts.errors));
    }

    let status = if resources == 0 {
        VerdictStatus::Skip
    } else if counts.mismatched > 0 || counts.errors > 0 {
        VerdictStatus::Fail
    } else {
        VerdictStatus::Pass
    };

    Verdict {
        status,
        counts,
        reasons,
    }
}
