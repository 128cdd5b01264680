use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two schema trees a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The schema being replaced; its keys drive the comparison walk.
    Authoritative,
    /// The rebuilt schema checked against the authoritative one.
    Candidate,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Authoritative => "authoritative",
            Side::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable finding codes.
pub mod codes {
    pub const EQUIVALENT: &str = "equivalent";
    pub const CARDINALITY_MISMATCH: &str = "cardinality_mismatch";
    pub const MISSING_KEY: &str = "missing_key";
    pub const VALUE_MISMATCH: &str = "value_mismatch";
    pub const INVALID_SCHEMA: &str = "invalid_schema";
    pub const MISSING_CANDIDATE: &str = "missing_candidate";
    pub const UNEXPECTED_CANDIDATE: &str = "unexpected_candidate";
    pub const LOAD_FAILED: &str = "load_failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub verdict: Verdict,

    #[serde(default)]
    pub inputs: Vec<InputRef>,

    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl CompareReport {
    pub fn new(tool: ToolInfo, started_at: DateTime<Utc>) -> Self {
        Self {
            schema: crate::schema::SCHEMAEQ_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                started_at,
                ended_at: None,
                duration_ms: None,
            },
            verdict: Verdict::default(),
            inputs: vec![],
            findings: vec![],
        }
    }

    pub fn is_equivalent(&self) -> bool {
        self.verdict.status == VerdictStatus::Pass
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub counts: Counts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Pass,
    Fail,
    /// Nothing was compared (no resources after filtering).
    #[default]
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub resources: u64,
    pub equivalent: u64,
    pub mismatched: u64,
    pub errors: u64,
}

/// A schema file that fed the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRef {
    pub side: Side,
    pub resource: String,
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub resource: String,
    pub severity: Severity,
    pub code: String,
    pub message: String,

    /// Dotted attribute path of the divergence, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Error,
}
