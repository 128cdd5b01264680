//! Clap-free settings for the compare pipeline.

use camino::Utf8PathBuf;

/// Settings for the compare pipeline.
#[derive(Debug, Clone)]
pub struct CompareSettings {
    /// Schema file or directory of the schemas being replaced.
    pub authoritative: Utf8PathBuf,
    /// Schema file or directory of the rebuilt schemas.
    pub candidate: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    /// Prefix for every reported attribute path.
    pub root_path: String,

    // Resource filter
    pub allow: Vec<String>,
    pub deny: Vec<String>,

    /// Candidate-only resources fail the run instead of being noted.
    pub strict: bool,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            authoritative: Utf8PathBuf::from("schemas/authoritative"),
            candidate: Utf8PathBuf::from("schemas/candidate"),
            out_dir: Utf8PathBuf::from("artifacts/schemaeq"),
            root_path: String::new(),
            allow: Vec::new(),
            deny: Vec::new(),
            strict: false,
        }
    }
}
