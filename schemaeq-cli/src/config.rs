//! Configuration file loading for schemaeq.
//!
//! Discovers and loads `schemaeq.toml` from the working directory, or from an explicit `--config`
//! path. Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "schemaeq.toml";

/// Top-level configuration from schemaeq.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaeqConfig {
    /// Comparison settings (root path, resource filter, strictness).
    pub compare: CompareConfig,

    /// Where and how results are written.
    pub output: OutputConfig,
}

/// Compare section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Prefix for every reported attribute path.
    pub root_path: String,

    /// Fail on candidate resources with no authoritative counterpart.
    pub strict: bool,

    /// Allowlist glob patterns over resource names.
    /// If non-empty, only allowlisted resources are compared.
    pub allow: Vec<String>,

    /// Denylist glob patterns over resource names.
    pub deny: Vec<String>,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for report.json and report.md. Nothing is written when unset.
    pub dir: Option<Utf8PathBuf>,

    /// Stdout format.
    pub format: ReportFormat,
}

/// Stdout format for reports and listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Discover the schemaeq.toml config file in `dir`.
///
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a schemaeq.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SchemaeqConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<SchemaeqConfig> {
    let config: SchemaeqConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<SchemaeqConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(SchemaeqConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub root_path: String,
    pub strict: bool,

    /// Allow patterns (from config file, extended by CLI).
    pub allow: Vec<String>,

    /// Deny patterns (from config file, extended by CLI).
    pub deny: Vec<String>,

    pub out_dir: Option<Utf8PathBuf>,
    pub format: ReportFormat,
}

/// Compare flags that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CompareOverrides<'a> {
    pub allow: &'a [String],
    pub deny: &'a [String],
    pub root_path: Option<&'a str>,
    pub strict: bool,
    pub out_dir: Option<&'a Utf8Path>,
    pub format: Option<ReportFormat>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: SchemaeqConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: SchemaeqConfig) -> Self {
        Self { config }
    }

    /// Merge with compare command CLI arguments.
    ///
    /// CLI `allow` and `deny` lists extend the config file lists. Scalars given on the command
    /// line replace the config file values; `--strict` can only turn strictness on.
    pub fn merge_compare_args(self, cli: &CompareOverrides<'_>) -> MergedConfig {
        let mut allow = self.config.compare.allow;
        let mut deny = self.config.compare.deny;

        // CLI extends the config file lists
        for pattern in cli.allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in cli.deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        MergedConfig {
            root_path: cli
                .root_path
                .map(str::to_string)
                .unwrap_or(self.config.compare.root_path),
            strict: cli.strict || self.config.compare.strict,
            allow,
            deny,
            out_dir: cli
                .out_dir
                .map(Utf8Path::to_path_buf)
                .or(self.config.output.dir),
            format: cli.format.unwrap_or(self.config.output.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[compare]
root_path = "provider"
strict = true
allow = ["aws_*"]
deny = ["aws_eip"]

[output]
dir = "artifacts/schemaeq"
format = "json"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.compare.root_path, "provider");
        assert!(config.compare.strict);
        assert_eq!(config.compare.allow, vec!["aws_*"]);
        assert_eq!(config.compare.deny, vec!["aws_eip"]);
        assert_eq!(
            config.output.dir,
            Some(Utf8PathBuf::from("artifacts/schemaeq"))
        );
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.compare.allow.is_empty());
        assert!(config.compare.root_path.is_empty());
        assert!(!config.compare.strict);
        assert!(config.output.dir.is_none());
        assert_eq!(config.output.format, ReportFormat::Text);
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let err = parse_config("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("xml"));
    }

    #[test]
    fn test_parse_rejects_misspelled_key() {
        let err = parse_config("[compare]\nstrcit = true\n").unwrap_err();
        assert!(format!("{:#}", err).contains("strcit"));

        assert!(parse_config("[outptu]\ndir = \"out\"\n").is_err());
    }

    #[test]
    fn test_merge_cli_extends_lists() {
        let config = SchemaeqConfig {
            compare: CompareConfig {
                allow: vec!["aws_*".to_string()],
                deny: vec!["aws_eip".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let allow = vec!["google_*".to_string(), "aws_*".to_string()];
        let deny = vec!["aws_vpc".to_string()];

        let merged = ConfigMerger::new(config).merge_compare_args(&CompareOverrides {
            allow: &allow,
            deny: &deny,
            ..Default::default()
        });

        assert_eq!(merged.allow, vec!["aws_*", "google_*"]);
        assert_eq!(merged.deny, vec!["aws_eip", "aws_vpc"]);
    }

    #[test]
    fn test_merge_cli_scalars_override() {
        let config = SchemaeqConfig {
            compare: CompareConfig {
                root_path: "from_config".to_string(),
                ..Default::default()
            },
            output: OutputConfig {
                dir: Some(Utf8PathBuf::from("config_out")),
                format: ReportFormat::Json,
            },
        };

        let merged = ConfigMerger::new(config).merge_compare_args(&CompareOverrides {
            root_path: Some("from_cli"),
            out_dir: Some(Utf8Path::new("cli_out")),
            format: Some(ReportFormat::Text),
            strict: true,
            ..Default::default()
        });

        assert_eq!(merged.root_path, "from_cli");
        assert_eq!(merged.out_dir, Some(Utf8PathBuf::from("cli_out")));
        assert_eq!(merged.format, ReportFormat::Text);
        assert!(merged.strict);
    }

    #[test]
    fn test_merge_keeps_config_when_cli_silent() {
        let config = SchemaeqConfig {
            compare: CompareConfig {
                root_path: "from_config".to_string(),
                strict: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_compare_args(&CompareOverrides::default());
        assert_eq!(merged.root_path, "from_config");
        assert!(merged.strict);
        assert!(merged.out_dir.is_none());
    }

    #[test]
    fn test_load_or_default_discovers_file() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(load_or_default(&dir).unwrap().compare.allow.is_empty());

        std::fs::write(dir.join(CONFIG_FILE_NAME), "[compare]\nallow = [\"x\"]\n").unwrap();
        assert_eq!(load_or_default(&dir).unwrap().compare.allow, vec!["x"]);
    }
}
