use crate::digest::sha256_hex;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::{Pattern, glob};
use schemaeq_types::ObjectSchema;
use thiserror::Error;
use tracing::debug;

/// Serialization format of a schema file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["json", "yaml", "yml"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(SchemaFormat::Json),
            "yaml" | "yml" => Some(SchemaFormat::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: Utf8PathBuf,
    /// File stem; pairs authoritative and candidate files.
    pub resource: String,
    /// Digest of the raw bytes, when the file could be read.
    pub sha256: Option<String>,
    pub schema: Result<ObjectSchema, SchemaLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum SchemaLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("yaml parse error: {message}")]
    Yaml { message: String },

    #[error("unsupported schema file extension: {path}")]
    UnsupportedFormat { path: String },

    #[error("resource {resource} is already defined by {first}")]
    DuplicateResource { resource: String, first: String },
}

pub fn parse_schema(contents: &str, format: SchemaFormat) -> Result<ObjectSchema, SchemaLoadError> {
    match format {
        SchemaFormat::Json => serde_json::from_str(contents).map_err(|e| SchemaLoadError::Json {
            message: e.to_string(),
        }),
        SchemaFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| SchemaLoadError::Yaml {
            message: e.to_string(),
        }),
    }
}

/// Read and parse one schema file. Failures end up in [`LoadedSchema::schema`].
pub fn load_schema(path: &Utf8Path) -> LoadedSchema {
    let resource = path.file_stem().unwrap_or("unknown").to_string();

    let Some(format) = SchemaFormat::from_path(path) else {
        return LoadedSchema {
            path: path.to_path_buf(),
            resource,
            sha256: None,
            schema: Err(SchemaLoadError::UnsupportedFormat {
                path: path.to_string(),
            }),
        };
    };

    let (sha256, schema) = match fs::read(path) {
        Ok(bytes) => {
            let digest = sha256_hex(&bytes);
            let schema = match std::str::from_utf8(&bytes) {
                Ok(s) => parse_schema(s, format),
                Err(e) => Err(SchemaLoadError::Io {
                    message: e.to_string(),
                }),
            };
            (Some(digest), schema)
        }
        Err(e) => (
            None,
            Err(SchemaLoadError::Io {
                message: e.to_string(),
            }),
        ),
    };

    LoadedSchema {
        path: path.to_path_buf(),
        resource,
        sha256,
        schema,
    }
}

/// Load every `*.json`, `*.yaml` and `*.yml` file directly under `dir`.
///
/// A missing directory yields an empty list. Output is sorted by resource, then path; when two
/// files share a resource name, the later one is recorded as a duplicate.
pub fn load_schema_dir(dir: &Utf8Path) -> anyhow::Result<Vec<LoadedSchema>> {
    let escaped = Pattern::escape(dir.as_str());
    let mut out = Vec::new();

    for ext in SchemaFormat::EXTENSIONS {
        let pattern = format!("{}/*.{}", escaped, ext);
        debug!(pattern = %pattern, "scanning for schema files");

        for entry in glob(&pattern).with_context(|| format!("glob {}", pattern))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            let path = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| anyhow::anyhow!("non-utf8 path: {}", p.display()))?;
            out.push(load_schema(&path));
        }
    }

    // Deterministic order matters.
    out.sort_by(|a, b| a.resource.cmp(&b.resource).then_with(|| a.path.cmp(&b.path)));
    mark_duplicates(&mut out);
    Ok(out)
}

fn mark_duplicates(loaded: &mut [LoadedSchema]) {
    let mut first: Option<(String, Utf8PathBuf)> = None;
    for entry in loaded.iter_mut() {
        match &first {
            Some((resource, path)) if *resource == entry.resource => {
                debug!(path = %entry.path, resource = %resource, "duplicate resource");
                entry.schema = Err(SchemaLoadError::DuplicateResource {
                    resource: resource.clone(),
                    first: path.to_string(),
                });
            }
            _ => first = Some((entry.resource.clone(), entry.path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(SchemaFormat::from_extension("json"), Some(SchemaFormat::Json));
        assert_eq!(SchemaFormat::from_extension("yml"), Some(SchemaFormat::Yaml));
        assert_eq!(SchemaFormat::from_extension("toml"), None);
    }

    #[test]
    fn parse_errors_name_the_format() {
        let err = parse_schema("{", SchemaFormat::Json).expect_err("truncated json");
        assert!(err.to_string().starts_with("json parse error"));

        let err = parse_schema("a: [", SchemaFormat::Yaml).expect_err("truncated yaml");
        assert!(err.to_string().starts_with("yaml parse error"));
    }

    #[test]
    fn unsupported_extension_is_recorded() {
        let loaded = load_schema(Utf8Path::new("schemas/aws_instance.toml"));
        assert_eq!(loaded.resource, "aws_instance");
        assert!(matches!(
            loaded.schema,
            Err(SchemaLoadError::UnsupportedFormat { .. })
        ));
    }
}
