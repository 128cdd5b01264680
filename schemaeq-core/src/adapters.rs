//! Default filesystem-backed port implementations.

use crate::ports::{SchemaSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use schemaeq_load::LoadedSchema;
use schemaeq_types::{ObjectSchema, Side};
use tracing::debug;

/// Loads schemas from the filesystem via `schemaeq_load`.
///
/// Each side may name a single schema file or a directory of them.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    pub authoritative: Utf8PathBuf,
    pub candidate: Utf8PathBuf,
}

impl FsSchemaSource {
    pub fn new(authoritative: Utf8PathBuf, candidate: Utf8PathBuf) -> Self {
        Self {
            authoritative,
            candidate,
        }
    }

    fn path(&self, side: Side) -> &Utf8Path {
        match side {
            Side::Authoritative => &self.authoritative,
            Side::Candidate => &self.candidate,
        }
    }
}

impl SchemaSource for FsSchemaSource {
    fn load(&self, side: Side) -> anyhow::Result<Vec<LoadedSchema>> {
        let path = self.path(side);
        if path.is_file() {
            debug!(side = %side, path = %path, "loading single schema file");
            return Ok(vec![schemaeq_load::load_schema(path)]);
        }
        schemaeq_load::load_schema_dir(path)
            .with_context(|| format!("load {} schemas from {}", side, path))
    }
}

/// In-memory schema source for embedding and testing.
///
/// Sorts each side by resource, then path, on construction to match `FsSchemaSource`'s
/// deterministic ordering.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaSource {
    authoritative: Vec<LoadedSchema>,
    candidate: Vec<LoadedSchema>,
}

impl InMemorySchemaSource {
    pub fn new(mut authoritative: Vec<LoadedSchema>, mut candidate: Vec<LoadedSchema>) -> Self {
        sort_loaded(&mut authoritative);
        sort_loaded(&mut candidate);
        Self {
            authoritative,
            candidate,
        }
    }

    /// Build a source from already-parsed schemas keyed by resource name.
    pub fn from_schemas<A, C>(authoritative: A, candidate: C) -> Self
    where
        A: IntoIterator<Item = (String, ObjectSchema)>,
        C: IntoIterator<Item = (String, ObjectSchema)>,
    {
        Self::new(
            in_memory(Side::Authoritative, authoritative),
            in_memory(Side::Candidate, candidate),
        )
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn load(&self, side: Side) -> anyhow::Result<Vec<LoadedSchema>> {
        Ok(match side {
            Side::Authoritative => self.authoritative.clone(),
            Side::Candidate => self.candidate.clone(),
        })
    }
}

fn in_memory(
    side: Side,
    schemas: impl IntoIterator<Item = (String, ObjectSchema)>,
) -> Vec<LoadedSchema> {
    schemas
        .into_iter()
        .map(|(resource, schema)| LoadedSchema {
            path: Utf8PathBuf::from(format!("memory/{}/{}", side, resource)),
            resource,
            sha256: None,
            schema: Ok(schema),
        })
        .collect()
}

fn sort_loaded(loaded: &mut [LoadedSchema]) {
    loaded.sort_by(|a, b| a.resource.cmp(&b.resource).then_with(|| a.path.cmp(&b.path)));
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        std::fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
