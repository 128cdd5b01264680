//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use schemaeq_load::LoadedSchema;
use schemaeq_types::Side;

/// Source of resource schemas for either side of a comparison.
pub trait SchemaSource {
    fn load(&self, side: Side) -> anyhow::Result<Vec<LoadedSchema>>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
