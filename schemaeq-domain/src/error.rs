use schemaeq_types::report::{Side, codes};
use schemaeq_types::{ObjectSchema, SchemaNode, ShapeError, display_path};
use thiserror::Error;

/// First divergence found while comparing two schemas.
///
/// `path` is always the dotted path of the *containing* object for cardinality mismatches and
/// the path of the offending attribute otherwise.
#[derive(Debug, Clone, Error)]
pub enum SchemaMismatch {
    #[error(
        "{}: attribute count differs ({} authoritative, {} candidate)",
        display_path(path),
        .left.len(),
        .right.len()
    )]
    CardinalityMismatch {
        path: String,
        left: ObjectSchema,
        right: ObjectSchema,
    },

    #[error("{}: key {key:?} is missing from the candidate schema", display_path(path))]
    MissingKey { path: String, key: String },

    #[error("{}: attribute differs: {left:?} != {right:?}", display_path(path))]
    ValueMismatch {
        path: String,
        left: Box<SchemaNode>,
        right: Box<SchemaNode>,
    },

    #[error("{}: invalid {side} schema: {source}", display_path(path))]
    InvalidSchema {
        path: String,
        side: Side,
        #[source]
        source: ShapeError,
    },
}

impl SchemaMismatch {
    pub fn path(&self) -> &str {
        match self {
            SchemaMismatch::CardinalityMismatch { path, .. }
            | SchemaMismatch::MissingKey { path, .. }
            | SchemaMismatch::ValueMismatch { path, .. }
            | SchemaMismatch::InvalidSchema { path, .. } => path,
        }
    }

    /// Stable finding code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaMismatch::CardinalityMismatch { .. } => codes::CARDINALITY_MISMATCH,
            SchemaMismatch::MissingKey { .. } => codes::MISSING_KEY,
            SchemaMismatch::ValueMismatch { .. } => codes::VALUE_MISMATCH,
            SchemaMismatch::InvalidSchema { .. } => codes::INVALID_SCHEMA,
        }
    }
}
