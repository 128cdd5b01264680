//! Shared DTOs for the schemaeq workspace.
//!
//! # Design constraints
//! - `SchemaNode` is a structural projection: callers owning a richer framework schema type map it
//!   down to these fields before comparing.
//! - Callbacks are opaque names, never closures, so every type here is plain data.
//! - Report types are written to disk; prefer adding optional fields over changing semantics.

pub mod node;
pub mod object;
pub mod report;

pub use node::{CallbackRef, Callbacks, ConfigMode, Element, SchemaNode, ShapeError, ValueKind};
pub use object::ObjectSchema;
pub use report::Side;

/// Attribute path as shown to people; the empty root path reads `<root>`.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Schema identifiers.
pub mod schema {
    pub const SCHEMAEQ_REPORT_V1: &str = "schemaeq.report.v1";
}
