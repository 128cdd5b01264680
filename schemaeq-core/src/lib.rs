//! Embeddable core library for schemaeq.
//!
//! Provides a clap-free, I/O-abstracted entry point for comparing a directory of authoritative
//! resource schemas against their rebuilt candidates.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`SchemaSource`](ports::SchemaSource): load schema files for one side
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides default filesystem-backed implementations.
//!
//! # Entry points
//!
//! - [`run_compare`](pipeline::run_compare): pair resources, compare them, build a report
//! - [`write_compare_artifacts`](pipeline::write_compare_artifacts): persist the report

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export loader types so embedders don't need schemaeq-load directly.
pub use schemaeq_load::{LoadedSchema, SchemaLoadError};
