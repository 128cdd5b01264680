//! Domain logic: decide whether two schemas describe the same configuration shape.
//!
//! This crate owns *whether* two schemas are equivalent and *where* they diverge. It does not own
//! how schemas are obtained or how results are reported; that's `schemaeq-load` and
//! `schemaeq-core`.
//!
//! Both entry points mutate their inputs: [`equal`] normalizes the trees it is given. Use
//! [`equivalent`] or [`normalized_all`] when the originals must survive.

mod compare;
mod error;
mod normalize;

pub use compare::{equal, equivalent, join_path};
pub use error::SchemaMismatch;
pub use normalize::{normalize, normalize_all, normalized, normalized_all};
