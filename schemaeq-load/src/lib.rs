//! Schema file ingestion.
//!
//! Loading is tolerant: a file that cannot be read or parsed is recorded with its error instead of
//! aborting the scan, so one broken resource does not hide the verdict for the others.

mod digest;
mod load;

pub use digest::sha256_hex;
pub use load::{
    LoadedSchema, SchemaFormat, SchemaLoadError, load_schema, load_schema_dir, parse_schema,
};
