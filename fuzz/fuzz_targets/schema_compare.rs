#![no_main]

//! Fuzz target for schema parsing and comparison.
//!
//! Any schema that parses must compare equivalent to itself and to its normalized copy, and an
//! invalid shape must be reported as such rather than panicking.

use libfuzzer_sys::fuzz_target;
use schemaeq_load::{SchemaFormat, parse_schema};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    for format in [SchemaFormat::Json, SchemaFormat::Yaml] {
        let Ok(schema) = parse_schema(s, format) else {
            continue;
        };

        let reflexive = schemaeq_domain::equivalent(&schema, &schema, "");
        if let Err(e) = &reflexive {
            assert_eq!(e.code(), schemaeq_types::report::codes::INVALID_SCHEMA, "{e}");
        }

        let normalized = schemaeq_domain::normalized_all(&schema);
        let against_normalized = schemaeq_domain::equivalent(&schema, &normalized, "");
        assert_eq!(reflexive.is_ok(), against_normalized.is_ok());

        // Normalizing twice changes nothing.
        assert_eq!(schemaeq_domain::normalized_all(&normalized), normalized);
    }
});
