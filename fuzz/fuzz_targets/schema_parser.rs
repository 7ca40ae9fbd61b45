//! Fuzz target for the schema parser and validator.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_parser
//! ```

#![no_main]

use criters_schema::{SchemaReflector, validate_schema};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and validation only ever return errors.
        if let Ok(schema) = validate_schema(input) {
            for (name, model) in &schema.models {
                for field in model.fields.keys() {
                    let _ = schema.resolve(name, field);
                }
            }
        }
    }
});
