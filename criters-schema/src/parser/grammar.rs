//! Pest grammar parser for schema files.

use pest_derive::Parser;

/// The schema file parser.
#[derive(Parser)]
#[grammar = "parser/schema.pest"]
pub struct SchemaParser;
