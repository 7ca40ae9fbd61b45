//! Abstract Syntax Tree (AST) types for schemas.
//!
//! This module contains all the types that represent a parsed or
//! programmatically assembled schema.

mod attribute;
mod field;
mod model;
mod schema;
mod types;

pub use attribute::*;
pub use field::*;
pub use model::*;
pub use schema::*;
pub use types::*;
