//! # criters-schema
//!
//! Schema side of the Criters filter compiler.
//!
//! This crate provides:
//! - A small schema definition language parser for `.criters` files
//! - Abstract Syntax Tree (AST) types for models and fields
//! - Schema validation
//! - [`SchemaReflector`], the field lookup the compiler runs against
//! - Configuration parser for `criters.toml` files
//!
//! ## Example
//!
//! ```rust,ignore
//! use criters_schema::{validate_schema, CritersConfig, SchemaReflector};
//!
//! let schema = validate_schema(r#"
//!     model Foo {
//!         id    BigInt @id
//!         value Int
//!     }
//! "#)?;
//!
//! let value = schema.resolve("Foo", "value")?;
//! let config = CritersConfig::from_file("criters.toml")?;
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod reflect;
pub mod validator;

pub use ast::*;
pub use config::{CritersConfig, ErrorMode, LogFormat};
pub use error::{SchemaError, SchemaResult};
pub use parser::{parse_schema, parse_schema_file};
pub use reflect::{Cardinality, ResolveError, SchemaFieldRef, SchemaReflector};
pub use validator::{Validator, validate_schema};
