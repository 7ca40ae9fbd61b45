//! # Criters
//!
//! Compile declarative search filters into schema-checked predicate trees.
//!
//! Criters provides:
//! - A small schema language describing models, fields and relations
//! - Rule declarations binding filter values to schema fields
//! - A compiler that validates every rule against the schema, resolves
//!   relation hops into joins and combines leaves into one predicate
//! - Parameterised SQL rendering for the compiled tree
//!
//! ## Quick Start
//!
//! ```rust
//! use criters::prelude::*;
//!
//! let schema = validate_schema(r#"
//!     model Foo {
//!         id    BigInt @id
//!         value Int
//!         bars  Bar[]
//!     }
//!
//!     model Bar {
//!         id BigInt @id
//!     }
//! "#).unwrap();
//!
//! struct FooFilter {
//!     value: i32,
//!     bar_ids: Vec<i64>,
//! }
//!
//! impl Filter for FooFilter {
//!     const ENTITY: &'static str = "Foo";
//!
//!     fn declare(rules: &mut RuleBuilder<Self>) {
//!         rules
//!             .parameter(ParameterRule::new("value", Restriction::Equals, |f: &Self| f.value))
//!             .relation(RelationRule::new().hop(RelationHop::collection("bars").parameter(
//!                 ParameterRule::new("id", Restriction::In, |f: &Self| f.bar_ids.clone()),
//!             )));
//!     }
//! }
//!
//! let filter = FooFilter { value: 1337, bar_ids: vec![1, 2] };
//! let criteria = Criters::new(&schema).criteria(&filter).unwrap();
//!
//! assert_eq!(criteria.root.table, "Foo");
//! assert_eq!(criteria.joins.len(), 1);
//! assert_eq!(criteria.predicate.to_string(), "(Foo.value = 1337 AND Bar.id IN [1, 2])");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema parsing, reflection and configuration.
pub mod schema {
    pub use criters_schema::*;
}

/// Rule declarations and the filter compiler.
pub mod query {
    pub use criters_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::prelude::*;
    pub use crate::schema::{CritersConfig, Schema, parse_schema, parse_schema_file, validate_schema};
}

pub use criters_query::{CompileError, CompileResult, Criters};
pub use criters_schema::{SchemaError, SchemaResult};
