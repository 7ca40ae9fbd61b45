//! # criters-query
//!
//! Compiles declarative search filters into predicate trees.
//!
//! A filter type declares its rules once. Each rule names a schema field, a
//! [`Restriction`] and an accessor that reads the value from a filter
//! instance. The compiler checks every rule against the schema, walks
//! relation hops into joins and folds the leaves into one [`Predicate`].
//!
//! This crate provides:
//! - Rule declarations ([`ParameterRule`], [`RelationRule`], [`Filter`])
//! - The rule registry and its well-formedness checks
//! - Validation of rules against a [`SchemaReflector`]
//! - Relation resolution into [`JoinPath`]s
//! - Predicate building and group combination
//! - The [`Criters`] compiler and parameterised SQL rendering
//!
//! ## Example
//!
//! ```rust
//! use criters_query::{Criters, Filter, ParameterRule, Restriction, RuleBuilder};
//! use criters_schema::validate_schema;
//!
//! let schema = validate_schema(r#"
//!     model Foo {
//!         id    BigInt @id
//!         value Int
//!     }
//! "#).unwrap();
//!
//! struct FooFilter {
//!     value: i32,
//! }
//!
//! impl Filter for FooFilter {
//!     const ENTITY: &'static str = "Foo";
//!
//!     fn declare(rules: &mut RuleBuilder<Self>) {
//!         rules.parameter(ParameterRule::new("value", Restriction::Equals, |f: &Self| f.value));
//!     }
//! }
//!
//! let compiled = Criters::new(&schema).compile(&FooFilter { value: 1337 }).unwrap();
//! assert_eq!(compiled.predicate.to_string(), "Foo.value = 1337");
//!
//! let (sql, params) = compiled.predicate.to_sql(0);
//! assert_eq!(sql, r#""Foo"."value" = $1"#);
//! assert_eq!(params.len(), 1);
//! ```

pub mod build;
pub mod combine;
pub mod compiler;
pub mod error;
pub mod logging;
pub mod predicate;
pub mod registry;
pub mod resolve;
pub mod rule;
pub mod sql;
pub mod validate;
pub mod value;

pub use compiler::{CompileOptions, Compiled, Criteria, Criters, QueryRoot};
pub use criters_schema::ErrorMode;
pub use error::{CompileError, CompileResult, ErrorKind};
pub use predicate::{FieldRef, Predicate};
pub use registry::{Filter, RuleBuilder, RuleRegistry};
pub use resolve::{JoinPath, ResolvedRelation};
pub use rule::{Combine, DEFAULT_GROUP, ParameterRule, RelationHop, RelationRule, Restriction};
pub use value::{FilterType, FilterValue, ScalarFilterType, ValueType};

/// Prelude for filter declarations.
pub mod prelude {
    pub use crate::compiler::{CompileOptions, Compiled, Criteria, Criters, QueryRoot};
    pub use crate::error::{CompileError, CompileResult, ErrorKind};
    pub use crate::predicate::Predicate;
    pub use crate::registry::{Filter, RuleBuilder};
    pub use crate::rule::{Combine, ParameterRule, RelationHop, RelationRule, Restriction};
    pub use crate::value::FilterValue;
    pub use criters_schema::{ErrorMode, SchemaReflector};
}
