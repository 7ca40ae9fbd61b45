//! Field metadata lookup for filter compilation.
//!
//! [`SchemaReflector`] is the capability the compiler needs from a schema
//! source: does a model exist, and what does one of its fields look like.
//! It is implemented for the parsed [`Schema`], but any metadata source can
//! provide it.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

use crate::ast::{FieldType, Schema, ScalarType};

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// A single value or a to-one relation.
    Single,
    /// A list of values or a to-many relation.
    Collection,
}

impl Cardinality {
    /// Whether this is [`Cardinality::Collection`].
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection)
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// A resolved reference to a field on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFieldRef {
    /// The model that owns the field.
    pub model: SmolStr,
    /// The field name as declared.
    pub field: SmolStr,
    /// The storage column name.
    pub column: SmolStr,
    /// The declared field type.
    pub field_type: FieldType,
    /// Single value or collection.
    pub cardinality: Cardinality,
    /// Whether the field is nullable.
    pub optional: bool,
    /// The related model, for relation fields. Collections are unwrapped to
    /// their element model.
    pub target: Option<SmolStr>,
}

impl SchemaFieldRef {
    /// The scalar type, if this is a scalar field.
    pub fn scalar(&self) -> Option<ScalarType> {
        self.field_type.as_scalar()
    }

    /// Whether this field is a relation to another model.
    pub fn is_relation(&self) -> bool {
        self.target.is_some()
    }
}

/// Why a field lookup failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The model is not declared.
    #[error("unknown model `{0}`")]
    UnknownModel(SmolStr),

    /// The model exists but has no such field.
    #[error("model `{model}` has no field `{field}`")]
    UnknownField { model: SmolStr, field: SmolStr },
}

/// Read-only access to model and field metadata.
pub trait SchemaReflector {
    /// Whether filters may target this model.
    fn is_searchable(&self, model: &str) -> bool;

    /// Resolve `model.field` to its metadata.
    fn resolve(&self, model: &str, field: &str) -> Result<SchemaFieldRef, ResolveError>;

    /// The storage table name of a model.
    fn table_name(&self, model: &str) -> Option<SmolStr>;
}

impl SchemaReflector for Schema {
    fn is_searchable(&self, model: &str) -> bool {
        self.model_exists(model)
    }

    fn resolve(&self, model: &str, field: &str) -> Result<SchemaFieldRef, ResolveError> {
        let owner = self
            .get_model(model)
            .ok_or_else(|| ResolveError::UnknownModel(model.into()))?;
        let found = owner
            .get_field(field)
            .ok_or_else(|| ResolveError::UnknownField {
                model: model.into(),
                field: field.into(),
            })?;

        let target = match &found.field_type {
            FieldType::Model(name) => Some(name.clone()),
            FieldType::Scalar(_) => None,
        };
        let cardinality = if found.is_list() {
            Cardinality::Collection
        } else {
            Cardinality::Single
        };

        Ok(SchemaFieldRef {
            model: owner.name.name.clone(),
            field: found.name.name.clone(),
            column: found.column_name().into(),
            field_type: found.field_type.clone(),
            cardinality,
            optional: found.is_optional(),
            target,
        })
    }

    fn table_name(&self, model: &str) -> Option<SmolStr> {
        self.get_model(model).map(|m| m.table_name().into())
    }
}

impl<T: SchemaReflector + ?Sized> SchemaReflector for std::sync::Arc<T> {
    fn is_searchable(&self, model: &str) -> bool {
        (**self).is_searchable(model)
    }

    fn resolve(&self, model: &str, field: &str) -> Result<SchemaFieldRef, ResolveError> {
        (**self).resolve(model, field)
    }

    fn table_name(&self, model: &str) -> Option<SmolStr> {
        (**self).table_name(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate_schema;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        validate_schema(
            r#"
            model Foo {
                id    BigInt @id
                value Int?   @map("foo_value")
                bars  Bar[]
                @@map("foos")
            }

            model Bar {
                id  BigInt @id
                baz Baz
            }

            model Baz {
                id BigInt @id
            }
        "#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_scalar() {
        let field = schema().resolve("Foo", "value").unwrap();
        assert_eq!(
            field,
            SchemaFieldRef {
                model: "Foo".into(),
                field: "value".into(),
                column: "foo_value".into(),
                field_type: FieldType::Scalar(ScalarType::Int),
                cardinality: Cardinality::Single,
                optional: true,
                target: None,
            }
        );
    }

    #[test]
    fn test_resolve_collection_relation_unwraps_target() {
        let field = schema().resolve("Foo", "bars").unwrap();
        assert_eq!(field.cardinality, Cardinality::Collection);
        assert_eq!(field.target.as_deref(), Some("Bar"));
        assert!(field.is_relation());
    }

    #[test]
    fn test_resolve_single_relation() {
        let field = schema().resolve("Bar", "baz").unwrap();
        assert_eq!(field.cardinality, Cardinality::Single);
        assert_eq!(field.target.as_deref(), Some("Baz"));
    }

    #[test]
    fn test_resolve_unknown() {
        let schema = schema();
        assert_eq!(
            schema.resolve("Qux", "id"),
            Err(ResolveError::UnknownModel("Qux".into()))
        );
        assert_eq!(
            schema.resolve("Foo", "invalidValue"),
            Err(ResolveError::UnknownField {
                model: "Foo".into(),
                field: "invalidValue".into(),
            })
        );
    }

    #[test]
    fn test_searchable_and_table_name() {
        let schema = std::sync::Arc::new(schema());
        assert!(schema.is_searchable("Foo"));
        assert!(!schema.is_searchable("Qux"));
        assert_eq!(schema.table_name("Foo").as_deref(), Some("foos"));
        assert_eq!(schema.table_name("Bar").as_deref(), Some("Bar"));
    }
}
