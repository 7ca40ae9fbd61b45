//! Model definitions for the schema AST.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Attribute, Documentation, Field, Ident, Span};

/// A model definition (maps to a database table or document collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model name.
    pub name: Ident,
    /// Model fields in declaration order.
    pub fields: IndexMap<SmolStr, Field>,
    /// Model-level attributes (prefixed with `@@`).
    pub attributes: Vec<Attribute>,
    /// Documentation comment.
    pub documentation: Option<Documentation>,
    /// Source location.
    pub span: Span,
}

impl Model {
    /// Create a new model.
    pub fn new(name: Ident, span: Span) -> Self {
        Self {
            name,
            fields: IndexMap::new(),
            attributes: vec![],
            documentation: None,
            span,
        }
    }

    /// Create a model without source location.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self::new(Ident::new(name, Span::default()), Span::default())
    }

    /// Get the model name as a string.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Add a field to the model.
    ///
    /// Returns the previous field with the same name, if any.
    pub fn add_field(&mut self, field: Field) -> Option<Field> {
        self.fields.insert(field.name.name.clone(), field)
    }

    /// Add a field, builder style.
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// Add a model-level attribute, builder style.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Get the primary key field(s).
    pub fn id_fields(&self) -> Vec<&Field> {
        self.fields.values().filter(|f| f.is_id()).collect()
    }

    /// Get all relation fields.
    pub fn relation_fields(&self) -> Vec<&Field> {
        self.fields.values().filter(|f| f.is_relation()).collect()
    }

    /// Get all scalar (non-relation) fields.
    pub fn scalar_fields(&self) -> Vec<&Field> {
        self.fields.values().filter(|f| !f.is_relation()).collect()
    }

    /// Check if this model has a specific model-level attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.is(name))
    }

    /// Get a model-level attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is(name))
    }

    /// Get the table name (from `@@map` or model name).
    pub fn table_name(&self) -> &str {
        self.get_attribute("map")
            .and_then(|a| a.first_arg())
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| self.name())
    }

    /// Set documentation.
    pub fn with_documentation(mut self, doc: Documentation) -> Self {
        self.documentation = Some(doc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttributeValue, ScalarType, TypeModifier};

    fn foo() -> Model {
        Model::named("Foo")
            .with_field(
                Field::scalar("id", ScalarType::BigInt).with_attribute(Attribute::simple(
                    Ident::new("id", Span::default()),
                    Span::default(),
                )),
            )
            .with_field(Field::scalar("value", ScalarType::Int))
            .with_field(Field::relation("bars", "Bar", TypeModifier::List))
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let model = foo();
        let names: Vec<_> = model.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["id", "value", "bars"]);
    }

    #[test]
    fn test_field_partitions() {
        let model = foo();
        assert_eq!(model.id_fields().len(), 1);
        assert_eq!(model.relation_fields().len(), 1);
        assert_eq!(model.scalar_fields().len(), 2);
    }

    #[test]
    fn test_add_field_reports_replacement() {
        let mut model = foo();
        let previous = model.add_field(Field::scalar("value", ScalarType::BigInt));
        assert!(previous.is_some());
    }

    #[test]
    fn test_table_name() {
        assert_eq!(foo().table_name(), "Foo");

        let mapped = foo().with_attribute(Attribute::new(
            Ident::new("map", Span::default()),
            vec![AttributeValue::String("foos".into())],
            Span::default(),
        ));
        assert_eq!(mapped.table_name(), "foos");
    }
}
