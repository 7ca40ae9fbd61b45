//! Field definitions for the schema AST.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Attribute, Documentation, FieldType, Ident, ScalarType, Span, TypeModifier};

/// A field in a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: Ident,
    /// Field type.
    pub field_type: FieldType,
    /// Type modifier (optional, list, etc.).
    pub modifier: TypeModifier,
    /// Raw attributes as parsed.
    pub attributes: Vec<Attribute>,
    /// Documentation comment.
    pub documentation: Option<Documentation>,
    /// Source location.
    pub span: Span,
}

impl Field {
    /// Create a new field.
    pub fn new(
        name: Ident,
        field_type: FieldType,
        modifier: TypeModifier,
        attributes: Vec<Attribute>,
        span: Span,
    ) -> Self {
        Self {
            name,
            field_type,
            modifier,
            attributes,
            documentation: None,
            span,
        }
    }

    /// Create a required scalar field without source location.
    pub fn scalar(name: impl Into<SmolStr>, scalar: ScalarType) -> Self {
        Self::new(
            Ident::new(name, Span::default()),
            FieldType::Scalar(scalar),
            TypeModifier::Required,
            vec![],
            Span::default(),
        )
    }

    /// Create a relation field pointing at `model` without source location.
    pub fn relation(
        name: impl Into<SmolStr>,
        model: impl Into<SmolStr>,
        modifier: TypeModifier,
    ) -> Self {
        Self::new(
            Ident::new(name, Span::default()),
            FieldType::Model(model.into()),
            modifier,
            vec![],
            Span::default(),
        )
    }

    /// Replace the type modifier.
    pub fn with_modifier(mut self, modifier: TypeModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Get the field name as a string.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Check if the field is optional.
    pub fn is_optional(&self) -> bool {
        self.modifier.is_optional()
    }

    /// Check if the field is a list.
    pub fn is_list(&self) -> bool {
        self.modifier.is_list()
    }

    /// Check if this field has a specific attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.is(name))
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is(name))
    }

    /// Check if this is a primary key field.
    pub fn is_id(&self) -> bool {
        self.has_attribute("id")
    }

    /// Check if this is a relation field.
    pub fn is_relation(&self) -> bool {
        self.field_type.is_relation()
    }

    /// Get the column name (from `@map` or the field name).
    pub fn column_name(&self) -> &str {
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

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;

        match self.modifier {
            TypeModifier::Required => write!(f, " {}", self.field_type)?,
            TypeModifier::Optional => write!(f, " {}?", self.field_type)?,
            TypeModifier::List => write!(f, " {}[]", self.field_type)?,
            TypeModifier::OptionalList => write!(f, " {}[]?", self.field_type)?,
        }

        for attr in &self.attributes {
            write!(f, " @{}", attr.name)?;
            if !attr.args.is_empty() {
                write!(f, "(...)")?;
            }
        }

        Ok(())
    }
}
