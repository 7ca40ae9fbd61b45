//! Attribute definitions for the schema AST.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Ident, Span};

/// An attribute argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A string literal.
    String(String),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Boolean(bool),
    /// An identifier/constant reference.
    Ident(SmolStr),
}

impl AttributeValue {
    /// Try to get the value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as an identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }
}

/// An attribute applied to a field (`@name`) or a model (`@@name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (without `@` prefix).
    pub name: Ident,
    /// Positional arguments.
    pub args: Vec<AttributeValue>,
    /// Source location (including `@`).
    pub span: Span,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: Ident, args: Vec<AttributeValue>, span: Span) -> Self {
        Self { name, args, span }
    }

    /// Create an attribute with no arguments.
    pub fn simple(name: Ident, span: Span) -> Self {
        Self {
            name,
            args: vec![],
            span,
        }
    }

    /// Get the attribute name as a string.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Check if this attribute has the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    /// Get the first argument.
    pub fn first_arg(&self) -> Option<&AttributeValue> {
        self.args.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_first_arg() {
        let attr = Attribute::new(
            Ident::new("map", Span::default()),
            vec![AttributeValue::String("foo_value".into())],
            Span::default(),
        );

        assert!(attr.is("map"));
        assert_eq!(attr.first_arg().and_then(|v| v.as_string()), Some("foo_value"));
    }

    #[test]
    fn test_simple_attribute_has_no_args() {
        let attr = Attribute::simple(Ident::new("id", Span::default()), Span::default());
        assert!(attr.first_arg().is_none());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(AttributeValue::Int(3).as_int(), Some(3));
        assert_eq!(AttributeValue::Ident("now".into()).as_ident(), Some("now"));
        assert_eq!(AttributeValue::Boolean(true).as_string(), None);
    }
}
