//! Schema parser for `.criters` files.

mod grammar;

use std::path::Path;

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};

use crate::ast::*;
use crate::error::{SchemaError, SchemaResult};

pub use grammar::{Rule, SchemaParser};

/// Parse a schema from a string.
///
/// Duplicate models and duplicate fields within a model are rejected here,
/// since the AST keys both by name.
pub fn parse_schema(input: &str) -> SchemaResult<Schema> {
    let mut pairs = SchemaParser::parse(Rule::schema, input).map_err(|e| {
        let (offset, len) = match e.location {
            InputLocation::Pos(pos) => (pos, 0),
            InputLocation::Span((start, end)) => (start, end - start),
        };
        SchemaError::syntax(input, offset, len, e.variant.message().to_string())
    })?;

    let schema_pair = next_pair(&mut pairs, input, "schema")?;
    let mut schema = Schema::new();

    for pair in schema_pair.into_inner() {
        if pair.as_rule() == Rule::model_def {
            let model = parse_model(pair, input)?;
            let name = model.name.name.clone();
            if schema.add_model(model).is_some() {
                return Err(SchemaError::duplicate("model", name.as_str()));
            }
        }
    }

    tracing::debug!(models = schema.models.len(), "parsed schema");
    Ok(schema)
}

/// Parse a schema from a file.
pub fn parse_schema_file(path: impl AsRef<Path>) -> SchemaResult<Schema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_schema(&content)
}

/// Pull the next pair, reporting a grammar mismatch as a syntax error.
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, src: &str, what: &str) -> SchemaResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| SchemaError::syntax(src, src.len(), 0, format!("expected {what}")))
}

fn ident(pair: &Pair<'_, Rule>) -> Ident {
    Ident::new(pair.as_str(), pair.as_span().into())
}

fn parse_documentation(pair: Pair<'_, Rule>) -> Documentation {
    let span = pair.as_span().into();
    let text = pair
        .into_inner()
        .map(|p| p.as_str().trim_start_matches("///").trim())
        .collect::<Vec<_>>()
        .join("\n");
    Documentation::new(text, span)
}

/// Parse a model definition.
fn parse_model(pair: Pair<'_, Rule>, src: &str) -> SchemaResult<Model> {
    let span: Span = pair.as_span().into();
    let mut documentation = None;
    let mut name = None;
    let mut fields = vec![];
    let mut attributes = vec![];

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::documentation => documentation = Some(parse_documentation(item)),
            Rule::identifier => name = Some(ident(&item)),
            Rule::field_def => fields.push(parse_field(item, src)?),
            Rule::model_attribute => attributes.push(parse_attribute(item, src)?),
            _ => {}
        }
    }

    let name = name
        .ok_or_else(|| SchemaError::syntax(src, span.start, span.len(), "expected model name"))?;
    let mut model = Model::new(name, span);
    model.attributes = attributes;
    model.documentation = documentation;

    for field in fields {
        let field_name = field.name.name.clone();
        if model.add_field(field).is_some() {
            return Err(SchemaError::duplicate(
                "field",
                format!("{}.{}", model.name(), field_name),
            ));
        }
    }

    Ok(model)
}

/// Parse a field definition.
fn parse_field(pair: Pair<'_, Rule>, src: &str) -> SchemaResult<Field> {
    let span: Span = pair.as_span().into();
    let mut documentation = None;
    let mut name = None;
    let mut field_type = None;
    let mut attributes = vec![];

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::documentation => documentation = Some(parse_documentation(item)),
            Rule::identifier => name = Some(ident(&item)),
            Rule::field_type => field_type = Some(parse_field_type(item)),
            Rule::field_attribute => attributes.push(parse_attribute(item, src)?),
            _ => {}
        }
    }

    let missing = |what: &str| SchemaError::syntax(src, span.start, span.len(), format!("expected {what}"));
    let name = name.ok_or_else(|| missing("field name"))?;
    let (field_type, modifier) = field_type.ok_or_else(|| missing("field type"))?;

    let mut field = Field::new(name, field_type, modifier, attributes, span);
    field.documentation = documentation;
    Ok(field)
}

/// Parse a field type with optional modifier.
fn parse_field_type(pair: Pair<'_, Rule>) -> (FieldType, TypeModifier) {
    let mut type_name = "";
    let mut list = false;
    let mut optional = false;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::type_name => type_name = item.as_str(),
            Rule::list_marker => list = true,
            Rule::optional_marker => optional = true,
            _ => {}
        }
    }

    let modifier = match (list, optional) {
        (false, false) => TypeModifier::Required,
        (false, true) => TypeModifier::Optional,
        (true, false) => TypeModifier::List,
        (true, true) => TypeModifier::OptionalList,
    };

    // Unknown names are model references; the validator checks they exist.
    let field_type = match ScalarType::from_str(type_name) {
        Some(scalar) => FieldType::Scalar(scalar),
        None => FieldType::Model(type_name.into()),
    };

    (field_type, modifier)
}

/// Parse a field (`@`) or model (`@@`) attribute.
fn parse_attribute(pair: Pair<'_, Rule>, src: &str) -> SchemaResult<Attribute> {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();

    let name = ident(&next_pair(&mut inner, src, "attribute name")?);

    let mut args = vec![];
    for item in inner {
        if item.as_rule() == Rule::attribute_args {
            for value in item.into_inner() {
                args.push(parse_attribute_value(value, src)?);
            }
        }
    }

    Ok(Attribute::new(name, args, span))
}

/// Parse an attribute value.
fn parse_attribute_value(pair: Pair<'_, Rule>, src: &str) -> SchemaResult<AttributeValue> {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::string_literal => Ok(AttributeValue::String(
            text.trim_start_matches('"').trim_end_matches('"').to_string(),
        )),
        Rule::number_literal => text.parse().map(AttributeValue::Int).map_err(|_| {
            let span = pair.as_span();
            SchemaError::syntax(src, span.start(), text.len(), "integer out of range")
        }),
        Rule::boolean_literal => Ok(AttributeValue::Boolean(text == "true")),
        _ => Ok(AttributeValue::Ident(text.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FOO_BAR: &str = r#"
        /// A searchable entity.
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
            id    BigInt @id
            value Int
        }
    "#;

    #[test]
    fn test_parse_models_in_order() {
        let schema = parse_schema(FOO_BAR).unwrap();
        assert_eq!(schema.model_names().collect::<Vec<_>>(), vec!["Foo", "Bar", "Baz"]);
    }

    #[test]
    fn test_parse_field_modifiers() {
        let schema = parse_schema(FOO_BAR).unwrap();
        let foo = schema.get_model("Foo").unwrap();

        let value = foo.get_field("value").unwrap();
        assert!(value.is_optional());
        assert_eq!(value.field_type, FieldType::Scalar(ScalarType::Int));
        assert_eq!(value.column_name(), "foo_value");

        let bars = foo.get_field("bars").unwrap();
        assert!(bars.is_list());
        assert_eq!(bars.field_type, FieldType::Model("Bar".into()));
    }

    #[test]
    fn test_parse_model_attribute_and_docs() {
        let schema = parse_schema(FOO_BAR).unwrap();
        let foo = schema.get_model("Foo").unwrap();

        assert_eq!(foo.table_name(), "foos");
        assert_eq!(
            foo.documentation.as_ref().map(|d| d.text.as_str()),
            Some("A searchable entity.")
        );
    }

    #[test]
    fn test_parse_field_documentation() {
        let schema = parse_schema(
            r#"
            model Foo {
                /// Primary key.
                id BigInt @id
            }
        "#,
        )
        .unwrap();

        let id = schema.get_model("Foo").unwrap().get_field("id").unwrap();
        assert_eq!(id.documentation.as_ref().unwrap().text, "Primary key.");
        assert!(id.is_id());
    }

    #[test]
    fn test_parse_comments_are_skipped() {
        let schema = parse_schema(
            r#"
            // scratch model
            model Foo {
                id Int @id // trailing
            }
        "#,
        )
        .unwrap();
        assert_eq!(schema.models.len(), 1);
    }

    #[test]
    fn test_parse_attribute_values() {
        let schema = parse_schema(
            r#"
            model Foo {
                id Int @id @default(42) @flag(true) @kind(auto)
            }
        "#,
        )
        .unwrap();

        let id = schema.get_model("Foo").unwrap().get_field("id").unwrap();
        let args: Vec<_> = id.attributes.iter().flat_map(|a| a.args.clone()).collect();
        assert_eq!(
            args,
            vec![
                AttributeValue::Int(42),
                AttributeValue::Boolean(true),
                AttributeValue::Ident("auto".into()),
            ]
        );
    }

    #[test]
    fn test_parse_syntax_error_has_location() {
        let err = parse_schema("model Foo {\n  id Int @id\n").unwrap_err();
        match err {
            SchemaError::SyntaxError { span, .. } => assert!(span.offset() > 0),
            other => panic!("Expected SyntaxError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_duplicate_field() {
        let err = parse_schema("model Foo { id Int  id BigInt }").unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { ref kind, ref name } if kind == "field" && name == "Foo.id"));
    }

    #[test]
    fn test_parse_duplicate_model() {
        let err = parse_schema("model Foo { id Int }\nmodel Foo { id Int }").unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { ref kind, .. } if kind == "model"));
    }

    #[test]
    fn test_parse_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.criters");
        std::fs::write(&path, FOO_BAR).unwrap();

        let schema = parse_schema_file(&path).unwrap();
        assert_eq!(schema.models.len(), 3);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_schema_file("/nonexistent/schema.criters").unwrap_err();
        assert!(matches!(err, SchemaError::IoError { .. }));
    }
}
