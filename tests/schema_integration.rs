//! Integration tests for schema parsing, validation and reflection.

use criters::schema::{
    Cardinality, FieldType, ResolveError, ScalarType, SchemaError, SchemaReflector, TypeModifier,
    parse_schema, parse_schema_file, validate_schema,
};
use pretty_assertions::assert_eq;

/// Test a model using every scalar type
#[test]
fn test_parse_model_with_all_field_types() {
    let schema = parse_schema(
        r#"
        model AllTypes {
            id        Int       @id
            bigInt    BigInt
            float     Float
            decimal   Decimal
            string    String
            boolean   Boolean
            dateTime  DateTime
            date      Date
            time      Time
            json      Json
            bytes     Bytes
            uuid      Uuid
            optional  String?
            list      String[]
        }
    "#,
    )
    .expect("Failed to parse schema");

    let model = schema.get_model("AllTypes").expect("Model not found");
    assert_eq!(model.fields.len(), 14);
    assert_eq!(
        model.get_field("bigInt").unwrap().field_type,
        FieldType::Scalar(ScalarType::BigInt)
    );
    assert_eq!(model.get_field("optional").unwrap().modifier, TypeModifier::Optional);
    assert_eq!(model.get_field("list").unwrap().modifier, TypeModifier::List);
}

/// `Integer` and `Long` spell the same types as `Int` and `BigInt`
#[test]
fn test_type_aliases() {
    let schema = parse_schema(
        r#"
        model Foo {
            value Integer
            total Long
        }
    "#,
    )
    .unwrap();

    let foo = schema.get_model("Foo").unwrap();
    assert_eq!(foo.get_field("value").unwrap().field_type.as_scalar(), Some(ScalarType::Int));
    assert_eq!(foo.get_field("total").unwrap().field_type.as_scalar(), Some(ScalarType::BigInt));
}

#[test]
fn test_relations_and_maps() {
    let schema = validate_schema(
        r#"
        model Foo {
            id   BigInt @id
            bars Bar[]
            @@map("foos")
        }

        model Bar {
            id    BigInt @id
            label String @map("bar_label")
            foo   Foo?
        }
    "#,
    )
    .unwrap();

    let foo = schema.get_model("Foo").unwrap();
    assert_eq!(foo.table_name(), "foos");
    assert_eq!(foo.relation_fields().len(), 1);

    let bar = schema.get_model("Bar").unwrap();
    assert_eq!(bar.table_name(), "Bar");
    assert_eq!(bar.get_field("label").unwrap().column_name(), "bar_label");

    let stats = schema.stats();
    assert_eq!(stats.model_count, 2);
    assert_eq!(stats.relation_count, 2);
}

#[test]
fn test_reflector_over_parsed_schema() {
    let schema = validate_schema(
        r#"
        model Foo {
            id    BigInt @id
            value Int?
            bars  Bar[]
        }

        model Bar {
            id BigInt @id
        }
    "#,
    )
    .unwrap();

    assert!(schema.is_searchable("Foo"));
    assert!(!schema.is_searchable("Qux"));

    let value = schema.resolve("Foo", "value").unwrap();
    assert_eq!(value.scalar(), Some(ScalarType::Int));
    assert_eq!(value.cardinality, Cardinality::Single);
    assert!(value.optional);

    let bars = schema.resolve("Foo", "bars").unwrap();
    assert!(bars.is_relation());
    assert_eq!(bars.cardinality, Cardinality::Collection);
    assert_eq!(bars.target.as_deref(), Some("Bar"));

    assert_eq!(
        schema.resolve("Foo", "invalidValue").unwrap_err(),
        ResolveError::UnknownField {
            model: "Foo".into(),
            field: "invalidValue".into(),
        }
    );
}

#[test]
fn test_unknown_relation_target_fails_validation() {
    let err = validate_schema(
        r#"
        model Foo {
            id   BigInt @id
            bars Bar[]
        }
    "#,
    )
    .unwrap_err();

    match err {
        SchemaError::ValidationFailed { count, errors } => {
            assert_eq!(count, 1);
            assert!(matches!(errors[0], SchemaError::UnknownType { .. }));
        }
        other => panic!("Expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn test_syntax_error() {
    let err = parse_schema("model Foo { value Int").unwrap_err();
    assert!(matches!(err, SchemaError::SyntaxError { .. }));
}

#[test]
fn test_duplicate_model() {
    let err = parse_schema("model Foo { id Int }\nmodel Foo { id Int }").unwrap_err();
    assert!(matches!(err, SchemaError::Duplicate { .. }));
}

#[test]
fn test_parse_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.criters");
    std::fs::write(&path, "model Foo {\n  id BigInt @id\n}\n").unwrap();

    let schema = parse_schema_file(&path).unwrap();
    assert!(schema.model_exists("Foo"));
}
