//! Schema validation and semantic analysis.
//!
//! This module validates parsed schemas for semantic correctness:
//! - Relation fields reference declared models
//! - Every model declares at least one field
//! - `@map` / `@@map` carry exactly one string argument
//! - At most one `@id` per model, never on a relation field

use crate::ast::*;
use crate::error::{SchemaError, SchemaResult};

/// Schema validator for semantic analysis.
#[derive(Debug)]
pub struct Validator {
    /// Collected validation errors.
    errors: Vec<SchemaError>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Validate a schema and return the validated schema or all errors found.
    pub fn validate(&mut self, schema: Schema) -> SchemaResult<Schema> {
        self.errors.clear();

        for model in schema.models.values() {
            self.validate_model(model, &schema);
        }

        if self.errors.is_empty() {
            tracing::debug!(models = schema.models.len(), "schema validated");
            Ok(schema)
        } else {
            Err(SchemaError::validation_failed(std::mem::take(&mut self.errors)))
        }
    }

    /// Validate a model definition.
    fn validate_model(&mut self, model: &Model, schema: &Schema) {
        if model.fields.is_empty() {
            self.errors.push(SchemaError::invalid_model(
                model.name(),
                "model must declare at least one field",
            ));
        }

        let ids = model.id_fields();
        if ids.len() > 1 {
            let names: Vec<_> = ids.iter().map(|f| f.name()).collect();
            self.errors.push(SchemaError::invalid_model(
                model.name(),
                format!("multiple @id fields: {}", names.join(", ")),
            ));
        }

        for field in model.fields.values() {
            self.validate_field(field, model.name(), schema);
        }

        for attr in &model.attributes {
            if attr.is("map") {
                self.check_map_argument(attr, &format!("@@map on model '{}'", model.name()));
            }
        }
    }

    /// Validate a field definition.
    fn validate_field(&mut self, field: &Field, model_name: &str, schema: &Schema) {
        if let FieldType::Model(target) = &field.field_type {
            if !schema.model_exists(target) {
                self.errors.push(SchemaError::unknown_type(
                    model_name,
                    field.name(),
                    target.as_str(),
                ));
            }
        }

        for attr in &field.attributes {
            match attr.name() {
                "id" if field.is_relation() => {
                    self.errors.push(SchemaError::invalid_attribute(
                        "id",
                        format!(
                            "@id cannot be applied to relation field '{}.{}'",
                            model_name,
                            field.name()
                        ),
                    ));
                }
                "map" => self.check_map_argument(
                    attr,
                    &format!("@map on field '{}.{}'", model_name, field.name()),
                ),
                _ => {}
            }
        }
    }

    /// `@map` and `@@map` take exactly one string argument.
    fn check_map_argument(&mut self, attr: &Attribute, location: &str) {
        let valid = attr.args.len() == 1 && attr.first_arg().and_then(|v| v.as_string()).is_some();
        if !valid {
            self.errors.push(SchemaError::invalid_attribute(
                attr.name(),
                format!("{location} expects exactly one string argument"),
            ));
        }
    }
}

/// Parse and validate a schema in one step.
pub fn validate_schema(input: &str) -> SchemaResult<Schema> {
    let schema = crate::parser::parse_schema(input)?;
    let mut validator = Validator::new();
    validator.validate(schema)
}
