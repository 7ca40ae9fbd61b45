//! Top-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::Model;

/// A complete schema: the models filters are compiled against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// All models in the schema.
    pub models: IndexMap<SmolStr, Model>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model to the schema.
    ///
    /// Returns the previous model with the same name, if any.
    pub fn add_model(&mut self, model: Model) -> Option<Model> {
        self.models.insert(model.name.name.clone(), model)
    }

    /// Add a model, builder style.
    pub fn with_model(mut self, model: Model) -> Self {
        self.add_model(model);
        self
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Check if a model with this name exists.
    pub fn model_exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Get all model names.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(|s| s.as_str())
    }

    /// Merge another schema into this one.
    pub fn merge(&mut self, other: Schema) {
        self.models.extend(other.models);
    }
}

/// Schema statistics for debugging/info.
#[derive(Debug, Clone, Default)]
pub struct SchemaStats {
    /// Number of models.
    pub model_count: usize,
    /// Total number of fields across all models.
    pub field_count: usize,
    /// Number of relation fields across all models.
    pub relation_count: usize,
}

impl Schema {
    /// Get statistics about the schema.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            model_count: self.models.len(),
            field_count: self.models.values().map(|m| m.fields.len()).sum(),
            relation_count: self
                .models
                .values()
                .map(|m| m.relation_fields().len())
                .sum(),
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "Schema({} models, {} fields, {} relations)",
            stats.model_count, stats.field_count, stats.relation_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Field, ScalarType, TypeModifier};

    #[test]
    fn test_schema_lookup_and_stats() {
        let schema = Schema::new()
            .with_model(
                Model::named("Foo")
                    .with_field(Field::scalar("value", ScalarType::Int))
                    .with_field(Field::relation("bars", "Bar", TypeModifier::List)),
            )
            .with_model(Model::named("Bar").with_field(Field::scalar("id", ScalarType::BigInt)));

        assert!(schema.model_exists("Foo"));
        assert!(schema.get_model("Baz").is_none());
        assert_eq!(schema.model_names().collect::<Vec<_>>(), ["Foo", "Bar"]);
        assert_eq!(
            schema.to_string(),
            "Schema(2 models, 3 fields, 1 relations)"
        );
    }

    #[test]
    fn test_merge() {
        let mut a = Schema::new().with_model(Model::named("Foo"));
        let b = Schema::new().with_model(Model::named("Bar"));
        a.merge(b);
        assert_eq!(a.models.len(), 2);
    }
}
