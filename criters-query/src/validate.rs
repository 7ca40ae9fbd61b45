//! Checks rules against the schema before any accessor runs.

use criters_schema::{Cardinality, ResolveError, SchemaFieldRef, SchemaReflector};

use crate::error::{CompileError, CompileResult};
use crate::rule::{ParameterRule, RelationHop};
use crate::value::ValueType;

/// Check a parameter rule against `model` and return the field it targets.
///
/// The declared value type must equal the field's type exactly: `Int` never
/// matches `BigInt`. Membership restrictions need a collection value on a
/// single-valued field; ordering restrictions need a single-valued field of an
/// orderable type.
pub fn validate_parameter<F, R>(
    rule: &ParameterRule<F>,
    model: &str,
    reflector: &R,
) -> CompileResult<SchemaFieldRef>
where
    R: SchemaReflector + ?Sized,
{
    let field = reflector
        .resolve(model, rule.field())
        .map_err(|e| structural(model, rule.field(), e))?;

    let Some(scalar) = field.scalar() else {
        return Err(CompileError::structural(
            model,
            rule.field(),
            "is a relation; reach its fields through a relation rule",
        ));
    };

    let declared = rule.value_type();
    let restriction = rule.restriction();
    let field_collection = field.cardinality.is_collection();

    if field_collection && (restriction.is_membership() || restriction.is_ordering()) {
        return Err(CompileError::type_mismatch(
            model,
            rule.field(),
            format!("single-valued field for {restriction}"),
            ValueType::collection(scalar),
        ));
    }

    let expected = if restriction.is_membership() {
        ValueType::collection(scalar)
    } else {
        ValueType {
            scalar,
            collection: field_collection,
        }
    };

    if declared != expected {
        return Err(CompileError::type_mismatch(
            model,
            rule.field(),
            expected,
            declared,
        ));
    }

    if restriction.is_ordering() && !scalar.is_orderable() {
        return Err(CompileError::type_mismatch(
            model,
            rule.field(),
            format!("orderable type for {restriction}"),
            scalar,
        ));
    }

    tracing::trace!(model, field = rule.field(), %restriction, "validated field on model");
    Ok(field)
}

/// Check one relation hop against `model` and return the relation field.
///
/// The hop's declared cardinality must match the schema's.
pub fn validate_hop<F, R>(
    hop: &RelationHop<F>,
    model: &str,
    reflector: &R,
) -> CompileResult<SchemaFieldRef>
where
    R: SchemaReflector + ?Sized,
{
    let field = reflector
        .resolve(model, hop.name())
        .map_err(|e| structural(model, hop.name(), e))?;

    if !field.is_relation() {
        return Err(CompileError::structural(
            model,
            hop.name(),
            format!("is a {} field, not a relation", field.field_type),
        ));
    }

    if field.cardinality != hop.cardinality() {
        let declared = match hop.cardinality() {
            Cardinality::Collection => "iterable",
            Cardinality::Single => "non-iterable",
        };
        return Err(CompileError::structural(
            model,
            hop.name(),
            format!(
                "hop declared {declared} but the schema reports a {} relation",
                field.cardinality
            ),
        ));
    }

    Ok(field)
}

fn structural(model: &str, field: &str, err: ResolveError) -> CompileError {
    CompileError::structural(model, field, err.to_string())
}
