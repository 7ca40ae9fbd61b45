//! Leaf predicate construction.

use criters_schema::SchemaFieldRef;
use smol_str::SmolStr;

use crate::error::{CompileError, CompileResult};
use crate::predicate::{FieldRef, Predicate};
use crate::rule::Restriction;
use crate::value::FilterValue;

/// Build one leaf from a validated field and the value read from the filter.
///
/// `qualifier` is the root table or the join alias the field is read from.
/// The runtime value is checked against the operator: membership needs a
/// list, ordering needs a totally ordered value of the field's type.
pub fn build_leaf(
    field: &SchemaFieldRef,
    qualifier: SmolStr,
    restriction: Restriction,
    value: FilterValue,
) -> CompileResult<Predicate> {
    let mismatch = |expected: &str| {
        CompileError::type_mismatch(
            field.model.as_str(),
            field.field.as_str(),
            expected,
            value.kind_name(),
        )
    };

    let scalar = field.scalar().ok_or_else(|| {
        CompileError::structural(
            field.model.as_str(),
            field.field.as_str(),
            "relation fields cannot be compared directly",
        )
    })?;

    match restriction {
        Restriction::Equals | Restriction::NotEquals => {
            if !value.fits(scalar) {
                return Err(mismatch(scalar.as_str()));
            }
        }
        Restriction::GreaterThan
        | Restriction::GreaterThanOrEquals
        | Restriction::LessThan
        | Restriction::LessThanOrEquals => {
            if !value.is_totally_ordered() || !value.fits(scalar) {
                return Err(mismatch(&format!("ordered {scalar} value")));
            }
        }
        Restriction::In | Restriction::NotIn => match value.as_list() {
            Some(items)
                if items
                    .iter()
                    .all(|v| !v.is_null() && v.as_list().is_none() && v.fits(scalar)) => {}
            _ => return Err(mismatch(&format!("list of {scalar}"))),
        },
    }

    let field = FieldRef {
        model: field.model.clone(),
        field: field.field.clone(),
        column: field.column.clone(),
        qualifier,
    };
    Ok(Predicate::leaf(field, restriction, value))
}
