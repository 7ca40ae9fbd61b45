//! Parameterised SQL rendering of predicates.
//!
//! Backends that speak SQL can turn a compiled [`Predicate`] into a WHERE
//! fragment with `$n` placeholders:
//!
//! ```rust,ignore
//! let (sql, params) = predicate.to_sql(0);
//! // sql    = r#"("foos"."value" = $1 AND "foos"."value" != $2)"#
//! // params = [Int(1337), Int(-1337)]
//! ```

use crate::predicate::{FieldRef, Predicate};
use crate::rule::Restriction;
use crate::value::FilterValue;

/// Quote an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column(field: &FieldRef) -> String {
    format!(
        "{}.{}",
        quote_identifier(&field.qualifier),
        quote_identifier(&field.column)
    )
}

impl Predicate {
    /// Generate SQL for this predicate with parameter placeholders.
    ///
    /// Placeholders are numbered from `param_offset + 1`. Returns the SQL
    /// and the values to bind, in placeholder order.
    pub fn to_sql(&self, param_offset: usize) -> (String, Vec<FilterValue>) {
        let mut params = Vec::new();
        let sql = self.write_sql(param_offset, &mut params);
        (sql, params)
    }

    fn write_sql(&self, offset: usize, params: &mut Vec<FilterValue>) -> String {
        let bind = |value: &FilterValue, params: &mut Vec<FilterValue>| {
            params.push(value.clone());
            format!("${}", offset + params.len())
        };

        match self {
            Self::Leaf {
                field,
                restriction,
                value,
            } => {
                let col = column(field);
                match restriction {
                    Restriction::Equals if value.is_null() => format!("{col} IS NULL"),
                    Restriction::NotEquals if value.is_null() => format!("{col} IS NOT NULL"),
                    Restriction::In | Restriction::NotIn => {
                        let values = value.as_list().unwrap_or(std::slice::from_ref(value));
                        if values.is_empty() {
                            return match restriction {
                                Restriction::In => "FALSE".to_string(),
                                _ => "TRUE".to_string(),
                            };
                        }
                        let placeholders: Vec<_> =
                            values.iter().map(|v| bind(v, params)).collect();
                        format!(
                            "{col} {} ({})",
                            restriction.operator(),
                            placeholders.join(", ")
                        )
                    }
                    _ => {
                        let placeholder = bind(value, params);
                        format!("{col} {} {placeholder}", restriction.operator())
                    }
                }
            }
            Self::Group { op, children } => {
                let parts: Vec<_> = children
                    .iter()
                    .map(|child| child.write_sql(offset, params))
                    .collect();
                format!("({})", parts.join(&format!(" {op} ")))
            }
        }
    }
}
