//! Relation traversal: turns a relation rule's hops into joins.

use std::fmt;

use criters_schema::{Cardinality, SchemaReflector};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{CompileError, CompileResult};
use crate::rule::RelationRule;
use crate::validate::validate_hop;

/// Separator used when a join path is turned into an alias.
pub const ALIAS_SEPARATOR: &str = "__";

/// A join from the query root, named by the relations it walks.
///
/// Joins belong to the relation rule that produced them. Two rules walking
/// the same relation get two joins, so each can match a different row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPath {
    /// One-based declaration index of the owning relation rule.
    pub rule: usize,
    /// Relation names from the root, in order.
    pub relations: Vec<SmolStr>,
    /// Model the last relation points at.
    pub target: SmolStr,
    /// Cardinality of the last relation.
    pub cardinality: Cardinality,
}

impl JoinPath {
    /// Alias for the joined table: `r{rule}` followed by the relation names,
    /// joined by `__` (`r1__bars__baz`).
    pub fn alias(&self) -> SmolStr {
        let mut alias = format!("r{}", self.rule);
        for relation in &self.relations {
            alias.push_str(ALIAS_SEPARATOR);
            alias.push_str(relation);
        }
        SmolStr::from(alias)
    }

    /// Number of relations walked.
    pub fn depth(&self) -> usize {
        self.relations.len()
    }
}

impl fmt::Display for JoinPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relations.join("."))
    }
}

/// A relation rule after every hop has been checked against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelation {
    /// One join per hop, each extending the previous.
    pub joins: Vec<JoinPath>,
}

impl ResolvedRelation {
    /// Model reached by the last hop.
    pub fn terminal(&self) -> Option<&str> {
        self.joins.last().map(|j| j.target.as_str())
    }
}

/// Walk `rule`'s hops from `root`, resolving each against the model the
/// previous hop reached. `ordinal` is the rule's one-based position among
/// the filter's relation rules and scopes the resulting aliases.
///
/// Stops at the first hop that does not match the schema.
pub fn resolve_relation<F, R>(
    rule: &RelationRule<F>,
    ordinal: usize,
    root: &str,
    reflector: &R,
) -> CompileResult<ResolvedRelation>
where
    R: SchemaReflector + ?Sized,
{
    let mut current = SmolStr::from(root);
    let mut relations: Vec<SmolStr> = Vec::with_capacity(rule.hops().len());
    let mut joins = Vec::with_capacity(rule.hops().len());

    for hop in rule.hops() {
        let field = validate_hop(hop, &current, reflector)?;
        let target = field.target.ok_or_else(|| {
            CompileError::structural(current.as_str(), hop.name(), "relation has no target model")
        })?;

        relations.push(field.field);
        tracing::trace!(from = %current, relation = hop.name(), to = %target, "resolved hop");

        joins.push(JoinPath {
            rule: ordinal,
            relations: relations.clone(),
            target: target.clone(),
            cardinality: field.cardinality,
        });
        current = target;
    }

    Ok(ResolvedRelation { joins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rule::{ParameterRule, RelationHop, Restriction};
    use criters_schema::{Schema, validate_schema};
    use pretty_assertions::assert_eq;

    struct FooFilter;

    fn schema() -> Schema {
        validate_schema(
            r#"
            model Foo {
                id   BigInt @id
                bars Bar[]
            }

            model Bar {
                id  BigInt @id
                baz Baz
            }

            model Baz {
                id    BigInt @id
                value Int
            }
        "#,
        )
        .unwrap()
    }

    fn value_rule() -> ParameterRule<FooFilter> {
        ParameterRule::new("value", Restriction::Equals, |_: &FooFilter| 1337i32)
    }

    #[test]
    fn test_two_hop_chain() {
        let rule = RelationRule::new()
            .hop(RelationHop::collection("bars"))
            .hop(RelationHop::single("baz").parameter(value_rule()));

        let resolved = resolve_relation(&rule, 1, "Foo", &schema()).unwrap();
        assert_eq!(
            resolved.joins,
            vec![
                JoinPath {
                    rule: 1,
                    relations: vec!["bars".into()],
                    target: "Bar".into(),
                    cardinality: Cardinality::Collection,
                },
                JoinPath {
                    rule: 1,
                    relations: vec!["bars".into(), "baz".into()],
                    target: "Baz".into(),
                    cardinality: Cardinality::Single,
                },
            ]
        );
        assert_eq!(resolved.terminal(), Some("Baz"));
        assert_eq!(resolved.joins[1].alias(), "r1__bars__baz");
        assert_eq!(resolved.joins[1].to_string(), "bars.baz");
    }

    #[test]
    fn test_ordinal_scopes_alias() {
        let rule = RelationRule::new().hop(RelationHop::collection("bars").parameter(
            ParameterRule::new("id", Restriction::Equals, |_: &FooFilter| 7i64),
        ));

        let first = resolve_relation(&rule, 1, "Foo", &schema()).unwrap();
        let second = resolve_relation(&rule, 2, "Foo", &schema()).unwrap();
        assert_eq!(first.joins[0].alias(), "r1__bars");
        assert_eq!(second.joins[0].alias(), "r2__bars");
        assert_ne!(first.joins[0], second.joins[0]);
    }

    #[test]
    fn test_middle_hop_cardinality_mismatch() {
        let rule = RelationRule::new()
            .hop(RelationHop::collection("bars"))
            .hop(RelationHop::collection("baz").parameter(value_rule()));

        let err = resolve_relation(&rule, 1, "Foo", &schema()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert!(err.to_string().contains("Bar.baz"));
    }

    #[test]
    fn test_unknown_hop_names_schema() {
        let rule = RelationRule::new().hop(RelationHop::collection("barz").parameter(value_rule()));

        let err = resolve_relation(&rule, 1, "Foo", &schema()).unwrap_err();
        assert!(err.to_string().contains("Foo.barz"));
    }
}
