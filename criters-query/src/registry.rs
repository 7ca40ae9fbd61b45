//! Filter declarations and the rule registry.
//!
//! A filter type lists its rules once, in [`Filter::declare`]:
//!
//! ```rust
//! use criters_query::{Filter, ParameterRule, Restriction, RuleBuilder, RuleRegistry};
//!
//! struct FooFilter {
//!     value: i32,
//! }
//!
//! impl Filter for FooFilter {
//!     const ENTITY: &'static str = "Foo";
//!
//!     fn declare(rules: &mut RuleBuilder<Self>) {
//!         rules.parameter(ParameterRule::new("value", Restriction::Equals, |f: &Self| f.value));
//!     }
//! }
//!
//! let registry = RuleRegistry::<FooFilter>::new().unwrap();
//! assert_eq!(registry.parameter_rules().len(), 1);
//! ```

use crate::error::{CompileError, CompileResult};
use crate::rule::{ParameterRule, RelationRule};

/// A search filter bound to one schema model.
pub trait Filter: Sized + Send + Sync + 'static {
    /// The model this filter restricts.
    const ENTITY: &'static str;

    /// Declare the filter's rules, in the order they should be applied.
    fn declare(rules: &mut RuleBuilder<Self>);
}

/// Collects rules in declaration order.
#[derive(Debug)]
pub struct RuleBuilder<F> {
    parameters: Vec<ParameterRule<F>>,
    relations: Vec<RelationRule<F>>,
}

impl<F> RuleBuilder<F> {
    fn new() -> Self {
        Self {
            parameters: vec![],
            relations: vec![],
        }
    }

    /// Add a parameter rule.
    pub fn parameter(&mut self, rule: ParameterRule<F>) -> &mut Self {
        self.parameters.push(rule);
        self
    }

    /// Add a relation rule.
    pub fn relation(&mut self, rule: RelationRule<F>) -> &mut Self {
        self.relations.push(rule);
        self
    }
}

/// The validated rule set of a filter type.
#[derive(Debug)]
pub struct RuleRegistry<F> {
    parameters: Vec<ParameterRule<F>>,
    relations: Vec<RelationRule<F>>,
}

impl<F: Filter> RuleRegistry<F> {
    /// Run `F::declare` and reject malformed declarations.
    pub fn new() -> CompileResult<Self> {
        let mut builder = RuleBuilder::new();
        F::declare(&mut builder);

        for rule in &builder.parameters {
            check_parameter::<F>(rule, None)?;
        }

        for (index, rule) in builder.relations.iter().enumerate() {
            if rule.hops().is_empty() {
                return Err(CompileError::malformed(
                    F::ENTITY,
                    format!("relation rule #{index} has no hops"),
                ));
            }
            if rule.parameter_count() == 0 {
                return Err(CompileError::malformed(
                    F::ENTITY,
                    format!("relation rule #{index} applies no parameter rule"),
                ));
            }
            for hop in rule.hops() {
                if hop.name().is_empty() {
                    return Err(CompileError::malformed(
                        F::ENTITY,
                        format!("relation rule #{index} has a hop without a name"),
                    ));
                }
                for parameter in hop.parameters() {
                    check_parameter::<F>(parameter, Some(hop.name()))?;
                }
            }
        }

        tracing::trace!(
            entity = F::ENTITY,
            parameters = builder.parameters.len(),
            relations = builder.relations.len(),
            "registered filter rules"
        );

        Ok(Self {
            parameters: builder.parameters,
            relations: builder.relations,
        })
    }
}

impl<F> RuleRegistry<F> {
    /// Parameter rules in declaration order.
    pub fn parameter_rules(&self) -> &[ParameterRule<F>] {
        &self.parameters
    }

    /// Relation rules in declaration order.
    pub fn relation_rules(&self) -> &[RelationRule<F>] {
        &self.relations
    }

    /// Whether no rule was declared.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.relations.is_empty()
    }
}

fn check_parameter<F: Filter>(rule: &ParameterRule<F>, hop: Option<&str>) -> CompileResult<()> {
    let location = match hop {
        Some(hop) => format!(" on hop `{hop}`"),
        None => String::new(),
    };
    if rule.field().is_empty() {
        return Err(CompileError::malformed(
            F::ENTITY,
            format!("parameter rule{location} has an empty field name"),
        ));
    }
    if rule.group_id().is_empty() {
        return Err(CompileError::malformed(
            F::ENTITY,
            format!("parameter rule `{}`{location} has an empty group id", rule.field()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rule::{Combine, RelationHop, Restriction};

    struct FooFilter {
        value: i32,
    }

    impl Filter for FooFilter {
        const ENTITY: &'static str = "Foo";

        fn declare(rules: &mut RuleBuilder<Self>) {
            rules
                .parameter(ParameterRule::new("value", Restriction::Equals, |f: &Self| f.value))
                .parameter(
                    ParameterRule::new("value", Restriction::NotEquals, |f: &Self| -f.value)
                        .group("g", Combine::And),
                )
                .relation(RelationRule::new().hop(RelationHop::collection("bars").parameter(
                    ParameterRule::new("id", Restriction::Equals, |_: &Self| 7i64),
                )));
        }
    }

    #[test]
    fn test_declaration_order() {
        let registry = RuleRegistry::<FooFilter>::new().unwrap();
        let restrictions: Vec<_> = registry
            .parameter_rules()
            .iter()
            .map(|r| r.restriction())
            .collect();

        assert_eq!(restrictions, [Restriction::Equals, Restriction::NotEquals]);
        assert_eq!(registry.relation_rules().len(), 1);
        assert!(!registry.is_empty());
    }

    struct EmptyFilter;

    impl Filter for EmptyFilter {
        const ENTITY: &'static str = "Foo";

        fn declare(_: &mut RuleBuilder<Self>) {}
    }

    #[test]
    fn test_empty_filter_registers() {
        let registry = RuleRegistry::<EmptyFilter>::new().unwrap();
        assert!(registry.is_empty());
    }

    #[derive(Debug)]
    struct NoHops;

    impl Filter for NoHops {
        const ENTITY: &'static str = "Foo";

        fn declare(rules: &mut RuleBuilder<Self>) {
            rules.relation(RelationRule::new());
        }
    }

    #[test]
    fn test_relation_without_hops() {
        let err = RuleRegistry::<NoHops>::new().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRule);
        assert!(err.to_string().contains("no hops"));
    }

    #[derive(Debug)]
    struct NoParameters;

    impl Filter for NoParameters {
        const ENTITY: &'static str = "Foo";

        fn declare(rules: &mut RuleBuilder<Self>) {
            rules.relation(
                RelationRule::new()
                    .hop(RelationHop::collection("bars"))
                    .hop(RelationHop::single("baz")),
            );
        }
    }

    #[test]
    fn test_relation_without_parameters() {
        let err = RuleRegistry::<NoParameters>::new().unwrap_err();
        assert!(err.to_string().contains("applies no parameter rule"));
    }

    #[derive(Debug)]
    struct EmptyField;

    impl Filter for EmptyField {
        const ENTITY: &'static str = "Foo";

        fn declare(rules: &mut RuleBuilder<Self>) {
            rules.parameter(ParameterRule::new("", Restriction::Equals, |_: &Self| 1));
        }
    }

    #[test]
    fn test_empty_field_name() {
        let err = RuleRegistry::<EmptyField>::new().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRule);
    }

    #[derive(Debug)]
    struct EmptyGroup;

    impl Filter for EmptyGroup {
        const ENTITY: &'static str = "Foo";

        fn declare(rules: &mut RuleBuilder<Self>) {
            rules.parameter(
                ParameterRule::new("value", Restriction::Equals, |_: &Self| 1).group("", Combine::Or),
            );
        }
    }

    #[test]
    fn test_empty_group_id() {
        let err = RuleRegistry::<EmptyGroup>::new().unwrap_err();
        assert!(err.to_string().contains("empty group id"));
    }
}
