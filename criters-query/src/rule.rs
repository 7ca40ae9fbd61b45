//! Rule declarations: what a filter restricts and how.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use criters_schema::Cardinality;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::CompileError;
use crate::value::{FilterType, FilterValue, ValueType};

/// Group id used by rules that do not name one.
pub const DEFAULT_GROUP: &str = "ungrouped";

/// The comparison a leaf predicate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Restriction {
    /// `field = value`.
    Equals,
    /// `field != value`.
    NotEquals,
    /// `field > value`.
    GreaterThan,
    /// `field >= value`.
    GreaterThanOrEquals,
    /// `field < value`.
    LessThan,
    /// `field <= value`.
    LessThanOrEquals,
    /// `field IN (values)`.
    In,
    /// `field NOT IN (values)`.
    NotIn,
}

impl Restriction {
    /// All restrictions, in declaration order.
    pub const ALL: [Restriction; 8] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::In,
        Self::NotIn,
    ];

    /// Canonical upper-snake name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
        }
    }

    /// SQL operator.
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEquals => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEquals => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Whether this compares by order (`>`, `>=`, `<`, `<=`).
    pub const fn is_ordering(&self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanOrEquals | Self::LessThan | Self::LessThanOrEquals
        )
    }

    /// Whether this tests membership (`IN`, `NOT IN`).
    pub const fn is_membership(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Restriction {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| {
                r.as_str().eq_ignore_ascii_case(trimmed)
                    || (!r.is_membership() && r.operator() == trimmed)
            })
            .ok_or_else(|| CompileError::UnsupportedRestriction {
                restriction: s.to_string(),
            })
    }
}

/// How leaves within one group combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combine {
    /// All members must hold.
    #[default]
    And,
    /// Any member may hold.
    Or,
}

impl fmt::Display for Combine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

type Accessor<F> = Arc<dyn Fn(&F) -> FilterValue + Send + Sync>;

/// A restriction of one field by one accessor of the filter `F`.
pub struct ParameterRule<F> {
    field: SmolStr,
    restriction: Restriction,
    group: SmolStr,
    combine: Combine,
    value_type: ValueType,
    accessor: Accessor<F>,
}

impl<F> ParameterRule<F> {
    /// Restrict `field` by the value `accessor` reads from the filter.
    ///
    /// The declared value type comes from the accessor's return type.
    pub fn new<V, A>(field: impl Into<SmolStr>, restriction: Restriction, accessor: A) -> Self
    where
        F: 'static,
        V: FilterType + 'static,
        A: Fn(&F) -> V + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            restriction,
            group: SmolStr::new_static(DEFAULT_GROUP),
            combine: Combine::And,
            value_type: V::VALUE_TYPE,
            accessor: Arc::new(move |filter: &F| accessor(filter).into_value()),
        }
    }

    /// Place this rule in a combination group.
    pub fn group(mut self, id: impl Into<SmolStr>, combine: Combine) -> Self {
        self.group = id.into();
        self.combine = combine;
        self
    }

    /// Target field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The restriction applied.
    pub fn restriction(&self) -> Restriction {
        self.restriction
    }

    /// Combination group id.
    pub fn group_id(&self) -> &str {
        &self.group
    }

    /// Operator within the group.
    pub fn combine(&self) -> Combine {
        self.combine
    }

    /// Declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Read the comparison value from a filter instance.
    pub fn value(&self, filter: &F) -> FilterValue {
        (self.accessor)(filter)
    }
}

impl<F> Clone for ParameterRule<F> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            restriction: self.restriction,
            group: self.group.clone(),
            combine: self.combine,
            value_type: self.value_type,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<F> fmt::Debug for ParameterRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterRule")
            .field("field", &self.field)
            .field("restriction", &self.restriction)
            .field("group", &self.group)
            .field("combine", &self.combine)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// One join step of a relation rule.
pub struct RelationHop<F> {
    name: SmolStr,
    cardinality: Cardinality,
    parameters: Vec<ParameterRule<F>>,
}

impl<F> RelationHop<F> {
    /// A hop across a to-one relation.
    pub fn single(name: impl Into<SmolStr>) -> Self {
        Self::new(name, Cardinality::Single)
    }

    /// A hop across a to-many relation.
    pub fn collection(name: impl Into<SmolStr>) -> Self {
        Self::new(name, Cardinality::Collection)
    }

    fn new(name: impl Into<SmolStr>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            parameters: vec![],
        }
    }

    /// Apply a parameter rule on this hop's target model.
    pub fn parameter(mut self, rule: ParameterRule<F>) -> Self {
        self.parameters.push(rule);
        self
    }

    /// Relation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared cardinality.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether the hop is declared iterable.
    pub fn is_collection(&self) -> bool {
        self.cardinality.is_collection()
    }

    /// Parameter rules applied at this hop.
    pub fn parameters(&self) -> &[ParameterRule<F>] {
        &self.parameters
    }
}

impl<F> Clone for RelationHop<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cardinality: self.cardinality,
            parameters: self.parameters.clone(),
        }
    }
}

impl<F> fmt::Debug for RelationHop<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationHop")
            .field("name", &self.name)
            .field("cardinality", &self.cardinality)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A restriction reached through one or more joins.
pub struct RelationRule<F> {
    hops: Vec<RelationHop<F>>,
}

impl<F> RelationRule<F> {
    /// Start an empty relation rule.
    pub fn new() -> Self {
        Self { hops: vec![] }
    }

    /// Append a hop.
    pub fn hop(mut self, hop: RelationHop<F>) -> Self {
        self.hops.push(hop);
        self
    }

    /// Hops in traversal order.
    pub fn hops(&self) -> &[RelationHop<F>] {
        &self.hops
    }

    /// Total parameter rules across all hops.
    pub fn parameter_count(&self) -> usize {
        self.hops.iter().map(|h| h.parameters.len()).sum()
    }
}

impl<F> Default for RelationRule<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for RelationRule<F> {
    fn clone(&self) -> Self {
        Self {
            hops: self.hops.clone(),
        }
    }
}

impl<F> fmt::Debug for RelationRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationRule").field("hops", &self.hops).finish()
    }
}
