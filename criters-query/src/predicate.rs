//! The predicate tree a filter compiles into.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::rule::{Combine, Restriction};
use crate::value::FilterValue;

/// A field a leaf predicate restricts, as seen from the query root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
    /// Model that owns the field.
    pub model: SmolStr,
    /// Field name as declared.
    pub field: SmolStr,
    /// Storage column name.
    pub column: SmolStr,
    /// Table or join alias the column is read from.
    pub qualifier: SmolStr,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.field)
    }
}

/// A boolean expression over schema fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// A single comparison.
    Leaf {
        /// The restricted field.
        field: FieldRef,
        /// The comparison.
        restriction: Restriction,
        /// The value compared against.
        value: FilterValue,
    },
    /// Children combined by one operator.
    Group {
        /// The combining operator.
        op: Combine,
        /// Child predicates in order.
        children: Vec<Predicate>,
    },
}

impl Predicate {
    /// Create a leaf predicate.
    pub fn leaf(field: FieldRef, restriction: Restriction, value: FilterValue) -> Self {
        Self::Leaf {
            field,
            restriction,
            value,
        }
    }

    /// Create a group; a single child is returned as is.
    pub fn group(op: Combine, children: Vec<Predicate>) -> Self {
        let mut children = children;
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Self::Group { op, children }
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Group { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Group { children, .. } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf {
                field,
                restriction,
                value,
            } => write!(f, "{field} {} {value}", restriction.operator()),
            Self::Group { op, children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {op} ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_value() -> FieldRef {
        FieldRef {
            model: "Foo".into(),
            field: "value".into(),
            column: "value".into(),
            qualifier: "Foo".into(),
        }
    }

    #[test]
    fn test_leaf_display() {
        let leaf = Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(1337));
        assert_eq!(leaf.to_string(), "Foo.value = 1337");
    }

    #[test]
    fn test_group_display() {
        let group = Predicate::group(
            Combine::And,
            vec![
                Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(1337)),
                Predicate::leaf(foo_value(), Restriction::NotEquals, FilterValue::Int(-1337)),
            ],
        );
        assert_eq!(group.to_string(), "(Foo.value = 1337 AND Foo.value != -1337)");
    }

    #[test]
    fn test_membership_display() {
        let leaf = Predicate::leaf(foo_value(), Restriction::NotIn, vec![1i64, 2].into());
        assert_eq!(leaf.to_string(), "Foo.value NOT IN [1, 2]");
    }

    #[test]
    fn test_single_child_group_collapses() {
        let leaf = Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(1));
        assert_eq!(Predicate::group(Combine::Or, vec![leaf.clone()]), leaf);
    }

    #[test]
    fn test_counts() {
        let tree = Predicate::group(
            Combine::And,
            vec![
                Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(1)),
                Predicate::group(
                    Combine::Or,
                    vec![
                        Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(2)),
                        Predicate::leaf(foo_value(), Restriction::Equals, FilterValue::Int(3)),
                    ],
                ),
            ],
        );
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_leaf());
    }
}
