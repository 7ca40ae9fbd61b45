//! Error types for filter compilation.
//!
//! Every failure names the rule, field, relation or model it concerns.
//! [`CompileError::kind`] maps a concrete error onto its [`ErrorKind`] for
//! programmatic handling:
//!
//! ```rust
//! use criters_query::{CompileError, ErrorKind};
//!
//! let err = CompileError::structural("Foo", "invalidValue", "no such field");
//! assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
//! assert!(err.to_string().contains("Foo.invalidValue"));
//! ```

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::rule::Combine;

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// The category of a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The filter's entity is not searchable against the schema.
    InvalidTarget,
    /// A field, relation or cardinality does not match the schema.
    StructuralMismatch,
    /// A declared or supplied value type does not fit the field or operator.
    TypeMismatch,
    /// A restriction name has no handler.
    UnsupportedRestriction,
    /// No rule produced a predicate.
    EmptyCompilation,
    /// Rules sharing a group declare different operators.
    ConfigurationConflict,
    /// A rule declaration is malformed.
    MalformedRule,
    /// Several errors collected in aggregate mode.
    Aggregate,
}

impl ErrorKind {
    /// Get a short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidTarget => "Invalid filter target",
            Self::StructuralMismatch => "Structural mismatch",
            Self::TypeMismatch => "Type mismatch",
            Self::UnsupportedRestriction => "Unsupported restriction",
            Self::EmptyCompilation => "No predicates generated",
            Self::ConfigurationConflict => "Conflicting group configuration",
            Self::MalformedRule => "Malformed rule",
            Self::Aggregate => "Multiple errors",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors that can occur while compiling a filter.
#[derive(Error, Debug, Diagnostic)]
pub enum CompileError {
    /// The filter's entity is not recognized by the schema.
    #[error("invalid target `{entity}`: {message}")]
    #[diagnostic(code(criters::compile::invalid_target))]
    InvalidTarget { entity: String, message: String },

    /// A declared field, relation or cardinality does not match the schema.
    #[error("structural mismatch at `{model}.{field}`: {message}")]
    #[diagnostic(code(criters::compile::structural_mismatch))]
    StructuralMismatch {
        model: String,
        field: String,
        message: String,
    },

    /// A value type does not fit the field or the restriction.
    #[error("type mismatch at `{model}.{field}`: expected {expected}, found {found}")]
    #[diagnostic(code(criters::compile::type_mismatch))]
    TypeMismatch {
        model: String,
        field: String,
        expected: String,
        found: String,
    },

    /// A restriction name that no handler exists for.
    #[error("unsupported restriction `{restriction}`")]
    #[diagnostic(
        code(criters::compile::unsupported_restriction),
        help("use one of EQUALS, NOT_EQUALS, GREATER_THAN, GREATER_THAN_OR_EQUALS, LESS_THAN, LESS_THAN_OR_EQUALS, IN, NOT_IN")
    )]
    UnsupportedRestriction { restriction: String },

    /// The filter declared no rules.
    #[error("no predicates generated for `{entity}`")]
    #[diagnostic(
        code(criters::compile::empty_compilation),
        help("declare at least one parameter or relation rule")
    )]
    EmptyCompilation { entity: String },

    /// Rules in one group declare different combination operators.
    #[error("group `{group}` combines with both {first} and {second}")]
    #[diagnostic(code(criters::compile::configuration_conflict))]
    ConfigurationConflict {
        group: String,
        first: Combine,
        second: Combine,
    },

    /// A rule declaration is malformed.
    #[error("malformed rule on `{entity}`: {message}")]
    #[diagnostic(code(criters::compile::malformed_rule))]
    MalformedRule { entity: String, message: String },

    /// Errors collected in aggregate mode, in declaration order.
    #[error("filter compilation failed with {count} error(s)")]
    #[diagnostic(code(criters::compile::aggregate))]
    Aggregate {
        count: usize,
        #[related]
        errors: Vec<CompileError>,
    },
}

impl CompileError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            Self::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::UnsupportedRestriction { .. } => ErrorKind::UnsupportedRestriction,
            Self::EmptyCompilation { .. } => ErrorKind::EmptyCompilation,
            Self::ConfigurationConflict { .. } => ErrorKind::ConfigurationConflict,
            Self::MalformedRule { .. } => ErrorKind::MalformedRule,
            Self::Aggregate { .. } => ErrorKind::Aggregate,
        }
    }

    /// Create an invalid target error.
    pub fn invalid_target(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a structural mismatch error.
    pub fn structural(
        model: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StructuralMismatch {
            model: model.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        model: impl Into<String>,
        field: impl Into<String>,
        expected: impl fmt::Display,
        found: impl fmt::Display,
    ) -> Self {
        Self::TypeMismatch {
            model: model.into(),
            field: field.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create a malformed rule error.
    pub fn malformed(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRule {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Fold collected errors: none is `None`, one is returned as is.
    pub fn collect(mut errors: Vec<CompileError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            count => Some(Self::Aggregate { count, errors }),
        }
    }
}
