//! The criteria compiler: registry, validation, joins, leaves and groups in
//! one pass.

use criters_schema::config::CompileConfig;
use criters_schema::{ErrorMode, SchemaReflector};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

use crate::build::build_leaf;
use crate::combine::Combiner;
use crate::error::{CompileError, CompileResult};
use crate::predicate::Predicate;
use crate::registry::{Filter, RuleRegistry};
use crate::resolve::{JoinPath, resolve_relation};
use crate::rule::ParameterRule;
use crate::validate::validate_parameter;

/// Options for one compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// How rule failures are reported.
    pub error_mode: ErrorMode,
}

impl CompileOptions {
    /// Default options: fail on the first error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }
}

impl From<&CompileConfig> for CompileOptions {
    fn from(config: &CompileConfig) -> Self {
        Self {
            error_mode: config.error_mode,
        }
    }
}

/// The model and table a query starts from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryRoot {
    /// Model name.
    pub model: SmolStr,
    /// Storage table name.
    pub table: SmolStr,
}

impl QueryRoot {
    /// Create a root.
    pub fn new(model: impl Into<SmolStr>, table: impl Into<SmolStr>) -> Self {
        Self {
            model: model.into(),
            table: table.into(),
        }
    }
}

/// A compiled predicate with the joins it needs and the caller's handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled<H> {
    /// The predicate tree.
    pub predicate: Predicate,
    /// Joins to materialize, one chain per relation rule, in rule order.
    pub joins: Vec<JoinPath>,
    /// The handle passed to [`Criters::compile_with`], untouched.
    pub handle: H,
}

/// A compiled predicate paired with a root derived from the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    /// The derived query root.
    pub root: QueryRoot,
    /// Joins to materialize, one chain per relation rule, in rule order.
    pub joins: Vec<JoinPath>,
    /// The predicate tree.
    pub predicate: Predicate,
}

/// Compiles filters against a schema.
///
/// Holds no state between calls; one compiler can serve many threads when
/// the reflector is `Sync`.
#[derive(Debug)]
pub struct Criters<'s, R: ?Sized> {
    reflector: &'s R,
    options: CompileOptions,
    root: Option<QueryRoot>,
}

impl<'s, R: SchemaReflector + ?Sized> Criters<'s, R> {
    /// Create a compiler over `reflector`.
    pub fn new(reflector: &'s R) -> Self {
        Self {
            reflector,
            options: CompileOptions::default(),
            root: None,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile against a caller-supplied root instead of deriving one.
    ///
    /// The root's model must be the filter's entity.
    pub fn use_root(mut self, root: QueryRoot) -> Self {
        self.root = Some(root);
        self
    }

    /// The active options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Build the query root for `F` from the schema.
    pub fn derive_root<F: Filter>(&self) -> CompileResult<QueryRoot> {
        if !self.reflector.is_searchable(F::ENTITY) {
            return Err(CompileError::invalid_target(
                F::ENTITY,
                "not a searchable model in this schema",
            ));
        }
        let table = self
            .reflector
            .table_name(F::ENTITY)
            .unwrap_or_else(|| SmolStr::new(F::ENTITY));
        Ok(QueryRoot::new(F::ENTITY, table))
    }

    /// Compile `filter` to its predicate tree only.
    pub fn restrictions<F: Filter>(&self, filter: &F) -> CompileResult<Predicate> {
        self.run(filter).map(|(_, predicate, _)| predicate)
    }

    /// Compile `filter`.
    pub fn compile<F: Filter>(&self, filter: &F) -> CompileResult<Compiled<()>> {
        self.compile_with(filter, ())
    }

    /// Compile `filter`, threading `handle` through to the result.
    pub fn compile_with<F: Filter, H>(&self, filter: &F, handle: H) -> CompileResult<Compiled<H>> {
        let (_, predicate, joins) = self.run(filter)?;
        Ok(Compiled {
            predicate,
            joins,
            handle,
        })
    }

    /// Compile `filter` against a root derived from the schema.
    pub fn criteria<F: Filter>(&self, filter: &F) -> CompileResult<Criteria> {
        let (root, predicate, joins) = self.run(filter)?;
        Ok(Criteria {
            root,
            joins,
            predicate,
        })
    }

    fn root_for<F: Filter>(&self) -> CompileResult<QueryRoot> {
        let derived = self.derive_root::<F>()?;
        match &self.root {
            None => Ok(derived),
            Some(root) if root.model == F::ENTITY => Ok(root.clone()),
            Some(root) => Err(CompileError::invalid_target(
                F::ENTITY,
                format!("query root is `{}`, filter targets `{}`", root.model, F::ENTITY),
            )),
        }
    }

    fn run<F: Filter>(&self, filter: &F) -> CompileResult<(QueryRoot, Predicate, Vec<JoinPath>)> {
        let registry = RuleRegistry::<F>::new()?;
        let root = self.root_for::<F>()?;

        let mut combiner = Combiner::new();
        let mut joins: Vec<JoinPath> = Vec::new();
        let mut errors = Vec::new();

        for rule in registry.parameter_rules() {
            let result = self.apply(rule, filter, &root.model, root.table.clone(), &mut combiner);
            if let Err(err) = result {
                self.record(err, &mut errors)?;
            }
        }

        for (index, rule) in registry.relation_rules().iter().enumerate() {
            let resolved = match resolve_relation(rule, index + 1, &root.model, self.reflector) {
                Ok(resolved) => resolved,
                Err(err) => {
                    self.record(err, &mut errors)?;
                    continue;
                }
            };

            for (hop, join) in rule.hops().iter().zip(&resolved.joins) {
                for parameter in hop.parameters() {
                    let result =
                        self.apply(parameter, filter, &join.target, join.alias(), &mut combiner);
                    if let Err(err) = result {
                        self.record(err, &mut errors)?;
                    }
                }
            }
            joins.extend(resolved.joins);
        }

        if let Some(err) = CompileError::collect(errors) {
            return Err(err);
        }

        let predicate = combiner.finish(F::ENTITY)?;
        debug!(
            entity = F::ENTITY,
            parameters = registry.parameter_rules().len(),
            relations = registry.relation_rules().len(),
            leaves = predicate.leaf_count(),
            joins = joins.len(),
            "compiled filter"
        );

        Ok((root, predicate, joins))
    }

    /// Validate one rule against `model`, read its value and add the leaf.
    fn apply<F>(
        &self,
        rule: &ParameterRule<F>,
        filter: &F,
        model: &str,
        qualifier: SmolStr,
        combiner: &mut Combiner,
    ) -> CompileResult<()> {
        let field = validate_parameter(rule, model, self.reflector)?;
        let leaf = build_leaf(&field, qualifier, rule.restriction(), rule.value(filter))?;
        combiner.push(rule.group_id(), rule.combine(), leaf)
    }

    fn record(&self, err: CompileError, errors: &mut Vec<CompileError>) -> CompileResult<()> {
        match self.options.error_mode {
            ErrorMode::FailFast => Err(err),
            ErrorMode::Aggregate => {
                errors.push(err);
                Ok(())
            }
        }
    }
}
