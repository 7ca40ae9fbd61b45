//! Folds leaf predicates into the final tree.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{CompileError, CompileResult};
use crate::predicate::Predicate;
use crate::rule::Combine;

#[derive(Debug)]
struct GroupAccumulator {
    op: Combine,
    members: Vec<Predicate>,
}

/// Accumulates leaves per combination group for one compilation.
///
/// Groups keep first-seen order. Each group becomes a flat `Group{op, ..}`
/// (or its only leaf), and the groups are joined with AND.
#[derive(Debug, Default)]
pub struct Combiner {
    groups: IndexMap<SmolStr, GroupAccumulator>,
}

impl Combiner {
    /// Create an empty combiner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf to `group`.
    ///
    /// The first leaf of a group fixes its operator; a later leaf declaring
    /// another operator is a configuration conflict.
    pub fn push(&mut self, group: &str, op: Combine, leaf: Predicate) -> CompileResult<()> {
        match self.groups.get_mut(group) {
            Some(acc) if acc.op != op => Err(CompileError::ConfigurationConflict {
                group: group.to_string(),
                first: acc.op,
                second: op,
            }),
            Some(acc) => {
                acc.members.push(leaf);
                Ok(())
            }
            None => {
                self.groups.insert(
                    SmolStr::from(group),
                    GroupAccumulator {
                        op,
                        members: vec![leaf],
                    },
                );
                Ok(())
            }
        }
    }

    /// Number of groups seen so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Fold everything into one predicate.
    pub fn finish(self, entity: &str) -> CompileResult<Predicate> {
        if self.groups.is_empty() {
            return Err(CompileError::EmptyCompilation {
                entity: entity.to_string(),
            });
        }

        let groups: Vec<Predicate> = self
            .groups
            .into_values()
            .map(|acc| Predicate::group(acc.op, acc.members))
            .collect();

        Ok(Predicate::group(Combine::And, groups))
    }
}
