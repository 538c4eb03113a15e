use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::checker::{Builtin, Checker, ObjectChecker};
use crate::error::{PolicyError, PolicyLevel};
use crate::operation::OperationId;
use crate::subject::Subject;
use crate::target::{ResourceKind, Target};

/// Immutable map from operation to an ordered checker chain.
///
/// Built once through [`PolicyTableBuilder`] and shared read-only afterwards.
pub struct PolicyTable<Op, C: ?Sized> {
    chains: HashMap<Op, Vec<Arc<C>>>,
}

/// Table consulted before the business call.
pub type OperationPolicy<Op> = PolicyTable<Op, dyn Checker>;

/// Table consulted against the concrete request object.
pub type ObjectPolicy<Op, K> = PolicyTable<Op, dyn ObjectChecker<K>>;

impl<Op: OperationId, C: ?Sized> PolicyTable<Op, C> {
    #[must_use]
    pub fn builder() -> PolicyTableBuilder<Op, C> {
        PolicyTableBuilder {
            chains: HashMap::new(),
        }
    }

    /// The chain for `op`, or `None` when the table has no entry.
    #[must_use]
    pub fn chain(&self, op: Op) -> Option<&[Arc<C>]> {
        self.chains.get(&op).map(Vec::as_slice)
    }

    /// Operations with a missing or empty chain, in declaration order.
    #[must_use]
    pub fn gaps(&self) -> Vec<Op> {
        Op::all()
            .iter()
            .copied()
            .filter(|op| self.chains.get(op).is_none_or(Vec::is_empty))
            .collect()
    }

    /// Fails on the first operation without a usable chain.
    ///
    /// # Errors
    /// Returns [`PolicyError::MissingChain`] naming the operation.
    pub fn ensure_complete(&self, level: PolicyLevel) -> Result<(), PolicyError> {
        match self.gaps().first() {
            Some(op) => Err(PolicyError::MissingChain {
                level,
                operation: op.as_str(),
            }),
            None => Ok(()),
        }
    }
}

impl<Op: OperationId, C: ?Sized> fmt::Debug for PolicyTable<Op, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for op in Op::all() {
            map.entry(&op.as_str(), &self.chains.get(op).map_or(0, Vec::len));
        }
        map.finish()
    }
}

pub struct PolicyTableBuilder<Op, C: ?Sized> {
    chains: HashMap<Op, Vec<Arc<C>>>,
}

impl<Op: OperationId, C: ?Sized> PolicyTableBuilder<Op, C> {
    /// Appends an already shared checker to the chain of `op`.
    #[must_use]
    pub fn push(mut self, op: Op, checker: Arc<C>) -> Self {
        self.chains.entry(op).or_default().push(checker);
        self
    }

    #[must_use]
    pub fn build(self) -> PolicyTable<Op, C> {
        PolicyTable {
            chains: self.chains,
        }
    }
}

impl<Op: OperationId> PolicyTableBuilder<Op, dyn Checker> {
    #[must_use]
    pub fn rule<C: Checker + 'static>(self, op: Op, checker: C) -> Self {
        self.push(op, Arc::new(checker))
    }

    #[must_use]
    pub fn rule_fn<F>(self, op: Op, checker: F) -> Self
    where
        F: Fn(Option<&Subject>) -> bool + Send + Sync + 'static,
    {
        self.push(op, Arc::new(checker))
    }

    #[must_use]
    pub fn chain_of(self, op: Op, builtins: &[Builtin]) -> Self {
        builtins
            .iter()
            .fold(self, |builder, builtin| builder.rule(op, *builtin))
    }
}

impl<Op: OperationId, K: ResourceKind> PolicyTableBuilder<Op, dyn ObjectChecker<K>> {
    #[must_use]
    pub fn rule<C: ObjectChecker<K> + 'static>(self, op: Op, checker: C) -> Self {
        self.push(op, Arc::new(checker))
    }

    #[must_use]
    pub fn rule_fn<F>(self, op: Op, checker: F) -> Self
    where
        F: Fn(Option<&Subject>, Target<'_, K>) -> bool + Send + Sync + 'static,
    {
        self.push(op, Arc::new(checker))
    }

    #[must_use]
    pub fn chain_of(self, op: Op, builtins: &[Builtin]) -> Self {
        builtins
            .iter()
            .fold(self, |builder, builtin| builder.rule(op, *builtin))
    }
}
