use std::fmt;

use tracing::{debug, error};

use crate::checker::{Checker, ObjectChecker};
use crate::error::{PolicyError, PolicyLevel};
use crate::operation::OperationId;
use crate::policy_table::{ObjectPolicy, OperationPolicy};
use crate::subject::Subject;
use crate::target::{ResourceKind, Target};

/// Answers allow/deny queries against two immutable policy tables.
///
/// Chains are evaluated in order and stop at the first allow. A missing or
/// empty chain denies and is reported as a configuration defect.
pub struct PermissionEvaluator<Op, K: ResourceKind> {
    operations: OperationPolicy<Op>,
    objects: ObjectPolicy<Op, K>,
}

impl<Op: OperationId, K: ResourceKind> PermissionEvaluator<Op, K> {
    #[must_use]
    pub fn new(operations: OperationPolicy<Op>, objects: ObjectPolicy<Op, K>) -> Self {
        Self {
            operations,
            objects,
        }
    }

    /// Verifies that every operation has a non-empty chain in both tables.
    ///
    /// # Errors
    /// Returns [`PolicyError::MissingChain`] for the first gap found.
    pub fn ensure_complete(&self) -> Result<(), PolicyError> {
        self.operations.ensure_complete(PolicyLevel::Operation)?;
        self.objects.ensure_complete(PolicyLevel::Object)
    }

    /// Coarse check, before anything about the target is known.
    ///
    /// # Errors
    /// Returns [`PolicyError::PermissionDenied`] when no checker allows.
    pub fn has_permission(&self, subject: Option<&Subject>, op: Op) -> Result<(), PolicyError> {
        let Some(chain) = self.operations.chain(op).filter(|c| !c.is_empty()) else {
            report_gap(PolicyLevel::Operation, op);
            return Err(PolicyError::PermissionDenied);
        };

        match chain.iter().find(|checker| checker.allows(subject)) {
            Some(checker) => {
                debug!(operation = op.as_str(), checker = checker.name(), "operation allowed");
                Ok(())
            }
            None => {
                debug!(
                    operation = op.as_str(),
                    anonymous = subject.is_none(),
                    "operation denied: chain exhausted"
                );
                Err(PolicyError::PermissionDenied)
            }
        }
    }

    /// Fine check against the concrete entity or request payload.
    ///
    /// # Errors
    /// Returns [`PolicyError::PermissionDenied`] when no checker allows.
    pub fn has_object_permission(
        &self,
        subject: Option<&Subject>,
        op: Op,
        target: Target<'_, K>,
    ) -> Result<(), PolicyError> {
        let Some(chain) = self.objects.chain(op).filter(|c| !c.is_empty()) else {
            report_gap(PolicyLevel::Object, op);
            return Err(PolicyError::PermissionDenied);
        };

        match chain.iter().find(|checker| checker.allows(subject, target)) {
            Some(checker) => {
                debug!(
                    operation = op.as_str(),
                    resource = K::NAME,
                    target = target.kind(),
                    checker = checker.name(),
                    "object allowed"
                );
                Ok(())
            }
            None => {
                debug!(
                    operation = op.as_str(),
                    resource = K::NAME,
                    target = target.kind(),
                    anonymous = subject.is_none(),
                    "object denied: chain exhausted"
                );
                Err(PolicyError::PermissionDenied)
            }
        }
    }
}

fn report_gap<Op: OperationId>(level: PolicyLevel, op: Op) {
    error!(
        level = %level,
        operation = op.as_str(),
        "policy table has no chain for operation; denying"
    );
}

impl<Op: OperationId, K: ResourceKind> fmt::Debug for PermissionEvaluator<Op, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionEvaluator")
            .field("resource", &K::NAME)
            .field("operations", &self.operations)
            .field("objects", &self.objects)
            .finish()
    }
}
