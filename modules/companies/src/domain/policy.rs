//! Company access policy.
//!
//! Both tables are plain configuration: one list of stock checker names per
//! operation. The defaults let anybody read and require an authenticated
//! caller for every mutation, at both levels.

use std::collections::BTreeMap;

use gatekit_security::{
    Builtin, ObjectPolicy, OperationId, OperationPolicy, PermissionEvaluator, PolicyError,
};
use serde::{Deserialize, Serialize};

use crate::domain::model::CompanyKind;
use crate::domain::ops::CompanyOperation;

pub type CompanyEvaluator = PermissionEvaluator<CompanyOperation, CompanyKind>;

type Chains = BTreeMap<CompanyOperation, Vec<Builtin>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Operation-level chains
    #[serde(default = "default_chains")]
    pub operations: Chains,

    /// Object-level chains
    #[serde(default = "default_chains")]
    pub objects: Chains,
}

fn default_chains() -> Chains {
    CompanyOperation::all()
        .iter()
        .map(|op| {
            let checker = match op {
                CompanyOperation::CompanyList | CompanyOperation::CompanyDetail => {
                    Builtin::Anybody
                }
                CompanyOperation::CompanyCreate
                | CompanyOperation::CompanyUpdate
                | CompanyOperation::CompanyDelete => Builtin::User,
            };
            (*op, vec![checker])
        })
        .collect()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            operations: default_chains(),
            objects: default_chains(),
        }
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn operation_policy(&self) -> OperationPolicy<CompanyOperation> {
        self.operations
            .iter()
            .fold(
                OperationPolicy::<CompanyOperation>::builder(),
                |builder, (op, chain)| builder.chain_of(*op, chain),
            )
            .build()
    }

    #[must_use]
    pub fn object_policy(&self) -> ObjectPolicy<CompanyOperation, CompanyKind> {
        self.objects
            .iter()
            .fold(
                ObjectPolicy::<CompanyOperation, CompanyKind>::builder(),
                |builder, (op, chain)| builder.chain_of(*op, chain),
            )
            .build()
    }

    /// Build the evaluator, refusing tables with gaps.
    ///
    /// # Errors
    /// Returns [`PolicyError::MissingChain`] when an operation has no checker
    /// at either level; an empty list counts as missing.
    pub fn evaluator(&self) -> Result<CompanyEvaluator, PolicyError> {
        let evaluator = PermissionEvaluator::new(self.operation_policy(), self.object_policy());
        evaluator.ensure_complete()?;
        Ok(evaluator)
    }
}
