use std::fmt;

use thiserror::Error;

/// Which of the two policy tables a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyLevel {
    Operation,
    Object,
}

impl fmt::Display for PolicyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyLevel::Operation => f.write_str("operation"),
            PolicyLevel::Object => f.write_str("object"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The chain was exhausted, or missing, without an allow.
    #[error("permission denied")]
    PermissionDenied,

    /// Configuration defect detected while validating a table.
    #[error("no {level}-level policy chain for operation '{operation}'")]
    MissingChain {
        level: PolicyLevel,
        operation: &'static str,
    },
}
