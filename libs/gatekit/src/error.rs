use std::fmt::Display;

use gatekit_auth::AuthError;
use gatekit_security::PolicyError;
use thiserror::Error;

/// Everything the gate can report to a transport.
///
/// Messages are fixed where they could otherwise reveal why a caller was
/// rejected; the reasons go to debug logs only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("missing or invalid credentials")]
    BadToken,

    #[error("permission denied")]
    PermissionDenied,

    #[error("validation failed on '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("{resource} '{id}' not found")]
    EntityNotFound { resource: &'static str, id: String },

    #[error("unexpected behavior: {0}")]
    UnexpectedBehavior(String),

    #[error("request cancelled")]
    Cancelled,
}

impl GateError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Display) -> Self {
        Self::EntityNotFound {
            resource,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedBehavior(message.into())
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadToken => "bad_token",
            Self::PermissionDenied => "permission_denied",
            Self::ValidationFailed { .. } => "validation_failed",
            Self::EntityNotFound { .. } => "entity_not_found",
            Self::UnexpectedBehavior(_) => "unexpected_behavior",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<AuthError> for GateError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => Self::BadToken,
            AuthError::Config(msg) => Self::UnexpectedBehavior(msg),
        }
    }
}

impl From<PolicyError> for GateError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::PermissionDenied | PolicyError::MissingChain { .. } => {
                Self::PermissionDenied
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use gatekit_auth::ClaimsError;
    use gatekit_security::PolicyLevel;

    #[test]
    fn auth_failures_collapse_to_bad_token() {
        let err: GateError = AuthError::InvalidToken(ClaimsError::Expired).into();
        assert_eq!(err, GateError::BadToken);
        assert_eq!(err.to_string(), "missing or invalid credentials");
    }

    #[test]
    fn policy_gaps_are_denials() {
        let err: GateError = PolicyError::MissingChain {
            level: PolicyLevel::Object,
            operation: "company_list",
        }
        .into();
        assert_eq!(err, GateError::PermissionDenied);
    }
}
