use thiserror::Error;

/// Reasons a presented credential is rejected.
///
/// These details are for logs only; callers see a single "bad token" outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("JWT decode failed: {0}")]
    DecodeFailed(String),

    #[error("Algorithm {0} is not accepted")]
    AlgorithmNotAllowed(String),

    #[error("Invalid audience: expected {expected}, got {actual:?}")]
    InvalidAudience {
        expected: String,
        actual: Vec<String>,
    },

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid (nbf check failed)")]
    NotYetValid,

    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("Malformed claims: {0}")]
    Malformed(String),
}
