use thiserror::Error;

use crate::claims_error::ClaimsError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// A credential was presented and failed verification.
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] ClaimsError),

    /// The verifier could not be built from its configuration.
    #[error("Invalid auth configuration: {0}")]
    Config(String),
}
