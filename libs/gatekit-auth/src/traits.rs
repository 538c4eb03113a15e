use async_trait::async_trait;
use gatekit_security::Subject;

use crate::errors::AuthError;

/// Verifies a raw credential and extracts the caller identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Ok(None)` for an absent or blank credential; an error for anything
    /// presented that does not verify. Never downgrades a bad token to
    /// anonymous.
    async fn verify(&self, raw: Option<&str>) -> Result<Option<Subject>, AuthError>;
}
