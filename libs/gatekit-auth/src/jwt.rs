use std::fmt;

use async_trait::async_trait;
use gatekit_security::Subject;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde_json::Value;
use tracing::debug;

use crate::bearer::Token;
use crate::claims::Claims;
use crate::claims_error::ClaimsError;
use crate::config::AuthConfig;
use crate::errors::AuthError;
use crate::traits::TokenVerifier;
use crate::validation::{ValidationConfig, validate_claims};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Rsa,
    Ec,
    Ed,
    Hmac,
}

fn family(alg: Algorithm) -> KeyFamily {
    if matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    ) {
        KeyFamily::Rsa
    } else if matches!(alg, Algorithm::ES256 | Algorithm::ES384) {
        KeyFamily::Ec
    } else if matches!(alg, Algorithm::EdDSA) {
        KeyFamily::Ed
    } else {
        KeyFamily::Hmac
    }
}

/// Verifies signed JWTs with a single asymmetric public key.
///
/// The key and the validation rules are fixed at construction; `verify`
/// holds no state across calls.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    algorithms: Vec<Algorithm>,
    validation: ValidationConfig,
}

impl JwtTokenVerifier {
    /// Build a verifier from a PEM-encoded public key.
    ///
    /// # Errors
    /// Returns `AuthError::Config` when the algorithm list is empty, mixes
    /// key families, names a symmetric algorithm, or the PEM does not parse.
    pub fn new(
        public_key_pem: &[u8],
        algorithms: Vec<Algorithm>,
        validation: ValidationConfig,
    ) -> Result<Self, AuthError> {
        let first = algorithms
            .first()
            .copied()
            .ok_or_else(|| AuthError::Config("algorithms must not be empty".into()))?;
        let key_family = family(first);
        if algorithms.iter().any(|alg| family(*alg) != key_family) {
            return Err(AuthError::Config(
                "algorithms must all use the same key family".into(),
            ));
        }

        let key = match key_family {
            KeyFamily::Rsa => DecodingKey::from_rsa_pem(public_key_pem),
            KeyFamily::Ec => DecodingKey::from_ec_pem(public_key_pem),
            KeyFamily::Ed => DecodingKey::from_ed_pem(public_key_pem),
            KeyFamily::Hmac => {
                return Err(AuthError::Config(
                    "symmetric algorithms are not supported; configure a public key algorithm"
                        .into(),
                ));
            }
        }
        .map_err(|e| AuthError::Config(format!("invalid public key: {e}")))?;

        Ok(Self {
            key,
            algorithms,
            validation,
        })
    }

    /// Build a verifier from [`AuthConfig`].
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the key cannot be loaded or parsed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let pem = config.load_public_key()?;
        Self::new(&pem, config.algorithms.clone(), config.validation())
    }

    fn verify_token(&self, token: &Token) -> Result<Subject, ClaimsError> {
        let header = decode_header(token.as_str())
            .map_err(|e| ClaimsError::DecodeFailed(format!("Invalid JWT header: {e}")))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(ClaimsError::AlgorithmNotAllowed(format!("{:?}", header.alg)));
        }

        let mut validation = Validation::new(header.alg);

        // Time and audience checks run in validate_claims with our leeway rules
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        let empty_claims: &[&str] = &[];
        validation.set_required_spec_claims(empty_claims);

        let token_data = decode::<Value>(token.as_str(), &self.key, &validation)
            .map_err(|e| ClaimsError::DecodeFailed(format!("JWT validation failed: {e}")))?;

        let claims: Claims = serde_json::from_value(token_data.claims)
            .map_err(|e| ClaimsError::Malformed(e.to_string()))?;
        validate_claims(&claims, &self.validation)?;
        claims.into_subject()
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, raw: Option<&str>) -> Result<Option<Subject>, AuthError> {
        let Some(token) = Token::parse(raw) else {
            return Ok(None);
        };

        match self.verify_token(&token) {
            Ok(subject) => {
                debug!(subject = subject.id(), admin = subject.is_admin(), "token verified");
                Ok(Some(subject))
            }
            Err(e) => {
                debug!(error = %e, "token rejected");
                Err(AuthError::InvalidToken(e))
            }
        }
    }
}

impl fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenVerifier")
            .field("algorithms", &self.algorithms)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}
