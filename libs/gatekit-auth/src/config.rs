use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;
use crate::validation::ValidationConfig;

/// Token verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Inline PEM of the verification public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_pem: Option<String>,

    /// Path to a PEM file with the verification public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_path: Option<PathBuf>,

    /// Accepted signing algorithms; all must belong to one key family
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,

    /// Audience the token must carry
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Leeway in seconds for time-based validations (exp, nbf)
    #[serde(default = "default_leeway")]
    pub leeway_seconds: i64,

    /// Reject tokens without `exp`
    #[serde(default)]
    pub require_exp: bool,
}

fn default_algorithms() -> Vec<Algorithm> {
    vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512]
}

fn default_audience() -> String {
    "access".to_owned()
}

fn default_leeway() -> i64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_key_pem: None,
            public_key_path: None,
            algorithms: default_algorithms(),
            audience: default_audience(),
            leeway_seconds: default_leeway(),
            require_exp: false,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration for consistency
    ///
    /// # Errors
    /// Returns `AuthError::Config` if no key source, or both, are configured,
    /// or if the algorithm list is empty.
    pub fn validate(&self) -> Result<(), AuthError> {
        match (&self.public_key_pem, &self.public_key_path) {
            (None, None) => {
                return Err(AuthError::Config(
                    "one of public_key_pem or public_key_path is required".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(AuthError::Config(
                    "public_key_pem and public_key_path are mutually exclusive".into(),
                ));
            }
            _ => {}
        }
        if self.algorithms.is_empty() {
            return Err(AuthError::Config("algorithms must not be empty".into()));
        }
        if self.leeway_seconds < 0 {
            return Err(AuthError::Config("leeway_seconds must be >= 0".into()));
        }
        Ok(())
    }

    /// Resolve the public key PEM from the inline value or the file.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the configuration is invalid or the file
    /// cannot be read.
    pub fn load_public_key(&self) -> Result<Vec<u8>, AuthError> {
        self.validate()?;
        if let Some(pem) = &self.public_key_pem {
            return Ok(pem.as_bytes().to_vec());
        }
        let path = self
            .public_key_path
            .as_ref()
            .ok_or_else(|| AuthError::Config("public key is not configured".into()))?;
        std::fs::read(path).map_err(|e| {
            AuthError::Config(format!(
                "failed to read public key from {}: {e}",
                path.display()
            ))
        })
    }

    #[must_use]
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            audience: self.audience.clone(),
            leeway_seconds: self.leeway_seconds,
            require_exp: self.require_exp,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_access_tokens_signed_with_rsa() {
        let cfg: AuthConfig = serde_json::from_str(r#"{"public_key_pem":"x"}"#).unwrap();
        assert_eq!(cfg.audience, "access");
        assert_eq!(cfg.algorithms, default_algorithms());
        assert!(!cfg.require_exp);
        cfg.validate().unwrap();
    }

    #[test]
    fn key_source_is_required_and_exclusive() {
        assert!(AuthConfig::default().validate().is_err());

        let both = AuthConfig {
            public_key_pem: Some("x".into()),
            public_key_path: Some("/tmp/key.pem".into()),
            ..AuthConfig::default()
        };
        assert!(both.validate().is_err());
    }

    #[test]
    fn loads_key_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"-----BEGIN PUBLIC KEY-----").unwrap();

        let cfg = AuthConfig {
            public_key_path: Some(file.path().to_path_buf()),
            ..AuthConfig::default()
        };
        assert_eq!(
            cfg.load_public_key().unwrap(),
            b"-----BEGIN PUBLIC KEY-----".to_vec()
        );
    }

    #[test]
    fn algorithms_parse_from_names() {
        let cfg: AuthConfig =
            serde_json::from_str(r#"{"public_key_pem":"x","algorithms":["ES256"]}"#).unwrap();
        assert_eq!(cfg.algorithms, vec![Algorithm::ES256]);
    }
}
