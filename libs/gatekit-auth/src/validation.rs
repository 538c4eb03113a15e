use time::OffsetDateTime;

use crate::{claims::Claims, claims_error::ClaimsError};

/// Checks applied after the signature has been verified.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Audience the token must carry
    pub audience: String,

    /// Leeway in seconds for time-based validations (exp, nbf)
    pub leeway_seconds: i64,

    /// Reject tokens without an `exp` claim
    pub require_exp: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            audience: "access".to_owned(),
            leeway_seconds: 60,
            require_exp: false,
        }
    }
}

/// Perform the claim checks that follow signature verification.
///
/// # Errors
/// Returns `ClaimsError` if the audience, expiration or not-before check fails.
pub fn validate_claims(claims: &Claims, config: &ValidationConfig) -> Result<(), ClaimsError> {
    validate_claims_at(claims, config, OffsetDateTime::now_utc().unix_timestamp())
}

pub(crate) fn validate_claims_at(
    claims: &Claims,
    config: &ValidationConfig,
    now: i64,
) -> Result<(), ClaimsError> {
    // 1. Audience must contain the configured value
    if !claims.audiences.iter().any(|aud| *aud == config.audience) {
        return Err(ClaimsError::InvalidAudience {
            expected: config.audience.clone(),
            actual: claims.audiences.clone(),
        });
    }

    // 2. Expiration with leeway
    match claims.exp {
        Some(exp) if now > exp.saturating_add(config.leeway_seconds) => {
            return Err(ClaimsError::Expired);
        }
        None if config.require_exp => return Err(ClaimsError::MissingClaim("exp")),
        _ => {}
    }

    // 3. Not-before with leeway
    if let Some(nbf) = claims.nbf
        && now < nbf.saturating_sub(config.leeway_seconds)
    {
        return Err(ClaimsError::NotYetValid);
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn access() -> Claims {
        Claims {
            sub: Some("u".to_owned()),
            audiences: vec!["access".to_owned()],
            ..Claims::default()
        }
    }

    fn strict() -> ValidationConfig {
        ValidationConfig {
            leeway_seconds: 0,
            ..ValidationConfig::default()
        }
    }

    #[test]
    fn audience_must_contain_access() {
        let mut claims = access();
        assert!(validate_claims_at(&claims, &strict(), NOW).is_ok());

        claims.audiences = vec!["refresh".to_owned()];
        assert!(matches!(
            validate_claims_at(&claims, &strict(), NOW),
            Err(ClaimsError::InvalidAudience { .. })
        ));

        claims.audiences = vec!["refresh".to_owned(), "access".to_owned()];
        assert!(validate_claims_at(&claims, &strict(), NOW).is_ok());
    }

    #[test]
    fn expiration_honours_leeway() {
        let claims = Claims {
            exp: Some(NOW - 30),
            ..access()
        };
        assert_eq!(
            validate_claims_at(&claims, &strict(), NOW),
            Err(ClaimsError::Expired)
        );

        let lenient = ValidationConfig {
            leeway_seconds: 60,
            ..strict()
        };
        assert!(validate_claims_at(&claims, &lenient, NOW).is_ok());
    }

    #[test]
    fn not_before_in_future_is_rejected() {
        let claims = Claims {
            nbf: Some(NOW + 120),
            ..access()
        };
        assert_eq!(
            validate_claims_at(&claims, &strict(), NOW),
            Err(ClaimsError::NotYetValid)
        );
    }

    #[test]
    fn exp_is_optional_unless_required() {
        let claims = access();
        assert!(validate_claims_at(&claims, &strict(), NOW).is_ok());

        let required = ValidationConfig {
            require_exp: true,
            ..strict()
        };
        assert_eq!(
            validate_claims_at(&claims, &required, NOW),
            Err(ClaimsError::MissingClaim("exp"))
        );
    }
}
