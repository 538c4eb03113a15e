use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use gatekit_security::Subject;

use crate::claims_error::ClaimsError;

/// Decoded payload of a verified token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the `sub` claim. See <https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.2>
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audiences - the `aud` claim, either a string or an array of strings.
    #[serde(
        rename = "aud",
        default,
        deserialize_with = "string_or_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub audiences: Vec<String>,

    /// Expiration time, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not before, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Administrative flag. Anything but a boolean `true` reads as `false`.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub admin: bool,

    /// Remaining claims
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Claims {
    /// Converts verified claims into the caller identity seen by policies.
    ///
    /// # Errors
    /// Returns [`ClaimsError::MissingClaim`] when `sub` is absent or empty.
    pub fn into_subject(self) -> Result<Subject, ClaimsError> {
        let id = self
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(ClaimsError::MissingClaim("sub"))?;

        Ok(Subject::new(id)
            .with_admin(self.admin)
            .with_attributes(self.extras))
    }
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(aud)) => vec![aud],
        Some(OneOrMany::Many(auds)) => auds,
        None => Vec::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}
