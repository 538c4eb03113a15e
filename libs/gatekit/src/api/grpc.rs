use gatekit_auth::parse_bearer;
use tonic::metadata::MetadataMap;
use tonic::{Code, Status};

use crate::error::GateError;

/// gRPC code for each error kind.
#[must_use]
pub fn code_of(err: &GateError) -> Code {
    match err {
        GateError::PermissionDenied => Code::PermissionDenied,
        GateError::BadToken => Code::Unauthenticated,
        GateError::EntityNotFound { .. } => Code::NotFound,
        GateError::ValidationFailed { .. } => Code::InvalidArgument,
        GateError::UnexpectedBehavior(_) | GateError::Cancelled => Code::Internal,
    }
}

#[must_use]
pub fn to_status(err: &GateError) -> Status {
    let message = match err {
        GateError::UnexpectedBehavior(_) | GateError::Cancelled => "internal error".to_owned(),
        other => other.to_string(),
    };
    Status::new(code_of(err), message)
}

impl From<GateError> for Status {
    fn from(err: GateError) -> Self {
        to_status(&err)
    }
}

/// Bearer credential from the `authorization` metadata entry. Absent, or a
/// different scheme, yields `None`.
#[must_use]
pub fn bearer_token(metadata: &MetadataMap) -> Option<&str> {
    metadata
        .get("authorization")?
        .to_str()
        .ok()
        .and_then(parse_bearer)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn code_contract() {
        assert_eq!(to_status(&GateError::PermissionDenied).code(), Code::PermissionDenied);
        assert_eq!(to_status(&GateError::BadToken).code(), Code::Unauthenticated);
        assert_eq!(
            to_status(&GateError::not_found("company", "1")).code(),
            Code::NotFound
        );
        assert_eq!(
            to_status(&GateError::validation("name", "too long")).code(),
            Code::InvalidArgument
        );
        assert_eq!(to_status(&GateError::Cancelled).code(), Code::Internal);

        let status: Status = GateError::unexpected("secret detail").into();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "internal error");
    }

    #[test]
    fn bearer_from_metadata() {
        let mut md = MetadataMap::new();
        assert_eq!(bearer_token(&md), None);

        md.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&md), None);

        md.insert("authorization", "Bearer tok".parse().unwrap());
        assert_eq!(bearer_token(&md), Some("tok"));
    }
}
