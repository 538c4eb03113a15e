use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::api::problem::{Problem, ValidationViolation};
use crate::error::GateError;

/// HTTP status for each error kind.
#[must_use]
pub fn status_of(err: &GateError) -> StatusCode {
    match err {
        GateError::PermissionDenied => StatusCode::FORBIDDEN,
        GateError::BadToken => StatusCode::UNAUTHORIZED,
        GateError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
        GateError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        GateError::UnexpectedBehavior(_) | GateError::Cancelled => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<&GateError> for Problem {
    fn from(err: &GateError) -> Self {
        let status = status_of(err);
        let title = status.canonical_reason().unwrap_or("Error");
        let problem = match err {
            GateError::ValidationFailed { field, message } => {
                Problem::new(status, title, err.to_string()).with_errors(vec![
                    ValidationViolation {
                        field: field.clone(),
                        message: message.clone(),
                    },
                ])
            }
            // Internal details stay in the logs.
            GateError::UnexpectedBehavior(_) | GateError::Cancelled => {
                Problem::new(status, title, "internal error")
            }
            _ => Problem::new(status, title, err.to_string()),
        };
        problem.with_code(err.code())
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        if status_of(&self).is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }
        Problem::from(&self).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn status_contract() {
        let cases = [
            (GateError::PermissionDenied, 403),
            (GateError::BadToken, 401),
            (GateError::not_found("company", "42"), 404),
            (GateError::validation("name", "is required"), 400),
            (GateError::unexpected("db down"), 500),
            (GateError::Cancelled, 500),
        ];
        for (err, expected) in cases {
            assert_eq!(status_of(&err).as_u16(), expected, "{err:?}");
        }
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let resp = GateError::unexpected("connection refused to 10.0.0.7").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.7"));
        assert!(text.contains("unexpected_behavior"));
    }

    #[tokio::test]
    async fn validation_problem_lists_the_field() {
        let resp = GateError::validation("name", "must be at most 15 characters").into_response();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"][0]["field"], "name");
    }
}
