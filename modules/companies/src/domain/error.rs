use gatekit::GateError;
use gatekit_security::ResourceKind;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::model::CompanyKind;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Company not found: {id}")]
    CompanyNotFound { id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    #[must_use]
    pub fn company_not_found(id: Uuid) -> Self {
        Self::CompanyNotFound { id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Domain errors surface through the gate taxonomy unchanged in meaning.
impl From<DomainError> for GateError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::CompanyNotFound { id } => GateError::not_found(CompanyKind::NAME, id),
            DomainError::Validation { field, message } => GateError::validation(field, message),
            DomainError::Storage { message } => GateError::unexpected(message),
        }
    }
}
