use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Listing limits for the company service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompaniesConfig {
    /// Page size used when a list request does not set one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound applied to any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

impl Default for CompaniesConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl CompaniesConfig {
    /// # Errors
    /// Returns a validation error if a limit is zero or the default exceeds
    /// the maximum.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.default_page_size == 0 {
            return Err(DomainError::validation(
                "default_page_size",
                "must be greater than zero",
            ));
        }
        if self.max_page_size < self.default_page_size {
            return Err(DomainError::validation(
                "max_page_size",
                format!(
                    "must be at least default_page_size ({})",
                    self.default_page_size
                ),
            ));
        }
        Ok(())
    }
}
