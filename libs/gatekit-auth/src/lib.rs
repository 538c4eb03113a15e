#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Bearer token verification.
//!
//! Turns the raw `Authorization` credential of a request into an optional
//! [`Subject`](gatekit_security::Subject). An absent credential is anonymous;
//! a present but invalid one is always an error.

pub mod bearer;
pub mod claims;
pub mod claims_error;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod traits;
pub mod validation;

pub use bearer::{Token, extract_bearer_token, parse_bearer};
pub use claims::Claims;
pub use claims_error::ClaimsError;
pub use config::AuthConfig;
pub use errors::AuthError;
pub use jwt::JwtTokenVerifier;
pub use traits::TokenVerifier;
pub use validation::{ValidationConfig, validate_claims};
