//! Transport-facing error mapping.
//!
//! The mapping from [`GateError`](crate::GateError) to HTTP statuses and gRPC
//! codes is a fixed contract shared by every transport.

pub mod grpc;
pub mod http_error;
pub mod problem;

pub use http_error::status_of;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
