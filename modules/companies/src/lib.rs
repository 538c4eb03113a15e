#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! The company resource.
//!
//! ## Layering
//!
//! - `domain` holds the model, validation, the operation set with its
//!   default policy, and [`CompanyService`], the gate's store
//! - `infra` holds the in-memory repository and the notification sinks
//! - `api::rest` is the axum transport; it only talks to the gate

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::CompaniesConfig;
pub use domain::error::DomainError;
pub use domain::model::{
    Company, CompanyCreate, CompanyFilter, CompanyKind, CompanyType, CompanyUpdate,
};
pub use domain::ops::CompanyOperation;
pub use domain::policy::PolicyConfig;
pub use domain::repo::CompanyRepository;
pub use domain::service::CompanyService;
pub use infra::sinks::{BroadcastSink, FanoutSink, LoggingSink};
pub use infra::storage::InMemoryCompanyRepository;
pub use module::{CompanyGate, build_gate};
