#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! The authorization gate.
//!
//! [`AuthorizationGate`] sits between a transport and a [`ResourceStore`]. Every
//! request goes through the same short-circuiting pipeline: authenticate,
//! authorize the operation, fetch if needed, authorize the object, mutate, and
//! finally notify on a best-effort basis.

pub mod api;
pub mod error;
pub mod gate;
pub mod notify;
pub mod store;
pub mod telemetry;

pub use error::GateError;
pub use gate::{AuthorizationGate, Listing, RequestContext};
pub use notify::{EventOperation, NotificationSink, NotifyError, ResourceEvent};
pub use store::{CreateOf, CrudOperation, EntityOf, FilterOf, ResourceStore};

pub use gatekit_auth as auth;
pub use gatekit_security as security;
