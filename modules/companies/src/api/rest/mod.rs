//! REST transport for companies.
//!
//! Handlers only translate HTTP to gate calls and back; errors leave as
//! RFC 9457 problem documents via [`GateError`](gatekit::GateError).

use crate::domain::model::Company;
use crate::domain::repo::CompanyRepository;
use crate::infra::sinks::BroadcastSink;
use crate::module::CompanyGate;

pub mod dto;
mod events;
mod handlers;
mod routes;

pub use handlers::COUNT_HEADER;
pub use routes::router;

/// Shared state of the company routes.
pub struct ApiState<R: CompanyRepository> {
    pub gate: CompanyGate<R>,
    /// Source of the `/companies/events` stream
    pub events: BroadcastSink<Company>,
}

impl<R: CompanyRepository> Clone for ApiState<R> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            events: self.events.clone(),
        }
    }
}
