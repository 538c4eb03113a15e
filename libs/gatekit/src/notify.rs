use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOperation {
    Created,
    Updated,
    Deleted,
}

impl EventOperation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed mutation, as published to sinks.
///
/// Serializes as `{"operation":"created","resource":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEvent<E> {
    pub operation: EventOperation,
    pub resource: E,
}

impl<E> ResourceEvent<E> {
    #[must_use]
    pub fn new(operation: EventOperation, resource: E) -> Self {
        Self {
            operation,
            resource,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode event: {0}")]
    Encode(String),

    #[error("failed to deliver event: {0}")]
    Delivery(String),
}

/// Fire-and-forget event delivery. Failures are logged by the caller and
/// never affect the outcome of the request.
#[async_trait]
pub trait NotificationSink<E: Send + Sync>: Send + Sync {
    async fn send(&self, event: &ResourceEvent<E>) -> Result<(), NotifyError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn event_wire_format() {
        let event = ResourceEvent::new(EventOperation::Created, json!({"id": 1}));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"operation": "created", "resource": {"id": 1}})
        );
    }
}
