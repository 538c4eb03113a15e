use std::fmt::Display;

use async_trait::async_trait;
use gatekit_security::{OperationId, ResourceKind};

use crate::error::GateError;

pub type EntityOf<S> = <<S as ResourceStore>::Kind as ResourceKind>::Entity;
pub type CreateOf<S> = <<S as ResourceStore>::Kind as ResourceKind>::Create;
pub type FilterOf<S> = <<S as ResourceStore>::Kind as ResourceKind>::Filter;

/// Business storage for one resource type.
///
/// Payload validation belongs here; the gate passes `ValidationFailed` and
/// `EntityNotFound` through unchanged.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    type Kind: ResourceKind;
    type Id: Clone + Display + Send + Sync + 'static;
    type Update: Send + Sync + 'static;

    /// Identifier of an existing entity.
    fn entity_id(entity: &EntityOf<Self>) -> Self::Id;

    /// Identifier the patch applies to.
    fn update_target(patch: &Self::Update) -> Self::Id;

    async fn get(&self, id: &Self::Id) -> Result<EntityOf<Self>, GateError>;

    async fn create(&self, payload: CreateOf<Self>) -> Result<EntityOf<Self>, GateError>;

    async fn update(&self, patch: Self::Update) -> Result<EntityOf<Self>, GateError>;

    async fn delete(&self, id: &Self::Id) -> Result<(), GateError>;

    async fn list(&self, filter: &FilterOf<Self>) -> Result<Vec<EntityOf<Self>>, GateError>;

    /// Number of entities matching `filter`, ignoring paging.
    async fn count(&self, filter: &FilterOf<Self>) -> Result<u64, GateError>;
}

/// Maps the five gate pipelines onto a resource's operation identifiers.
pub trait CrudOperation: OperationId {
    const LIST: Self;
    const DETAIL: Self;
    const CREATE: Self;
    const UPDATE: Self;
    const DELETE: Self;
}
