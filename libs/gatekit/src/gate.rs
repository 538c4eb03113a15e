use std::fmt;
use std::future::Future;
use std::sync::Arc;

use gatekit_auth::TokenVerifier;
use gatekit_security::{PermissionEvaluator, PolicyError, ResourceKind, Subject, Target};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, instrument};

use crate::error::GateError;
use crate::notify::{EventOperation, NotificationSink, ResourceEvent};
use crate::store::{CreateOf, CrudOperation, EntityOf, FilterOf, ResourceStore};

/// Per-request input to the gate: the raw credential and a cancellation
/// signal owned by the transport.
#[derive(Clone, Default)]
pub struct RequestContext {
    token: Option<String>,
    cancel: CancellationToken,
}

impl RequestContext {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("cancel", &self.cancel.is_cancelled())
            .finish()
    }
}

/// One page of a list request together with the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<E> {
    pub items: Vec<E>,
    pub total: u64,
}

/// Composes token verification, both policy levels, the store and the
/// notification sink into one pipeline per operation.
///
/// All collaborators are immutable and shared; a gate is cheap to clone.
///
/// Entry points take the transport's decode result for their input. A decode
/// error surfaces only after authentication and the operation-level check,
/// so a bad credential or a coarse denial wins over malformed input.
pub struct AuthorizationGate<S, Op>
where
    S: ResourceStore,
{
    verifier: Arc<dyn TokenVerifier>,
    evaluator: Arc<PermissionEvaluator<Op, S::Kind>>,
    store: Arc<S>,
    sink: Arc<dyn NotificationSink<EntityOf<S>>>,
}

impl<S: ResourceStore, Op> Clone for AuthorizationGate<S, Op> {
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
            evaluator: Arc::clone(&self.evaluator),
            store: Arc::clone(&self.store),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<S, Op> AuthorizationGate<S, Op>
where
    S: ResourceStore,
    Op: CrudOperation,
{
    /// Assemble a gate.
    ///
    /// # Errors
    /// Returns [`PolicyError::MissingChain`] if either policy table lacks a
    /// chain for any operation.
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        evaluator: Arc<PermissionEvaluator<Op, S::Kind>>,
        store: Arc<S>,
        sink: Arc<dyn NotificationSink<EntityOf<S>>>,
    ) -> Result<Self, PolicyError> {
        evaluator.ensure_complete()?;
        Ok(Self {
            verifier,
            evaluator,
            store,
            sink,
        })
    }

    /// Create: op-check, object check on the payload, store, notify.
    ///
    /// # Errors
    /// Any pipeline step failure; notification failures are not reported.
    #[instrument(skip_all, fields(resource = <S::Kind as ResourceKind>::NAME, operation = "create"))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        payload: Result<CreateOf<S>, GateError>,
    ) -> Result<EntityOf<S>, GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), Op::CREATE)?;
        let payload = payload?;
        self.authorize_object(ctx, subject.as_ref(), Op::CREATE, Target::Create(&payload))?;
        checkpoint(ctx)?;

        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        detach(async move {
            let entity = store.create(payload).await?;
            debug!(state = "mutated", "store.create completed");
            let id = S::entity_id(&entity);
            Ok(emit(sink.as_ref(), EventOperation::Created, &id, entity).await)
        })
        .await
    }

    /// Get: op-check, fetch, object check on the entity.
    ///
    /// # Errors
    /// Any pipeline step failure.
    #[instrument(
        skip_all,
        fields(resource = <S::Kind as ResourceKind>::NAME, operation = "detail", id = tracing::field::Empty)
    )]
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: Result<S::Id, GateError>,
    ) -> Result<EntityOf<S>, GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), Op::DETAIL)?;
        let id = id?;
        record_id(&id);
        let entity = self.fetch(ctx, &id).await?;
        self.authorize_object(ctx, subject.as_ref(), Op::DETAIL, Target::Entity(&entity))?;
        debug!(state = "completed");
        Ok(entity)
    }

    /// List: op-check, object check on the filter, list and count.
    ///
    /// # Errors
    /// Any pipeline step failure.
    #[instrument(skip_all, fields(resource = <S::Kind as ResourceKind>::NAME, operation = "list"))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: Result<FilterOf<S>, GateError>,
    ) -> Result<Listing<EntityOf<S>>, GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), Op::LIST)?;
        let filter = filter?;
        self.authorize_object(ctx, subject.as_ref(), Op::LIST, Target::Filter(&filter))?;
        checkpoint(ctx)?;

        let (items, total) =
            tokio::try_join!(self.store.list(&filter), self.store.count(&filter))?;
        debug!(state = "completed", items = items.len(), total);
        Ok(Listing { items, total })
    }

    /// Update: op-check, fetch, object check on the current entity, store,
    /// notify with the updated entity.
    ///
    /// # Errors
    /// Any pipeline step failure; notification failures are not reported.
    #[instrument(
        skip_all,
        fields(resource = <S::Kind as ResourceKind>::NAME, operation = "update", id = tracing::field::Empty)
    )]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        patch: Result<S::Update, GateError>,
    ) -> Result<EntityOf<S>, GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), Op::UPDATE)?;
        let patch = patch?;
        let id = S::update_target(&patch);
        record_id(&id);
        let current = self.fetch(ctx, &id).await?;
        self.authorize_object(ctx, subject.as_ref(), Op::UPDATE, Target::Entity(&current))?;
        checkpoint(ctx)?;

        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        detach(async move {
            let updated = store.update(patch).await?;
            debug!(state = "mutated", "store.update completed");
            Ok(emit(sink.as_ref(), EventOperation::Updated, &id, updated).await)
        })
        .await
    }

    /// Delete: op-check, fetch, object check on the entity, store, notify
    /// with the removed entity.
    ///
    /// # Errors
    /// Any pipeline step failure; notification failures are not reported.
    #[instrument(
        skip_all,
        fields(resource = <S::Kind as ResourceKind>::NAME, operation = "delete", id = tracing::field::Empty)
    )]
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: Result<S::Id, GateError>,
    ) -> Result<(), GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), Op::DELETE)?;
        let id = id?;
        record_id(&id);
        let entity = self.fetch(ctx, &id).await?;
        self.authorize_object(ctx, subject.as_ref(), Op::DELETE, Target::Entity(&entity))?;
        checkpoint(ctx)?;

        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        detach(async move {
            store.delete(&id).await?;
            debug!(state = "mutated", "store.delete completed");
            emit(sink.as_ref(), EventOperation::Deleted, &id, entity).await;
            Ok(())
        })
        .await
    }

    /// Authenticate and run the operation-level chain only.
    ///
    /// For surfaces outside the CRUD pipelines, such as an event stream.
    ///
    /// # Errors
    /// `BadToken`, `PermissionDenied` or `Cancelled`.
    #[instrument(skip_all, fields(resource = <S::Kind as ResourceKind>::NAME, operation = op.as_str()))]
    pub async fn authorize(
        &self,
        ctx: &RequestContext,
        op: Op,
    ) -> Result<Option<Subject>, GateError> {
        let subject = self.authenticate(ctx).await?;
        self.authorize_operation(ctx, subject.as_ref(), op)?;
        Ok(subject)
    }

    async fn authenticate(&self, ctx: &RequestContext) -> Result<Option<Subject>, GateError> {
        checkpoint(ctx)?;
        match self.verifier.verify(ctx.token()).await {
            Ok(subject) => {
                debug!(
                    state = "authenticated",
                    anonymous = subject.is_none(),
                    subject = subject.as_ref().map(Subject::id)
                );
                Ok(subject)
            }
            Err(e) => {
                debug!(state = "error", error = %e, "authentication failed");
                Err(e.into())
            }
        }
    }

    fn authorize_operation(
        &self,
        ctx: &RequestContext,
        subject: Option<&Subject>,
        op: Op,
    ) -> Result<(), GateError> {
        checkpoint(ctx)?;
        self.evaluator.has_permission(subject, op)?;
        debug!(state = "operation_authorized", operation = op.as_str());
        Ok(())
    }

    fn authorize_object(
        &self,
        ctx: &RequestContext,
        subject: Option<&Subject>,
        op: Op,
        target: Target<'_, S::Kind>,
    ) -> Result<(), GateError> {
        checkpoint(ctx)?;
        self.evaluator.has_object_permission(subject, op, target)?;
        debug!(state = "object_authorized", operation = op.as_str());
        Ok(())
    }

    async fn fetch(&self, ctx: &RequestContext, id: &S::Id) -> Result<EntityOf<S>, GateError> {
        checkpoint(ctx)?;
        let entity = self.store.get(id).await?;
        debug!(state = "business_invoked", "store.get completed");
        Ok(entity)
    }
}

fn record_id<I: fmt::Display>(id: &I) {
    tracing::Span::current().record("id", tracing::field::display(id));
}

fn checkpoint(ctx: &RequestContext) -> Result<(), GateError> {
    if ctx.cancellation().is_cancelled() {
        debug!(state = "error", "request cancelled before mutation");
        return Err(GateError::Cancelled);
    }
    Ok(())
}

/// Runs a mutation on its own task so that it, and its notification, finish
/// even if the caller stops polling.
async fn detach<T, F>(work: F) -> Result<T, GateError>
where
    F: Future<Output = Result<T, GateError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work.in_current_span())
        .await
        .map_err(|e| GateError::unexpected(format!("mutation task failed: {e}")))?
}

async fn emit<E, I>(
    sink: &dyn NotificationSink<E>,
    operation: EventOperation,
    resource_id: &I,
    resource: E,
) -> E
where
    E: Send + Sync,
    I: fmt::Display + ?Sized,
{
    let event = ResourceEvent::new(operation, resource);
    match sink.send(&event).await {
        Ok(()) => debug!(state = "completed", %operation, "event sent"),
        Err(e) => error!(
            %operation,
            resource_id = %resource_id,
            error = %e,
            "can't send '{operation}' event"
        ),
    }
    event.resource
}

impl<S, Op> fmt::Debug for AuthorizationGate<S, Op>
where
    S: ResourceStore,
    Op: CrudOperation,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("resource", &<S::Kind as ResourceKind>::NAME)
            .field("evaluator", &self.evaluator)
            .finish_non_exhaustive()
    }
}
