use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use futures_util::Stream;
use gatekit::{GateError, ResourceEvent};
use http::HeaderMap;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{info, warn};

use super::ApiState;
use super::dto::event_dto;
use super::handlers::request_context;
use crate::domain::model::Company;
use crate::domain::ops::CompanyOperation;
use crate::domain::repo::CompanyRepository;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// `GET /companies/events`: server-sent stream of company mutations.
///
/// Subscribing is a list-level read, so it is allowed exactly when the
/// caller may list companies.
pub(super) async fn company_events<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);
    state
        .gate
        .authorize(&ctx, CompanyOperation::CompanyList)
        .await?;

    info!("New SSE connection for company events");
    let stream = BroadcastStream::new(state.events.subscribe())
        .filter_map(to_sse_event)
        .map(Ok);
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE)))
}

fn to_sse_event(
    received: Result<ResourceEvent<Company>, BroadcastStreamRecvError>,
) -> Option<Event> {
    let event = match received {
        Ok(event) => event,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "SSE subscriber lagged; events dropped");
            return None;
        }
    };
    let operation = event.operation;
    match Event::default()
        .event(operation.as_str())
        .json_data(event_dto(operation, event.resource))
    {
        Ok(sse) => Some(sse),
        Err(e) => {
            warn!(error = %e, "failed to encode SSE event");
            None
        }
    }
}
