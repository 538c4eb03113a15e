use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use gatekit::auth::extract_bearer_token;
use gatekit::{GateError, RequestContext};
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, StatusCode};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::info;
use uuid::Uuid;

use super::ApiState;
use super::dto::{CompanyDto, CreateCompanyReq, ListCompaniesQuery, UpdateCompanyReq};
use crate::domain::model::{CompanyCreate, CompanyFilter};
use crate::domain::repo::CompanyRepository;

/// Response header carrying the unpaged total of a list request.
pub const COUNT_HEADER: HeaderName = HeaderName::from_static("count");

/// Builds the gate context for one request.
///
/// The returned guard cancels the context when the handler future is
/// dropped, e.g. because the client went away.
pub(super) fn request_context(headers: &HeaderMap) -> (RequestContext, DropGuard) {
    let cancel = CancellationToken::new();
    let ctx = RequestContext::new(extract_bearer_token(headers).map(str::to_owned))
        .with_cancellation(cancel.clone());
    (ctx, cancel.drop_guard())
}

fn parse_id(raw: &str) -> Result<Uuid, GateError> {
    Uuid::parse_str(raw).map_err(|_| GateError::validation("id", "must be a valid UUID"))
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, GateError> {
    body.map(|Json(req)| req)
        .map_err(|e| GateError::validation("body", e.body_text()))
}

fn parse_filter(
    query: Result<Query<ListCompaniesQuery>, QueryRejection>,
) -> Result<CompanyFilter, GateError> {
    let Query(query) = query.map_err(|e| GateError::validation("query", e.body_text()))?;
    Ok(CompanyFilter::try_from(query)?)
}

pub(super) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(super) async fn create_company<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
    body: Result<Json<CreateCompanyReq>, JsonRejection>,
) -> Result<(StatusCode, Json<CompanyDto>), GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);
    let payload = parse_body(body).map(CompanyCreate::from);

    let company = state.gate.create(&ctx, payload).await?;
    info!(company_id = %company.id, "Created company via REST");
    Ok((StatusCode::CREATED, Json(company.into())))
}

pub(super) async fn list_companies<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
    query: Result<Query<ListCompaniesQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<CompanyDto>>), GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);

    let listing = state.gate.list(&ctx, parse_filter(query)).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(COUNT_HEADER, HeaderValue::from(listing.total));
    let items = listing.items.into_iter().map(CompanyDto::from).collect();
    Ok((response_headers, Json(items)))
}

pub(super) async fn get_company<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CompanyDto>, GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);

    let company = state.gate.get(&ctx, parse_id(&id)).await?;
    Ok(Json(company.into()))
}

pub(super) async fn update_company<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<UpdateCompanyReq>, JsonRejection>,
) -> Result<Json<CompanyDto>, GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);
    let patch = parse_id(&id)
        .and_then(|id| parse_body(body).map(|req: UpdateCompanyReq| req.into_update(id)));

    let company = state.gate.update(&ctx, patch).await?;
    Ok(Json(company.into()))
}

pub(super) async fn delete_company<R: CompanyRepository>(
    State(state): State<ApiState<R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, GateError> {
    let (ctx, _cancel_on_drop) = request_context(&headers);

    state.gate.delete(&ctx, parse_id(&id)).await?;
    info!(company_id = %id, "Deleted company via REST");
    Ok(StatusCode::NO_CONTENT)
}
