use axum::Router;
use axum::routing::{get, post};

use super::{ApiState, events, handlers};
use crate::domain::repo::CompanyRepository;

/// All company routes plus `/health`, bound to `state`.
#[must_use]
pub fn router<R: CompanyRepository>(state: ApiState<R>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/companies",
            post(handlers::create_company::<R>).get(handlers::list_companies::<R>),
        )
        .route("/companies/events", get(events::company_events::<R>))
        .route(
            "/companies/{id}",
            get(handlers::get_company::<R>)
                .patch(handlers::update_company::<R>)
                .delete(handlers::delete_company::<R>),
        )
        .with_state(state)
}
