use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use companies::api::rest::{ApiState, router};
use companies::{
    BroadcastSink, Company, FanoutSink, InMemoryCompanyRepository, LoggingSink, build_gate,
};
use gatekit::NotificationSink;
use gatekit::auth::JwtTokenVerifier;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;

/// Wires the verifier, policy, store and sinks into the HTTP router.
///
/// # Errors
/// Fails if the verification key cannot be loaded or a policy table is
/// incomplete.
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let verifier = JwtTokenVerifier::from_config(&config.auth)
        .context("failed to build token verifier")?;
    let repo = Arc::new(InMemoryCompanyRepository::new());

    let events = BroadcastSink::<Company>::new(config.server.events_capacity);
    let sinks: Vec<Arc<dyn NotificationSink<Company>>> =
        vec![Arc::new(LoggingSink), Arc::new(events.clone())];
    let sink: Arc<dyn NotificationSink<Company>> = Arc::new(FanoutSink::new(sinks));

    let gate = build_gate(
        Arc::new(verifier),
        &config.policy,
        repo,
        config.companies.clone(),
        sink,
    )
    .context("invalid policy configuration")?;

    Ok(router(ApiState { gate, events })
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)))
}

/// Serves until `cancel` fires, then drains in-flight requests.
///
/// # Errors
/// Fails if the app cannot be built or the listener cannot bind.
pub async fn run_server(config: AppConfig, cancel: CancellationToken) -> Result<()> {
    let app = build_app(&config)?;
    let listener = TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(addr = %listener.local_addr()?, "companies-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("server error")?;

    info!("companies-server stopped");
    Ok(())
}
