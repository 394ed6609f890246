mod api;
mod config;
mod logging;
mod services;
mod web;

use std::time::Duration;

use color_eyre::Result;
use domain::SimulatedGateway;
use domain::core::Portal;

use crate::config::AppConfig;
use crate::services::PortalHandle;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Initialize logging
    logging::init()?;
    tracing::info!("Starting JobPortal application");

    let config = AppConfig::from_env()?;
    tracing::debug!("Configuration: {config:#?}");

    let portal = Portal::with_gateway(
        SimulatedGateway::new(config.submit_delay()),
        config.redirect_delay(),
    );
    let state = PortalHandle::new(portal, config.session_ttl());
    let sweeper = state.sessions().spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let app = api::create_api(state.clone()).merge(web::create_app(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    sweeper.abort();

    Ok(())
}
