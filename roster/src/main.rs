//! Service entry-point: loads settings, wires adapters and serves the
//! interactions webhook.

mod server;

use std::process::ExitCode;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roster::inbound::http::health::HealthState;
use roster::settings::RosterSettings;
use server::{ServerConfig, StartupError, build_http_state, create_server, sync_commands};

async fn run() -> Result<(), StartupError> {
    let settings = RosterSettings::load()
        .map_err(|err| std::io::Error::other(format!("configuration failed to load: {err}")))?;

    if settings.sync_commands {
        sync_commands(&settings).await?;
    }

    let http_state = build_http_state(&settings).await?;
    let bind_addr = settings.bind_addr()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(bind_addr, http_state),
    )?;
    info!(%bind_addr, "listening for interactions");

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "service stopped");
            ExitCode::FAILURE
        }
    }
}
