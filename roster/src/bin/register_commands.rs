//! Register the bot's slash commands with the chat platform.
//!
//! Reads the same `ROSTER_*` settings as the service and replaces the
//! application's command set in the configured guild, or globally.

use std::process::ExitCode;
use std::time::Duration;

use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use roster::outbound::discord::{DISCORD_API_BASE, DiscordRest};
use roster::settings::RosterSettings;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = match RosterSettings::load() {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "configuration failed to load");
            return ExitCode::FAILURE;
        }
    };
    let application_id = match settings.application_id() {
        Ok(id) => id,
        Err(err) => {
            error!(error = %err, "cannot register commands");
            return ExitCode::FAILURE;
        }
    };
    let api_base = match Url::parse(DISCORD_API_BASE) {
        Ok(url) => url,
        Err(err) => {
            error!(error = %err, "invalid API base");
            return ExitCode::FAILURE;
        }
    };
    let rest = match DiscordRest::new(
        api_base,
        application_id,
        settings.discord_bot_token.clone(),
        Duration::from_secs(10),
    ) {
        Ok(rest) => rest,
        Err(err) => {
            error!(error = %err, "http client setup failed");
            return ExitCode::FAILURE;
        }
    };

    match rest.register_commands(settings.guild_id.as_deref()).await {
        Ok(count) => {
            info!(count, guild_id = ?settings.guild_id, "commands registered");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "command registration failed");
            ExitCode::FAILURE
        }
    }
}
