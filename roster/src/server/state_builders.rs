//! Builders wiring outbound adapters into handler state.
//!
//! The row-store is optional: when the spreadsheet cannot be opened the
//! service still starts and reports the store as unavailable.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::{error, info, warn};
use url::Url;

use roster::domain::ports::{MemberSelections, RoleStatistics, RowStoreError};
use roster::domain::{RoleStatisticsService, SelectionRegistry};
use roster::inbound::http::signature::{InteractionVerifier, PublicKeyError};
use roster::inbound::http::state::{HttpState, HttpStatePorts};
use roster::outbound::discord::{DISCORD_API_BASE, DiscordRest};
use roster::outbound::sheets::{
    METADATA_TOKEN_URL, MetadataTokenSource, SheetsClient, SheetsEndpoints, StaticTokenFile,
    TokenSource, open_roster_sheets,
};
use roster::settings::{RosterSettings, SettingsError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration is missing or malformed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The interaction public key is unusable.
    #[error(transparent)]
    PublicKey(#[from] PublicKeyError),
    /// A built-in endpoint URL failed to parse.
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    /// An HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The row-store could not be reached or prepared.
    #[error(transparent)]
    RowStore(#[from] RowStoreError),
    /// Binding or running the listener failed.
    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

type StorePorts = (Arc<dyn MemberSelections>, Arc<dyn RoleStatistics>);

fn token_source(
    settings: &RosterSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn TokenSource>, StartupError> {
    match &settings.sheets_token_file {
        Some(path) => Ok(Arc::new(StaticTokenFile::open(path)?)),
        None => Ok(Arc::new(MetadataTokenSource::new(
            Url::parse(METADATA_TOKEN_URL)?,
            REQUEST_TIMEOUT,
            clock,
        )?)),
    }
}

async fn open_store(
    settings: &RosterSettings,
    clock: Arc<dyn Clock>,
) -> Result<StorePorts, StartupError> {
    let tokens = token_source(settings, clock.clone())?;
    let client = Arc::new(SheetsClient::new(
        SheetsEndpoints::google()?,
        tokens,
        REQUEST_TIMEOUT,
    )?);
    let sheets = open_roster_sheets(client, &settings.spreadsheet_locator()?).await?;
    info!(
        spreadsheet_id = sheets.selections.spreadsheet_id(),
        "row-store opened"
    );

    let selections = Arc::new(sheets.selections);
    let registry = SelectionRegistry::new(selections.clone(), clock.clone());
    let statistics = RoleStatisticsService::new(selections, Arc::new(sheets.summary), clock);
    if let Err(err) = statistics.refresh().await {
        warn!(error = %err, "initial role summary refresh failed");
    }
    Ok((Arc::new(registry), Arc::new(statistics)))
}

/// Register the slash commands, in the configured guild or globally.
///
/// # Errors
///
/// Returns [`StartupError`] when the application id is missing or the REST
/// client cannot be built. Rejections by the platform are logged only.
pub async fn sync_commands(settings: &RosterSettings) -> Result<(), StartupError> {
    let rest = DiscordRest::new(
        Url::parse(DISCORD_API_BASE)?,
        settings.application_id()?,
        settings.discord_bot_token.clone(),
        REQUEST_TIMEOUT,
    )?;
    match rest.register_commands(settings.guild_id.as_deref()).await {
        Ok(count) => info!(count, guild_id = ?settings.guild_id, "commands registered"),
        Err(err) => error!(error = %err, "command registration failed"),
    }
    Ok(())
}

/// Build handler state from settings, opening the row-store best effort.
///
/// # Errors
///
/// Returns [`StartupError`] when the public key or application id is
/// missing or malformed, or the REST client cannot be built.
pub async fn build_http_state(settings: &RosterSettings) -> Result<HttpState, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let verifier = InteractionVerifier::from_hex(settings.public_key()?)?;
    let followup = Arc::new(DiscordRest::new(
        Url::parse(DISCORD_API_BASE)?,
        settings.application_id()?,
        None,
        REQUEST_TIMEOUT,
    )?);

    let (selections, statistics) = match open_store(settings, clock.clone()).await {
        Ok((selections, statistics)) => (Some(selections), Some(statistics)),
        Err(err) => {
            error!(error = %err, "row-store unavailable; starting without it");
            (None, None)
        }
    };

    let ports = HttpStatePorts {
        selections,
        statistics,
        followup,
    };
    Ok(HttpState::new(
        ports,
        settings.access_policy(),
        verifier,
        clock,
    ))
}
