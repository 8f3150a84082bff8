//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ROSTER_*` environment variables or a config
//! file. Unset restrictions disable the corresponding check.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::AccessPolicy;
use crate::outbound::sheets::SpreadsheetLocator;

const DEFAULT_SPREADSHEET_NAME: &str = "WoW Class Management";
const DEFAULT_HIDDEN_COLUMNS: &str = "1,8,9";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings that are missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required key has no value.
    #[error("missing required setting {key}")]
    Missing {
        /// Setting name.
        key: &'static str,
    },
    /// A value could not be parsed.
    #[error("invalid value for {key}: {value}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Configuration for the interactions service and the command registrar.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// Hex Ed25519 key verifying interaction signatures.
    pub discord_public_key: Option<String>,
    /// Application id used for follow-ups and command registration.
    pub discord_application_id: Option<String>,
    /// Bot token used for command registration.
    pub discord_bot_token: Option<String>,
    /// Guild to register commands in; global when absent.
    pub guild_id: Option<String>,
    /// Designated channel id.
    pub channel_id: Option<String>,
    /// Role id required for member commands.
    pub required_role: Option<String>,
    /// Role id required for the removal command.
    pub admin_role: Option<String>,
    /// Spreadsheet title for open-or-create.
    pub spreadsheet_name: Option<String>,
    /// Explicit spreadsheet id.
    pub spreadsheet_id: Option<String>,
    /// File holding an OAuth bearer token for the Sheets API.
    pub sheets_token_file: Option<PathBuf>,
    /// Comma separated 1-based columns hidden in the selection worksheet.
    pub hidden_columns: Option<String>,
    /// HTTP listen address.
    pub bind_addr: Option<String>,
    /// Register commands at startup.
    #[ortho_config(default = false)]
    pub sync_commands: bool,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(str::to_owned)
}

impl RosterSettings {
    /// Public key text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset.
    pub fn public_key(&self) -> Result<&str, SettingsError> {
        self.discord_public_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::Missing {
                key: "discord_public_key",
            })
    }

    /// Application id.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset.
    pub fn application_id(&self) -> Result<&str, SettingsError> {
        self.discord_application_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(SettingsError::Missing {
                key: "discord_application_id",
            })
    }

    /// Configured restrictions; blank values count as unset.
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            channel_id: non_empty(self.channel_id.as_ref()),
            required_role: non_empty(self.required_role.as_ref()),
            admin_role: non_empty(self.admin_role.as_ref()),
        }
    }

    /// Spreadsheet title, falling back to the default.
    pub fn spreadsheet_name(&self) -> &str {
        self.spreadsheet_name
            .as_deref()
            .unwrap_or(DEFAULT_SPREADSHEET_NAME)
    }

    /// Columns to hide, falling back to the default set.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when an entry is not a positive
    /// integer.
    pub fn hidden_columns(&self) -> Result<Vec<u32>, SettingsError> {
        let raw = self
            .hidden_columns
            .as_deref()
            .unwrap_or(DEFAULT_HIDDEN_COLUMNS);
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.parse::<u32>() {
                Ok(column) if column > 0 => Ok(column),
                _ => Err(SettingsError::Invalid {
                    key: "hidden_columns",
                    value: raw.to_owned(),
                }),
            })
            .collect()
    }

    /// Where to find the spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the hidden columns are malformed.
    pub fn spreadsheet_locator(&self) -> Result<SpreadsheetLocator, SettingsError> {
        Ok(SpreadsheetLocator {
            spreadsheet_id: non_empty(self.spreadsheet_id.as_ref()),
            spreadsheet_name: self.spreadsheet_name().to_owned(),
            hidden_columns: self.hidden_columns()?,
        })
    }

    /// Listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::Invalid {
            key: "bind_addr",
            value: raw.to_owned(),
        })
    }
}
