//! Reqwest-backed Discord REST adapter.
//!
//! Covers the two calls the bot makes outside an interaction response:
//! editing a deferred response and bulk-overwriting slash commands.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::CommandKind;
use crate::domain::ports::{ChatRestError, InteractionFollowup};
use crate::outbound::sheets::body_preview;

/// Default Discord API base URL.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const USER_OPTION_TYPE: u8 = 6;
const CHAT_INPUT_COMMAND: u8 = 1;

/// Discord REST client scoped to one application.
pub struct DiscordRest {
    http: Client,
    api_base: Url,
    application_id: String,
    bot_token: Option<Zeroizing<String>>,
}

impl DiscordRest {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        api_base: Url,
        application_id: impl Into<String>,
        bot_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base,
            application_id: application_id.into(),
            bot_token: bot_token.map(Zeroizing::new),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ChatRestError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ChatRestError::decode(format!("{} cannot be a base URL", self.api_base)))?
            .extend(segments);
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<Vec<u8>, ChatRestError> {
        let response = request
            .send()
            .await
            .map_err(|error| ChatRestError::transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ChatRestError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(ChatRestError::rejected(status.as_u16(), body_preview(body.as_ref())));
        }
        Ok(body.to_vec())
    }

    /// Replace the application's commands, in `guild_id` when given or
    /// globally otherwise. Returns the number of registered commands.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRestError`] when no bot token is configured or the
    /// platform refuses the request.
    pub async fn register_commands(&self, guild_id: Option<&str>) -> Result<usize, ChatRestError> {
        let token = self
            .bot_token
            .as_ref()
            .ok_or_else(|| ChatRestError::rejected(401_u16, "bot token not configured"))?;
        let url = match guild_id {
            Some(guild) => self.url(&[
                "applications",
                &self.application_id,
                "guilds",
                guild,
                "commands",
            ])?,
            None => self.url(&["applications", &self.application_id, "commands"])?,
        };

        let body = Self::send(
            self.http
                .put(url)
                .header(reqwest::header::AUTHORIZATION, format!("Bot {}", token.as_str()))
                .json(&command_definitions()),
        )
        .await?;
        let registered: Vec<Value> = serde_json::from_slice(&body)
            .map_err(|error| ChatRestError::decode(format!("invalid command list: {error}")))?;
        Ok(registered.len())
    }
}

#[async_trait]
impl InteractionFollowup for DiscordRest {
    async fn edit_original(&self, token: &str, message: Value) -> Result<(), ChatRestError> {
        let url = self.url(&[
            "webhooks",
            &self.application_id,
            token,
            "messages",
            "@original",
        ])?;
        Self::send(self.http.patch(url).json(&message)).await?;
        debug!("edited deferred interaction response");
        Ok(())
    }
}

/// Slash-command definitions in registration order.
pub fn command_definitions() -> Vec<Value> {
    CommandKind::ALL
        .into_iter()
        .map(|command| {
            let mut definition = json!({
                "name": command.name(),
                "description": command.description(),
                "type": CHAT_INPUT_COMMAND,
            });
            if command == CommandKind::AdminRemoveSelection {
                definition["options"] = json!([{
                    "type": USER_OPTION_TYPE,
                    "name": "user",
                    "description": "The user whose class selection to remove",
                    "required": true,
                }]);
            }
            definition
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest() -> DiscordRest {
        DiscordRest::new(
            Url::parse(DISCORD_API_BASE).expect("base url"),
            "1234",
            None,
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[test]
    fn followup_url_targets_the_original_message() {
        let url = rest()
            .url(&["webhooks", "1234", "tok", "messages", "@original"])
            .expect("url builds");

        assert_eq!(
            url.as_str(),
            "https://discord.com/api/v10/webhooks/1234/tok/messages/@original"
        );
    }

    #[test]
    fn removal_command_requires_a_user_option() {
        let definitions = command_definitions();

        assert_eq!(definitions.len(), CommandKind::ALL.len());
        let removal = definitions
            .iter()
            .find(|definition| definition["name"] == "removeuser")
            .expect("removeuser defined");
        assert_eq!(removal["options"][0]["name"], "user");
        assert_eq!(removal["options"][0]["required"], true);
        assert!(
            definitions
                .iter()
                .filter(|definition| definition["name"] != "removeuser")
                .all(|definition| definition.get("options").is_none())
        );
    }

    #[tokio::test]
    async fn registration_requires_a_bot_token() {
        let error = rest().register_commands(None).await.expect_err("no token");

        assert!(matches!(error, ChatRestError::Rejected { status: 401, .. }));
    }
}
