//! Inbound interaction payload DTOs.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! platform payload is ignored.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::error::InboundError;
use crate::domain::{CallerContext, MemberId, MemberProfile};

/// Interaction kinds the endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Endpoint liveness check from the platform.
    Ping,
    /// Slash command invocation.
    ApplicationCommand,
    /// Select menu or button press.
    MessageComponent,
    /// Modal form submission.
    ModalSubmit,
    /// Anything else, such as autocomplete.
    Unsupported(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            5 => Self::ModalSubmit,
            other => Self::Unsupported(other),
        }
    }
}

/// Platform user object.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    /// Snowflake identifier.
    pub id: String,
    /// Account handle.
    pub username: String,
    /// Profile display name.
    #[serde(default)]
    pub global_name: Option<String>,
}

/// Guild member wrapper present for guild interactions.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMemberDto {
    /// Underlying user.
    #[serde(default)]
    pub user: Option<UserDto>,
    /// Role identifiers held in the guild.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Guild nickname.
    #[serde(default)]
    pub nick: Option<String>,
}

/// Member fields resolved alongside a user option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialMemberDto {
    /// Guild nickname.
    #[serde(default)]
    pub nick: Option<String>,
}

/// One slash-command option.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOptionDto {
    /// Option name.
    pub name: String,
    /// Option value; user options carry the user id.
    #[serde(default)]
    pub value: Value,
}

/// Objects referenced by options, keyed by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedDto {
    /// Referenced users.
    #[serde(default)]
    pub users: HashMap<String, UserDto>,
    /// Guild data for referenced users.
    #[serde(default)]
    pub members: HashMap<String, PartialMemberDto>,
}

/// Submitted modal text input.
#[derive(Debug, Clone, Deserialize)]
pub struct TextInputDto {
    /// Input identifier.
    pub custom_id: String,
    /// Entered text.
    #[serde(default)]
    pub value: Option<String>,
}

/// Submitted modal row.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRowDto {
    /// Inputs in the row.
    #[serde(default)]
    pub components: Vec<TextInputDto>,
}

/// Command, component or modal data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionDataDto {
    /// Command name.
    #[serde(default)]
    pub name: Option<String>,
    /// Command options.
    #[serde(default)]
    pub options: Vec<CommandOptionDto>,
    /// Users and members referenced by options.
    #[serde(default)]
    pub resolved: ResolvedDto,
    /// Component or modal identifier.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Select menu choices.
    #[serde(default)]
    pub values: Vec<String>,
    /// Modal rows.
    #[serde(default)]
    pub components: Vec<ActionRowDto>,
}

/// Interaction webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionDto {
    /// Raw interaction type.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Continuation token for follow-ups.
    #[serde(default)]
    pub token: String,
    /// Channel the interaction originated in.
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Guild member, for guild interactions.
    #[serde(default)]
    pub member: Option<GuildMemberDto>,
    /// User, for direct-message interactions.
    #[serde(default)]
    pub user: Option<UserDto>,
    /// Payload specific to the interaction type.
    #[serde(default)]
    pub data: Option<InteractionDataDto>,
}

fn profile(user: &UserDto, nick: Option<&str>) -> Result<MemberProfile, InboundError> {
    let id = MemberId::new(user.id.as_str()).map_err(|_| InboundError::MissingCaller)?;
    let display_name = nick
        .or(user.global_name.as_deref())
        .unwrap_or(&user.username);
    Ok(MemberProfile::new(id, user.username.as_str(), display_name))
}

impl InteractionDto {
    /// Parsed interaction kind.
    pub fn kind(&self) -> InteractionKind {
        InteractionKind::from(self.kind)
    }

    /// Invoking member.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingCaller`] when neither a member nor a
    /// user is present.
    pub fn caller(&self) -> Result<MemberProfile, InboundError> {
        if let Some(member) = &self.member {
            if let Some(user) = &member.user {
                return profile(user, member.nick.as_deref());
            }
        }
        self.user
            .as_ref()
            .ok_or(InboundError::MissingCaller)
            .and_then(|user| profile(user, None))
    }

    /// Channel and roles used by the authorisation gate.
    pub fn caller_context(&self) -> CallerContext {
        CallerContext {
            channel_id: self.channel_id.clone(),
            role_ids: self
                .member
                .as_ref()
                .map(|member| member.roles.clone())
                .unwrap_or_default(),
        }
    }

    fn data(&self) -> Result<&InteractionDataDto, InboundError> {
        self.data.as_ref().ok_or(InboundError::MissingData("data"))
    }

    /// Slash-command name.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingData`] when the payload carries none.
    pub fn command_name(&self) -> Result<&str, InboundError> {
        self.data()?
            .name
            .as_deref()
            .ok_or(InboundError::MissingData("command name"))
    }

    /// Component or modal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingData`] when the payload carries none.
    pub fn custom_id(&self) -> Result<&str, InboundError> {
        self.data()?
            .custom_id
            .as_deref()
            .ok_or(InboundError::MissingData("custom_id"))
    }

    /// First value chosen in a select menu.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingData`] when nothing was selected.
    pub fn selected_value(&self) -> Result<&str, InboundError> {
        self.data()?
            .values
            .first()
            .map(String::as_str)
            .ok_or(InboundError::MissingData("selected value"))
    }

    /// Text entered in the modal input `custom_id`.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingData`] when the input is absent.
    pub fn text_input(&self, custom_id: &str) -> Result<&str, InboundError> {
        self.data()?
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find(|input| input.custom_id == custom_id)
            .and_then(|input| input.value.as_deref())
            .ok_or(InboundError::MissingData("text input"))
    }

    /// Member referenced by the user option `name`.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::MissingData`] when the option or its resolved
    /// user is absent.
    pub fn user_option(&self, name: &str) -> Result<MemberProfile, InboundError> {
        let data = self.data()?;
        let user_id = data
            .options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_str())
            .ok_or(InboundError::MissingData("user option"))?;
        let user = data
            .resolved
            .users
            .get(user_id)
            .ok_or(InboundError::MissingData("resolved user"))?;
        let nick = data
            .resolved
            .members
            .get(user_id)
            .and_then(|member| member.nick.as_deref());
        profile(user, nick)
    }
}
