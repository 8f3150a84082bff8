//! Interaction response payloads: envelopes, embeds and components.
//!
//! Builders produce the platform's JSON shapes directly; the handlers only
//! choose titles, colours and text.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Message flag hiding a response from everyone but the caller.
pub const EPHEMERAL: u64 = 1 << 6;

/// Embed accent colours.
pub mod colour {
    /// Informational prompts.
    pub const BLUE: u32 = 0x0099_ff;
    /// Successful outcomes.
    pub const GREEN: u32 = 0x00_ff00;
    /// Failures.
    pub const RED: u32 = 0xff_0000;
    /// Warnings and empty states.
    pub const ORANGE: u32 = 0xff_aa00;
    /// Cancellations.
    pub const GREY: u32 = 0x80_8080;
}

const PONG: u8 = 1;
const CHANNEL_MESSAGE: u8 = 4;
const DEFERRED_CHANNEL_MESSAGE: u8 = 5;
const DEFERRED_UPDATE_MESSAGE: u8 = 6;
const UPDATE_MESSAGE: u8 = 7;
const MODAL: u8 = 9;

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const STRING_SELECT: u8 = 3;
const TEXT_INPUT: u8 = 4;
const SHORT_TEXT: u8 = 1;

/// Button colours offered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Grey.
    Secondary,
    /// Red.
    Danger,
}

impl ButtonStyle {
    const fn code(self) -> u8 {
        match self {
            Self::Secondary => 2,
            Self::Danger => 4,
        }
    }
}

/// Embed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field shares a line with its neighbours.
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct EmbedFooter {
    text: String,
}

/// Rich embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

impl Embed {
    /// Embed with a title and accent colour.
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: Vec::new(),
            footer: None,
            timestamp: None,
        }
    }

    /// Set the body text.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer text.
    #[must_use]
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Stamp the embed with `at`.
    #[must_use]
    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[EmbedField] {
        &self.fields
    }
}

/// Message content, embeds and components.
///
/// `None` leaves a part untouched when editing; an empty list clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeds: Option<Vec<Embed>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u64>,
}

impl MessageBody {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Single-embed message.
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: Some(vec![embed]),
            ..Self::default()
        }
    }

    /// Replace an existing message with `content`, dropping embeds and
    /// components.
    pub fn replacement_text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Some(Vec::new()),
            components: Some(Vec::new()),
            flags: None,
        }
    }

    /// Replace an existing message with `embed`, dropping content and
    /// components.
    pub fn replacement_embed(embed: Embed) -> Self {
        Self {
            content: Some(String::new()),
            embeds: Some(vec![embed]),
            components: Some(Vec::new()),
            flags: None,
        }
    }

    /// Attach component rows.
    #[must_use]
    pub fn components(mut self, rows: Vec<Value>) -> Self {
        self.components = Some(rows);
        self
    }

    /// Show only to the caller.
    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(EPHEMERAL);
        self
    }

    /// Text content, if any.
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// First embed, if any.
    pub fn first_embed(&self) -> Option<&Embed> {
        self.embeds.as_ref().and_then(|embeds| embeds.first())
    }
}

/// Modal form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalBody {
    custom_id: String,
    title: String,
    components: Vec<Value>,
}

impl ModalBody {
    /// Modal with a single short text input.
    pub fn single_input(
        custom_id: impl Into<String>,
        title: impl Into<String>,
        input: Value,
    ) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: vec![action_row(vec![input])],
        }
    }
}

/// Response data variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Message body.
    Message(MessageBody),
    /// Modal form.
    Modal(ModalBody),
}

/// Immediate answer to an interaction webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ResponseData>,
}

impl InteractionResponse {
    /// Answer to a ping.
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }

    /// New message in reply to the interaction.
    pub fn message(body: MessageBody) -> Self {
        Self {
            kind: CHANNEL_MESSAGE,
            data: Some(ResponseData::Message(body)),
        }
    }

    /// Ephemeral text reply.
    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self::message(MessageBody::text(content).ephemeral())
    }

    /// Acknowledge now and post an ephemeral message later.
    pub fn deferred_ephemeral_message() -> Self {
        Self {
            kind: DEFERRED_CHANNEL_MESSAGE,
            data: Some(ResponseData::Message(MessageBody {
                flags: Some(EPHEMERAL),
                ..MessageBody::default()
            })),
        }
    }

    /// Acknowledge a component now and edit its message later.
    pub fn deferred_update() -> Self {
        Self {
            kind: DEFERRED_UPDATE_MESSAGE,
            data: None,
        }
    }

    /// Edit the message the component belongs to.
    pub fn update(body: MessageBody) -> Self {
        Self {
            kind: UPDATE_MESSAGE,
            data: Some(ResponseData::Message(body)),
        }
    }

    /// Open a modal form.
    pub fn modal(body: ModalBody) -> Self {
        Self {
            kind: MODAL,
            data: Some(ResponseData::Modal(body)),
        }
    }

    /// Raw response type.
    pub fn kind(&self) -> u8 {
        self.kind
    }

    /// Message body, when the response carries one.
    pub fn message_body(&self) -> Option<&MessageBody> {
        match &self.data {
            Some(ResponseData::Message(body)) => Some(body),
            _ => None,
        }
    }
}

/// Row holding up to five components.
pub fn action_row(components: Vec<Value>) -> Value {
    json!({ "type": ACTION_ROW, "components": components })
}

/// Select menu whose option labels double as values.
pub fn string_select<'a>(
    custom_id: &str,
    placeholder: &str,
    labels: impl IntoIterator<Item = &'a str>,
) -> Value {
    let options: Vec<Value> = labels
        .into_iter()
        .map(|label| json!({ "label": label, "value": label }))
        .collect();
    json!({
        "type": STRING_SELECT,
        "custom_id": custom_id,
        "placeholder": placeholder,
        "min_values": 1,
        "max_values": 1,
        "options": options,
    })
}

/// Clickable button.
pub fn button(custom_id: &str, label: &str, style: ButtonStyle) -> Value {
    json!({
        "type": BUTTON,
        "custom_id": custom_id,
        "label": label,
        "style": style.code(),
    })
}

/// Required single-line text input.
pub fn short_text_input(custom_id: &str, label: &str, placeholder: &str, max_length: usize) -> Value {
    json!({
        "type": TEXT_INPUT,
        "custom_id": custom_id,
        "style": SHORT_TEXT,
        "label": label,
        "placeholder": placeholder,
        "min_length": 1,
        "max_length": max_length,
        "required": true,
    })
}
