//! Member identity and user-supplied character names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a character name in characters.
pub const CHARACTER_NAME_MAX: usize = 50;

/// Validation errors for member-facing value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberValidationError {
    /// Member identifiers must not be blank.
    #[error("member id must not be empty")]
    EmptyId,
    /// Member identifiers must not carry surrounding whitespace.
    #[error("member id must not contain surrounding whitespace")]
    PaddedId,
    /// Character names must contain at least one visible character.
    #[error("character name must not be empty")]
    EmptyCharacterName,
    /// Character names are capped at [`CHARACTER_NAME_MAX`] characters.
    #[error("character name must be at most {max} characters")]
    CharacterNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Stable opaque identifier of a community member.
///
/// The chat platform issues numeric snowflakes, but the registry treats the
/// value as an opaque string and compares it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Validate and construct a [`MemberId`].
    ///
    /// # Errors
    ///
    /// Returns [`MemberValidationError`] when the value is blank or padded.
    pub fn new(id: impl Into<String>) -> Result<Self, MemberValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MemberValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(MemberValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MemberId> for String {
    fn from(value: MemberId) -> Self {
        value.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = MemberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text in-game character name, 1 to 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Validate and construct a [`CharacterName`].
    ///
    /// Surrounding whitespace is trimmed before the length check.
    ///
    /// # Errors
    ///
    /// Returns [`MemberValidationError`] when the trimmed name is empty or
    /// longer than [`CHARACTER_NAME_MAX`].
    ///
    /// # Examples
    /// ```
    /// use roster::domain::CharacterName;
    ///
    /// let name = CharacterName::new("  Thrall ").unwrap();
    /// assert_eq!(name.as_ref(), "Thrall");
    /// assert!(CharacterName::new("   ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, MemberValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(MemberValidationError::EmptyCharacterName);
        }
        if trimmed.chars().count() > CHARACTER_NAME_MAX {
            return Err(MemberValidationError::CharacterNameTooLong {
                max: CHARACTER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CharacterName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CharacterName> for String {
    fn from(value: CharacterName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CharacterName {
    type Error = MemberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity plus the denormalised display strings refreshed on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Stable identifier.
    pub id: MemberId,
    /// Account handle.
    pub handle: String,
    /// Name shown in the community.
    pub display_name: String,
}

impl MemberProfile {
    /// Bundle a member identity with its display strings.
    pub fn new(id: MemberId, handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            display_name: display_name.into(),
        }
    }
}
