//! Member selection rows as written to and read from the row-store.

use std::fmt;

use super::member::{CharacterName, MemberProfile};
use super::ports::RowPosition;
use super::records::SheetRecord;
use super::vocabulary::ClassSpec;

/// Provenance marker written into the notes column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionNote {
    /// First write for the member.
    Initial,
    /// In-place overwrite of an existing row.
    Updated,
    /// Blind append after the in-place path failed.
    Fallback,
}

impl SelectionNote {
    /// Text stored in the notes column.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial selection",
            Self::Updated => "Updated selection",
            Self::Fallback => "Selection (fallback)",
        }
    }
}

impl fmt::Display for SelectionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated selection ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSubmission {
    /// Member making the selection.
    pub member: MemberProfile,
    /// In-game character name.
    pub character: CharacterName,
    /// Class and specialisation pairing.
    pub pick: ClassSpec,
}

impl SelectionSubmission {
    /// Bundle the parts of a submission.
    pub fn new(member: MemberProfile, character: CharacterName, pick: ClassSpec) -> Self {
        Self {
            member,
            character,
            pick,
        }
    }

    /// Cells for the nine-column selection row.
    pub fn to_cells(&self, timestamp: &str, update_count: u32, note: SelectionNote) -> Vec<String> {
        vec![
            self.member.id.to_string(),
            self.member.handle.clone(),
            self.member.display_name.clone(),
            self.character.to_string(),
            self.pick.class().label().to_owned(),
            self.pick.spec().label().to_owned(),
            timestamp.to_owned(),
            update_count.to_string(),
            note.label().to_owned(),
        ]
    }
}

/// A selection row located in the row-store.
///
/// Fields hold the stored text verbatim; rows written by hand or by older
/// versions may not satisfy the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSelection {
    /// Store position the row was read from.
    pub position: RowPosition,
    /// In-game character name.
    pub character: String,
    /// Class label.
    pub class: String,
    /// Specialisation label.
    pub spec: String,
    /// Last write timestamp.
    pub last_updated: String,
    /// Raw update counter.
    pub update_count: String,
}

impl StoredSelection {
    /// Read the display fields from a record, substituting placeholders for
    /// missing columns.
    pub fn from_record(position: RowPosition, record: &SheetRecord) -> Self {
        Self {
            position,
            character: record.get_or("In-Game Name", "Unknown").to_owned(),
            class: record.get_or("Class", "Unknown").to_owned(),
            spec: record.get_or("Specialization", "Unknown").to_owned(),
            last_updated: record.get_or("Last Updated", "Unknown").to_owned(),
            update_count: record.get_or("Update Count", "1").to_owned(),
        }
    }
}

/// Next value of the update counter given the stored text.
///
/// Missing or non-numeric counters count as zero.
pub fn next_update_count(stored: Option<&str>) -> u32 {
    stored
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0)
        .saturating_add(1)
}
