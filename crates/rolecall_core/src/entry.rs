//! Role entries.

use crate::{EntryId, RoleId};
use serde::{Deserialize, Serialize};

/// A configured role: the role to toggle, the reaction that toggles it, and the
/// label shown on the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Surrogate key
    pub id: EntryId,
    /// Platform role granted or revoked
    pub role_id: RoleId,
    /// Trigger symbol (a single emoji)
    pub emoji: String,
    /// Display name on the selector
    pub name: String,
    /// Description shown under the name
    pub description: String,
}

/// Insertable role entry (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoleEntry {
    /// Platform role granted or revoked
    pub role_id: RoleId,
    /// Trigger symbol
    pub emoji: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
}

/// Single-field edits accepted on an existing entry.
///
/// Parsed case-insensitively from the moderator's input:
///
/// ```
/// use rolecall_core::EntryField;
///
/// assert_eq!("Emoji".parse::<EntryField>().unwrap(), EntryField::Emoji);
/// assert!("role_id".parse::<EntryField>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntryField {
    /// The trigger symbol
    Emoji,
    /// The display name
    Name,
    /// The description
    Description,
}

impl EntryField {
    /// Maximum length of a value for this field, in characters.
    pub fn max_chars(self) -> usize {
        match self {
            EntryField::Emoji => 8,
            EntryField::Name => 248,
            EntryField::Description => 1024,
        }
    }
}

impl RoleEntry {
    /// Returns a copy with `field` replaced by `value`.
    pub fn with_field(&self, field: EntryField, value: &str) -> Self {
        let mut entry = self.clone();
        match field {
            EntryField::Emoji => entry.emoji = value.to_string(),
            EntryField::Name => entry.name = value.to_string(),
            EntryField::Description => entry.description = value.to_string(),
        }
        entry
    }
}
