//! Edits on a guild's ordered entry list.

use crate::EntryStore;
use rolecall_core::{ConfigField, EntryField, EntryId, SelectorConfig};
use rolecall_error::{SelectorError, SelectorErrorKind, SelectorResult};
use tracing::debug;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Towards the top of the selector
    Up,
    /// Towards the bottom of the selector
    Down,
}

/// Operations on the ordered `roles` list of a draft config.
///
/// All operations act on a draft obtained from the
/// [`ConfigRegistry`](crate::ConfigRegistry) and leave persistence to
/// [`ConfigRegistry::commit`](crate::ConfigRegistry::commit). A rejected
/// operation leaves the draft unchanged.
///
/// # Examples
///
/// ```
/// use rolecall_core::{GuildId, SelectorConfig};
/// use rolecall_selector::{Direction, OrderEditor};
///
/// let mut draft = SelectorConfig::new(GuildId(1));
/// OrderEditor::append(&mut draft, 1).unwrap();
/// OrderEditor::append(&mut draft, 2).unwrap();
/// OrderEditor::move_entry(&mut draft, 2, Direction::Up).unwrap();
/// assert_eq!(draft.roles(), &vec![2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderEditor;

impl OrderEditor {
    /// Add `entry_id` at the end.
    pub fn append(config: &mut SelectorConfig, entry_id: EntryId) -> SelectorResult<()> {
        if config.contains(entry_id) {
            return Err(SelectorError::new(SelectorErrorKind::Conflict(
                "Role already in the role selector.".to_string(),
            )));
        }
        config.roles_mut().push(entry_id);
        Ok(())
    }

    /// Drop `entry_id` from the list.
    pub fn remove(config: &mut SelectorConfig, entry_id: EntryId) -> SelectorResult<()> {
        let index = config.position(entry_id).ok_or_else(not_registered)?;
        config.roles_mut().remove(index);
        Ok(())
    }

    /// Swap `entry_id` with its neighbour in `direction`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the entry is not listed, `Boundary` if it is the only entry
    /// or already at the edge it is moving towards.
    pub fn move_entry(
        config: &mut SelectorConfig,
        entry_id: EntryId,
        direction: Direction,
    ) -> SelectorResult<()> {
        let index = config.position(entry_id).ok_or_else(not_registered)?;
        let len = config.roles().len();

        if len < 2 {
            return Err(boundary("Role is the only role registered."));
        }

        let target = match direction {
            Direction::Up if index == 0 => return Err(boundary("Role is already first.")),
            Direction::Down if index + 1 == len => {
                return Err(boundary("Role is already last."));
            }
            Direction::Up => index - 1,
            Direction::Down => index + 1,
        };

        config.roles_mut().swap(index, target);
        debug!(entry_id, %direction, from = index, to = target, "Moved entry");
        Ok(())
    }

    /// Edit one field of a listed entry.
    ///
    /// The entry row is written immediately. The draft's `roles` is marked dirty
    /// so the commit re-validates that every listed entry still resolves.
    pub async fn edit_field(
        entries: &EntryStore,
        config: &mut SelectorConfig,
        entry_id: EntryId,
        field: EntryField,
        value: &str,
    ) -> SelectorResult<()> {
        if !config.contains(entry_id) {
            return Err(not_registered());
        }
        entries.edit(entry_id, field, value).await?;
        config.mark_dirty(ConfigField::Roles);
        Ok(())
    }
}

#[track_caller]
fn not_registered() -> SelectorError {
    SelectorError::new(SelectorErrorKind::NotFound(
        "Role not registered.".to_string(),
    ))
}

#[track_caller]
fn boundary(message: &str) -> SelectorError {
    SelectorError::new(SelectorErrorKind::Boundary(message.to_string()))
}
