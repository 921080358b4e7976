//! Validated access to role entries.

use rolecall_core::{EntryField, EntryId, EntryRepository, NewRoleEntry, RoleEntry, RoleId};
use rolecall_error::{DatabaseError, SelectorError, SelectorErrorKind, SelectorResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Role entries with input validation in front of the durable store.
///
/// Names must be 1-248 characters, descriptions 1-1024, and trigger symbols a
/// single recognised emoji of at most 8 characters. `role_id` and the trigger
/// symbol are unique across every entry.
#[derive(Clone)]
pub struct EntryStore {
    repository: Arc<dyn EntryRepository>,
}

impl EntryStore {
    /// Wrap a repository.
    pub fn new(repository: Arc<dyn EntryRepository>) -> Self {
        Self { repository }
    }

    /// Register a new entry and return its id.
    ///
    /// # Errors
    ///
    /// `Validation` for bad lengths or an unknown emoji, `DuplicateEntry` if the
    /// role or the emoji is already registered.
    #[instrument(skip(self, name, description))]
    pub async fn add(
        &self,
        role_id: RoleId,
        emoji: &str,
        name: &str,
        description: &str,
    ) -> SelectorResult<EntryId> {
        let description = validate(EntryField::Description, description)?;
        let name = validate(EntryField::Name, name)?;
        let emoji = validate(EntryField::Emoji, emoji)?;

        let entry = NewRoleEntry {
            role_id,
            emoji,
            name,
            description,
        };

        let id = self
            .repository
            .insert(&entry)
            .await
            .map_err(duplicate_as_entry_error)?;

        info!(entry_id = id, "Role entry added");
        Ok(id)
    }

    /// Delete an entry.
    ///
    /// The caller removes the id from every selector config.
    #[instrument(skip(self))]
    pub async fn remove(&self, entry_id: EntryId) -> SelectorResult<()> {
        if !self.repository.delete(entry_id).await? {
            return Err(missing(entry_id));
        }
        info!("Role entry removed");
        Ok(())
    }

    /// Overwrite a single field.
    ///
    /// # Errors
    ///
    /// `Validation` on bad shape or length, `NotFound` if the entry is gone,
    /// `DuplicateEntry` if a new emoji is already used by another entry.
    #[instrument(skip(self, value))]
    pub async fn edit(&self, entry_id: EntryId, field: EntryField, value: &str) -> SelectorResult<()> {
        let value = validate(field, value)?;

        let updated = self
            .repository
            .update_field(entry_id, field, &value)
            .await
            .map_err(duplicate_as_entry_error)?;

        if !updated {
            return Err(missing(entry_id));
        }
        debug!(%field, "Role entry edited");
        Ok(())
    }

    /// Entries whose id is in `ids`, in no particular order.
    pub async fn list_by_ids(&self, ids: &[EntryId]) -> SelectorResult<Vec<RoleEntry>> {
        Ok(self.repository.fetch_by_ids(ids).await?)
    }

    /// The entry for `role_id`, restricted to `among`.
    pub async fn find_by_role(
        &self,
        role_id: RoleId,
        among: &[EntryId],
    ) -> SelectorResult<Option<RoleEntry>> {
        Ok(self.repository.find_by_role(role_id, among).await?)
    }

    /// The entry triggered by `emoji`, restricted to `among`.
    ///
    /// Variants of the same emoji, such as one missing its variation selector,
    /// match the stored form.
    pub async fn find_by_trigger(
        &self,
        emoji: &str,
        among: &[EntryId],
    ) -> SelectorResult<Option<RoleEntry>> {
        let emoji = emojis::get(emoji).map_or(emoji, |found| found.as_str());
        Ok(self.repository.find_by_emoji(emoji, among).await?)
    }

    /// Total number of entries.
    pub async fn count(&self) -> SelectorResult<i64> {
        Ok(self.repository.count().await?)
    }
}

fn missing(entry_id: EntryId) -> SelectorError {
    SelectorError::new(SelectorErrorKind::NotFound(format!(
        "Role entry {entry_id} does not exist."
    )))
}

#[track_caller]
fn duplicate_as_entry_error(err: DatabaseError) -> SelectorError {
    if !err.is_duplicate_key() {
        return err.into();
    }
    let message = if err.kind.to_string().contains("emoji") {
        "Emoji already used by another role."
    } else {
        "Role already added."
    };
    SelectorError::new(SelectorErrorKind::DuplicateEntry(message.to_string()))
}

/// Check a value against the bounds of `field` and return the form to store.
///
/// Emojis are stored in their fully qualified form so a trigger typed without
/// its variation selector still matches the reaction the platform reports.
pub(crate) fn validate(field: EntryField, value: &str) -> SelectorResult<String> {
    let chars = value.chars().count();
    match field {
        EntryField::Emoji => {
            let canonical = emojis::get(value)
                .map(|emoji| emoji.as_str())
                .filter(|emoji| emoji.chars().count() <= field.max_chars())
                .ok_or_else(|| SelectorError::validation("emoji", "Unknown emoji."))?;
            return Ok(canonical.to_string());
        }
        EntryField::Name => {
            if chars == 0 || chars > field.max_chars() {
                return Err(SelectorError::validation(
                    "name",
                    format!(
                        "Name has to be between 1 and {} characters long.",
                        field.max_chars()
                    ),
                ));
            }
        }
        EntryField::Description => {
            if chars == 0 || chars > field.max_chars() {
                return Err(SelectorError::validation(
                    "description",
                    format!(
                        "Description has to be between 1 and {} characters long.",
                        field.max_chars()
                    ),
                ));
            }
        }
    }
    Ok(value.to_string())
}
