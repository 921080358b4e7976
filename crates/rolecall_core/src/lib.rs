//! Core data types for the Rolecall role selector.
//!
//! This crate holds the shapes every other Rolecall crate agrees on: role entries,
//! the per-guild selector config with its dirty-field tracking, reaction events,
//! rendered selectors, and the collaborator traits for the durable store
//! ([`EntryRepository`], [`ConfigRepository`]) and the chat platform ([`Gateway`]).
//!
//! In-memory repositories are included for tests and local experimentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entry;
mod event;
mod gateway;
mod ids;
mod memory;
mod render;
mod repository;

pub use config::{ConfigChanges, ConfigField, SelectorConfig};
pub use entry::{EntryField, NewRoleEntry, RoleEntry};
pub use event::ReactionEvent;
pub use gateway::{Gateway, GuildRole, MemberSnapshot};
pub use ids::{ChannelId, EntryId, GuildId, MessageId, RoleId, UserId};
pub use memory::{InMemoryConfigRepository, InMemoryEntryRepository};
pub use render::{Notice, RenderedSelector, SelectorField};
pub use repository::{ConfigRepository, EntryRepository};
