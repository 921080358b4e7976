//! Ordered role registry and reaction reconciliation.
//!
//! This crate is the heart of Rolecall. It keeps three things consistent: the
//! ordered list of role entries a guild configured, the live selector message and
//! its reactions, and the roles each member holds.
//!
//! # Components
//!
//! - [`EntryStore`] - validated access to role entries
//! - [`ConfigRegistry`] - process-wide per-guild configs, one writer per guild
//! - [`OrderEditor`] - append/remove/move/edit on a guild's ordered list
//! - [`SelectorPublisher`] - renders and (re)publishes the selector message
//! - [`ReactionReconciler`] - toggles roles from reaction events
//! - [`ReactionDispatcher`] - one ordered reconciliation worker per guild
//! - [`SelectorCommands`] - the moderator command surface
//!
//! # Concurrency
//!
//! Every config mutation runs while holding the guild's mutex from the
//! [`ConfigRegistry`]. Mutations are made on a cloned draft and only installed
//! after the durable write succeeds, so a failed write never leaves the live
//! config half-changed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commands;
mod dispatcher;
mod entry_store;
mod order;
mod publisher;
mod reconciler;
mod registry;

pub use commands::{SelectorCommands, SelectorSettings};
pub use dispatcher::ReactionDispatcher;
pub use entry_store::EntryStore;
pub use order::{Direction, OrderEditor};
pub use publisher::{PublishReport, SelectorPublisher};
pub use reconciler::{
    ADDED_REASON, IgnoreReason, REMOVED_REASON, ReactionOutcome, ReactionReconciler,
};
pub use registry::{ConfigGuard, ConfigRegistry};
