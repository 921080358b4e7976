//! Rolecall: a Discord reaction role selector.
//!
//! Moderators register roles with an emoji each and publish a selector message;
//! members react to grant themselves a role and react again to drop it.
//!
//! This crate hosts the binary's configuration and logging setup. The selector
//! itself lives in `rolecall_selector`, storage in `rolecall_database`, and the
//! Discord wiring in `rolecall_social`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use config::RolecallConfig;
pub use observability::{ObservabilityConfig, init_observability};
