//! Discord integration for Rolecall.
//!
//! Provides the serenity-backed [`SerenityGateway`], the text command parser for
//! the `roles` command group, and the [`RolecallHandler`] event handler that
//! feeds reactions to the dispatcher and commands to the command surface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod command;
mod conversions;
mod gateway;
mod handler;

pub use client::RolecallBot;
pub use command::{RolesCommand, parse_command, parse_role, tokenize};
pub use conversions::gateway_error;
pub use gateway::SerenityGateway;
pub use handler::RolecallHandler;
