//! Error types for the Rolecall role selector.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Selector operations return [`SelectorError`]. Storage and platform failures
//! ([`DatabaseError`], [`GatewayError`]) convert into it so a command boundary
//! only ever sees one error type.
//!
//! # Examples
//!
//! ```
//! use rolecall_error::{SelectorError, SelectorErrorKind, SelectorResult};
//!
//! fn move_only_entry() -> SelectorResult<()> {
//!     Err(SelectorError::new(SelectorErrorKind::Boundary(
//!         "Role is the only role registered.".to_string(),
//!     )))
//! }
//!
//! let err = move_only_entry().unwrap_err();
//! assert_eq!(err.user_message(), "Role is the only role registered.");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod gateway;
mod selector;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind, DatabaseResult};
pub use error::{RolecallError, RolecallErrorKind, RolecallResult};
pub use gateway::{GatewayError, GatewayErrorKind, GatewayResult};
pub use selector::{SelectorError, SelectorErrorKind, SelectorResult};
