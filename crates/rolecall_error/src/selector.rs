//! Selector operation errors.
//!
//! These are the errors a moderator command or a reaction event can raise. Each
//! one is handled at the boundary of the operation that raised it and turned into
//! a single user-facing message via [`SelectorError::user_message`].

use crate::{DatabaseError, DatabaseErrorKind, GatewayError, GatewayErrorKind};

/// Selector failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SelectorErrorKind {
    /// Bad input shape or length. User-fixable, reported verbatim.
    #[display("Invalid {}: {}", field, reason)]
    Validation {
        /// Field that failed validation
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// Role id or trigger symbol already registered.
    #[display("Duplicate entry: {}", _0)]
    DuplicateEntry(String),

    /// Entry already present in the guild's list.
    #[display("Conflict: {}", _0)]
    Conflict(String),

    /// Entry or role not applicable to this guild's selector.
    #[display("Not found: {}", _0)]
    NotFound(String),

    /// Reorder rejected at the edge of the list.
    #[display("Boundary: {}", _0)]
    Boundary(String),

    /// The config references an entry id that no longer exists.
    #[display("Consistency fault: entry {} is referenced but missing", _0)]
    ConsistencyFault(i32),

    /// Publishing was requested with no configured roles.
    #[display("Selector has no roles configured")]
    EmptySelector,

    /// The platform refused a call for lack of permission.
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),

    /// A platform call failed for any other reason.
    #[display("Transport error: {}", _0)]
    Transport(String),

    /// The durable store failed.
    #[display("Storage error: {}", _0)]
    Storage(String),
}

/// Selector error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Selector Error: {} at line {} in {}", kind, line, file)]
pub struct SelectorError {
    /// The kind of error that occurred
    pub kind: SelectorErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SelectorError {
    /// Create a new SelectorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SelectorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a validation failure on `field`.
    #[track_caller]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorKind::Validation {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// The message shown to the moderator or member who triggered the operation.
    ///
    /// ```
    /// use rolecall_error::{SelectorError, SelectorErrorKind};
    ///
    /// let err = SelectorError::new(SelectorErrorKind::ConsistencyFault(7));
    /// assert_eq!(err.user_message(), "Database dirty. Please contact bot owner.");
    /// ```
    pub fn user_message(&self) -> String {
        match &self.kind {
            SelectorErrorKind::Validation { reason, .. } => reason.clone(),
            SelectorErrorKind::DuplicateEntry(msg)
            | SelectorErrorKind::Conflict(msg)
            | SelectorErrorKind::NotFound(msg)
            | SelectorErrorKind::Boundary(msg) => msg.clone(),
            SelectorErrorKind::ConsistencyFault(_) => {
                "Database dirty. Please contact bot owner.".to_string()
            }
            SelectorErrorKind::EmptySelector => "No roles configured.".to_string(),
            SelectorErrorKind::PermissionDenied(_) => {
                "Sorry, I'm not allowed to do that.".to_string()
            }
            SelectorErrorKind::Transport(_) | SelectorErrorKind::Storage(_) => {
                "Sorry, something went wrong.".to_string()
            }
        }
    }
}

/// Result type for selector operations.
pub type SelectorResult<T> = Result<T, SelectorError>;

impl From<DatabaseError> for SelectorError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        let kind = match err.kind {
            DatabaseErrorKind::DuplicateKey(constraint) => {
                SelectorErrorKind::DuplicateEntry(format!("Already registered ({constraint})."))
            }
            DatabaseErrorKind::NotFound => {
                SelectorErrorKind::NotFound("Record not found.".to_string())
            }
            other => SelectorErrorKind::Storage(other.to_string()),
        };
        SelectorError::new(kind)
    }
}

impl From<GatewayError> for SelectorError {
    #[track_caller]
    fn from(err: GatewayError) -> Self {
        let kind = match err.kind() {
            GatewayErrorKind::PermissionDenied(msg) => {
                SelectorErrorKind::PermissionDenied(msg.clone())
            }
            other => SelectorErrorKind::Transport(other.to_string()),
        };
        SelectorError::new(kind)
    }
}
