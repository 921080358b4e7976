//! Chat platform error types.
//!
//! Every platform call (message send/delete, reactions, member role changes) can
//! fail with one of these kinds. The reconciler distinguishes permission failures
//! from everything else, so the split is kept coarse on purpose.

use derive_getters::Getters;

/// Platform failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// The bot lacks the permission required for the call.
    #[display("Permission denied: {_0}")]
    PermissionDenied(String),

    /// The target (message, member, role, channel) does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Any other HTTP or gateway failure.
    #[display("Transport error: {_0}")]
    Transport(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    line: u32,
    file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use rolecall_error::{GatewayError, GatewayErrorKind};
    ///
    /// let err = GatewayError::new(GatewayErrorKind::PermissionDenied("add role".into()));
    /// assert!(err.is_permission_denied());
    /// ```
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the platform refused the call for lack of permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::PermissionDenied(_))
    }

    /// Whether the call targeted something that no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::NotFound(_))
    }
}

/// Result type for platform calls.
pub type GatewayResult<T> = Result<T, GatewayError>;
