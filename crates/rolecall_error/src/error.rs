//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, GatewayError, SelectorError};

/// Every error the Rolecall binary can surface.
///
/// # Examples
///
/// ```
/// use rolecall_error::{ConfigError, RolecallError};
///
/// let err: RolecallError = ConfigError::new("Missing token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RolecallErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Chat platform error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Selector operation error
    #[from(SelectorError)]
    Selector(SelectorError),
}

/// Rolecall error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Rolecall Error: {}", _0)]
pub struct RolecallError(Box<RolecallErrorKind>);

impl RolecallError {
    /// Create a new error from a kind.
    pub fn new(kind: RolecallErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RolecallErrorKind {
        &self.0
    }
}

impl<T> From<T> for RolecallError
where
    T: Into<RolecallErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Rolecall operations.
pub type RolecallResult<T> = std::result::Result<T, RolecallError>;
