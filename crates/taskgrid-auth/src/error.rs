//! Authentication and authorization error types.
//!
//! Every variant is terminal for the current request; nothing here is
//! retried by this crate. [`AuthError::BackendUnavailable`] is the
//! only kind a caller might reasonably retry (idempotent reads only) —
//! it means "could not check", not "rejected".

use taskgrid_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No such account or wrong password. Deliberately a single
    /// variant so responses cannot be used for account enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("tenant not found")]
    TenantNotFound,

    #[error("no credential present on a protected path")]
    MissingToken,

    #[error("token is structurally malformed")]
    MalformedToken,

    #[error("token signature mismatch")]
    TamperedToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("role does not meet the operation's minimum")]
    InsufficientRole,

    #[error("resource belongs to a different tenant")]
    WrongTenant,

    #[error("operation may only target the caller's own record")]
    NotSelf,

    #[error("a user may not remove their own account")]
    CannotSelfRemove,

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::TenantNotFound
            | AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::TamperedToken
            | AuthError::ExpiredToken => CoreError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::InsufficientRole
            | AuthError::WrongTenant
            | AuthError::NotSelf
            | AuthError::CannotSelfRemove => CoreError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::BackendUnavailable(msg) => CoreError::Storage(msg),
            AuthError::Validation(msg) => CoreError::Validation { message: msg },
            AuthError::Crypto(msg) => CoreError::Crypto(msg),
        }
    }
}
