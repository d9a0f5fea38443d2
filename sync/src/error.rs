//! Error types for the synchronisation session.
//!
//! The variants mirror how the session reacts to them: transport failures
//! and service faults send the client back through the cookie bootstrap,
//! while parse and encoding failures are fatal for the current call.

use crate::cookie::CookieStoreError;
use thiserror::Error;

/// Errors that can occur while talking to the update service.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response (network, TLS, timeout).
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// The endpoint that was called.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// The service answered with a fault body or a non-success status.
    ///
    /// The reason always ends with exactly one period.
    #[error("service fault: {reason}")]
    ProtocolFault {
        /// Human-readable fault reason.
        reason: String,
    },

    /// The response was well formed but lacked a required field.
    #[error("malformed {operation} response: {reason}")]
    ProtocolParse {
        /// The operation whose response was being decoded.
        operation: &'static str,
        /// Description of what was missing.
        reason: String,
    },

    /// A request document could not be serialised.
    #[error("failed to encode {operation} request: {reason}")]
    Encode {
        /// The operation whose request was being built.
        operation: &'static str,
        /// The writer's description of the failure.
        reason: String,
    },

    /// Persisting the renewed cookie failed.
    #[error(transparent)]
    CookieStore(#[from] CookieStoreError),
}

impl SyncError {
    /// Whether this failure should send the session through the cookie
    /// bootstrap before giving up.
    #[must_use]
    pub fn triggers_bootstrap(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ProtocolFault { .. })
    }
}

/// Result type alias using [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;
