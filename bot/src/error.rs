//! Error types for the polling bot.
//!
//! Every error ends the current cycle; the binary logs it and moves on to
//! the next one.

use bedrock_db::error::CatalogError;
use bedrock_db_sync::error::SyncError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during a polling cycle.
#[derive(Debug, Error)]
pub enum BotError {
    /// Talking to the update service failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A stored document or identifier violated the catalog format.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The repository access token is missing or empty.
    #[error("access token not found in {path}")]
    CredentialMissing {
        /// Token file that was expected to hold the token.
        path: Utf8PathBuf,
    },

    /// A git command failed or timed out.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed.
        operation: &'static str,
        /// The error message from git.
        message: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// No platform data directory could be determined.
    #[error("could not determine a data directory; set repository.path and cookie_path")]
    DataDirUnavailable,

    /// Reading or writing a repository document failed.
    #[error("failed to access {path}: {source}")]
    Document {
        /// Document path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_error_includes_operation_and_message() {
        let err = BotError::Git {
            operation: "push",
            message: "rejected".to_owned(),
        };
        assert_eq!(err.to_string(), "git push failed: rejected");
    }

    #[test]
    fn credential_missing_names_the_token_file() {
        let err = BotError::CredentialMissing {
            path: Utf8PathBuf::from("token.txt"),
        };
        assert!(err.to_string().contains("token.txt"));
    }

    #[test]
    fn sync_errors_pass_through_unchanged() {
        let err = BotError::from(SyncError::ProtocolFault {
            reason: "Cookie expired.".to_owned(),
        });
        assert_eq!(err.to_string(), "service fault: Cookie expired.");
    }
}
