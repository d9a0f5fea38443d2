//! Error types for identifier parsing and catalog projection.
//!
//! Each variant names the offending input and the rule it broke so that a
//! data-contract violation in the stored database can be traced back to the
//! exact line.

use thiserror::Error;

/// Errors arising from parsing raw identifiers or serialising the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A raw identifier does not match the moniker grammar.
    #[error("invalid identifier \"{value}\": {reason}")]
    InvalidIdentifier {
        /// The rejected raw string.
        value: String,
        /// Description of the grammar rule that failed.
        reason: String,
    },

    /// A stored sequence or catalog document is not valid JSON of the
    /// expected shape.
    #[error("invalid {document} document: {reason}")]
    InvalidDocument {
        /// Name of the document (for example `releases.json`).
        document: String,
        /// The parser's description of the failure.
        reason: String,
    },

    /// Serialising a document to JSON failed.
    #[error("failed to serialise {document}: {reason}")]
    Serialise {
        /// Name of the document being written.
        document: String,
        /// The serialiser's description of the failure.
        reason: String,
    },
}

impl CatalogError {
    pub(crate) fn invalid_identifier(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_names_value_and_reason() {
        let err = CatalogError::invalid_identifier("123 Unknown.Thing_1_x64", "unknown prefix");
        let msg = err.to_string();
        assert!(msg.contains("123 Unknown.Thing_1_x64"));
        assert!(msg.contains("unknown prefix"));
    }

    #[test]
    fn invalid_document_names_document() {
        let err = CatalogError::InvalidDocument {
            document: "releases.json".to_owned(),
            reason: "expected value at line 1 column 1".to_owned(),
        };
        assert!(err.to_string().contains("releases.json"));
    }
}
