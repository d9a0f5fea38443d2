//! JSON document encoding shared by the database and the catalog.
//!
//! Documents are written with four-space indentation to match the
//! historical contents of the published repository, so that diffs between
//! runs only show real changes.

use crate::error::{CatalogError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialise `value` as pretty-printed JSON with four-space indentation.
///
/// # Errors
///
/// Returns [`CatalogError::Serialise`] if serialisation fails.
///
/// # Examples
///
/// ```
/// use bedrock_db::json::to_document;
///
/// let text = to_document("releases.json", &vec!["a", "b"]).expect("serialise");
/// assert_eq!(text, "[\n    \"a\",\n    \"b\"\n]");
/// ```
pub fn to_document<T: Serialize + ?Sized>(document: &str, value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| CatalogError::Serialise {
            document: document.to_owned(),
            reason: e.to_string(),
        })?;
    String::from_utf8(buffer).map_err(|e| CatalogError::Serialise {
        document: document.to_owned(),
        reason: e.to_string(),
    })
}

/// Deserialise a JSON document, naming it in the error on failure.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidDocument`] if `text` is not valid JSON of
/// the expected shape.
pub fn from_document<T: DeserializeOwned>(document: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| CatalogError::InvalidDocument {
        document: document.to_owned(),
        reason: e.to_string(),
    })
}
