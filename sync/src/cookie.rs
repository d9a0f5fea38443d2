//! Session cookie and its persistence.
//!
//! The cookie is opaque: the client never inspects it, only hands it back
//! to the service, which issues a fresh one on every successful sync. Losing
//! the stored cookie is harmless because a new one can be bootstrapped.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Opaque session continuation token issued by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Encrypted session payload.
    pub encrypted_data: String,
    /// Expiration timestamp exactly as issued.
    pub expiration: String,
}

impl Cookie {
    /// Create a cookie from its two fields.
    #[must_use]
    pub fn new(encrypted_data: impl Into<String>, expiration: impl Into<String>) -> Self {
        Self {
            encrypted_data: encrypted_data.into(),
            expiration: expiration.into(),
        }
    }
}

/// Errors raised by cookie persistence.
#[derive(Debug, thiserror::Error)]
pub enum CookieStoreError {
    /// Reading the stored cookie failed for a reason other than absence.
    #[error("failed to read cookie file {path}: {source}")]
    Read {
        /// Cookie file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored cookie is not a valid cookie document.
    #[error("corrupt cookie file {path}: {reason}")]
    Corrupt {
        /// Cookie file path.
        path: Utf8PathBuf,
        /// Parser description of the problem.
        reason: String,
    },

    /// Writing the cookie failed.
    #[error("failed to write cookie file {path}: {source}")]
    Write {
        /// Cookie file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding the cookie failed.
    #[error("failed to encode cookie: {reason}")]
    Encode {
        /// Serialiser description of the problem.
        reason: String,
    },
}

/// Loads and saves the latest session cookie.
#[cfg_attr(test, mockall::automock)]
pub trait CookieStore {
    /// Load the stored cookie, returning `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored cookie exists but cannot be read.
    fn load(&self) -> Result<Option<Cookie>, CookieStoreError>;

    /// Replace the stored cookie.
    ///
    /// # Errors
    ///
    /// Returns an error when the cookie cannot be written.
    fn save(&self, cookie: &Cookie) -> Result<(), CookieStoreError>;
}

/// Cookie store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileCookieStore {
    path: Utf8PathBuf,
}

impl FileCookieStore {
    /// Create a store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Return the backing file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CookieStore for FileCookieStore {
    fn load(&self) -> Result<Option<Cookie>, CookieStoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CookieStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CookieStoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    fn save(&self, cookie: &Cookie) -> Result<(), CookieStoreError> {
        let text = bedrock_db::json::to_document("cookie", cookie).map_err(|e| {
            CookieStoreError::Encode {
                reason: e.to_string(),
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CookieStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, text).map_err(|source| CookieStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCookieStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("state").join("last_cookie.json"))
            .expect("UTF-8 temp path");
        FileCookieStore::new(path)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir);
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn saved_cookie_loads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir);
        let cookie = Cookie::new("opaque-data", "2026-10-18T00:00:00Z");

        store.save(&cookie).expect("save");

        assert_eq!(store.load().expect("load"), Some(cookie));
    }

    #[test]
    fn save_replaces_previous_cookie() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir);
        store.save(&Cookie::new("old", "1")).expect("save old");
        store.save(&Cookie::new("new", "2")).expect("save new");
        assert_eq!(store.load().expect("load"), Some(Cookie::new("new", "2")));
    }

    #[test]
    fn stored_format_uses_snake_case_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir);
        store.save(&Cookie::new("d", "e")).expect("save");
        let text = std::fs::read_to_string(store.path()).expect("read");
        assert!(text.contains("\"encrypted_data\": \"d\""));
        assert!(text.contains("\"expiration\": \"e\""));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "{\"encrypted_data\": 1}").expect("write");

        let err = store.load().expect_err("expected corrupt cookie");
        assert!(matches!(err, CookieStoreError::Corrupt { .. }));
    }
}
