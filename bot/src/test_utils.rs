//! Test doubles for the polling cycle.

use crate::error::{BotError, Result};
use crate::repository::DocumentStore;
use bedrock_db::record::UpdateRecord;
use bedrock_db_sync::client::UpdateSource;
use bedrock_db_sync::error::SyncError;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// An in-memory [`DocumentStore`] that records commits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<BTreeMap<String, String>>,
    commits: RefCell<Vec<(Vec<String>, String)>>,
}

impl MemoryStore {
    /// Create a store holding the given documents.
    pub fn with_documents<'a>(documents: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            documents: RefCell::new(
                documents
                    .into_iter()
                    .map(|(name, text)| (name.to_owned(), text.to_owned()))
                    .collect(),
            ),
            commits: RefCell::new(Vec::new()),
        }
    }

    /// A store with empty release, beta, preview and catalog documents.
    pub fn empty_database() -> Self {
        Self::with_documents([
            ("releases.json", "[]"),
            ("betas.json", "[]"),
            ("previews.json", "[]"),
            ("versions.json", "[]"),
        ])
    }

    /// Return the current text of `name`.
    pub fn document(&self, name: &str) -> Option<String> {
        self.documents.borrow().get(name).cloned()
    }

    /// Commits recorded so far as `(names, message)` pairs.
    pub fn commits(&self) -> Vec<(Vec<String>, String)> {
        self.commits.borrow().clone()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, name: &str) -> Result<String> {
        self.document(name).ok_or_else(|| BotError::Document {
            path: name.into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
        })
    }

    fn write(&self, name: &str, text: &str) -> Result<()> {
        self.documents
            .borrow_mut()
            .insert(name.to_owned(), text.to_owned());
        Ok(())
    }

    fn commit(&self, names: &[String], message: &str) -> Result<()> {
        self.commits
            .borrow_mut()
            .push((names.to_vec(), message.to_owned()));
        Ok(())
    }
}

/// An [`UpdateSource`] returning a fixed answer.
#[derive(Debug)]
pub struct FixedSource {
    records: Vec<UpdateRecord>,
    fault: Option<String>,
}

impl FixedSource {
    /// A source returning `records` on every call.
    pub fn records(records: Vec<UpdateRecord>) -> Self {
        Self {
            records,
            fault: None,
        }
    }

    /// A source failing with a service fault on every call.
    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            fault: Some(reason.to_owned()),
        }
    }
}

impl UpdateSource for FixedSource {
    fn fetch_updates(&self) -> std::result::Result<Vec<UpdateRecord>, SyncError> {
        match &self.fault {
            Some(reason) => Err(SyncError::ProtocolFault {
                reason: reason.clone(),
            }),
            None => Ok(self.records.clone()),
        }
    }
}
