//! Guarded publication of database documents.
//!
//! A replacement is only written when it differs from the stored text, is
//! valid JSON, and (for the regular cycle) is strictly longer than what it
//! replaces. The sequences are append-only and the catalog only grows with
//! them, so anything shorter means a truncated or corrupt write. Rejected
//! documents are skipped with a log line, never an error.

use crate::error::Result;
use crate::repository::DocumentStore;
use log::info;

/// Verdict on a proposed replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Review {
    /// Same content as stored.
    Unchanged,
    /// Not valid JSON, or not longer when growth is required.
    Invalid,
    /// Safe to write.
    Accepted,
}

/// Whether replacements must grow the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// New text must be strictly longer than the old text.
    RequireGrowth,
    /// Any valid JSON replacement is accepted (used by rebuild).
    AllowShrink,
}

/// A document waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocument {
    /// Document name within the repository.
    pub name: String,
    /// Proposed replacement text.
    pub text: String,
}

impl PendingDocument {
    /// Create a pending document.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// What a publish pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Documents written (or that would be written in a dry run).
    pub accepted: Vec<String>,
    /// Documents skipped and why.
    pub skipped: Vec<(String, Review)>,
    /// Whether a commit was recorded.
    pub committed: bool,
}

fn strip_carriage_returns(text: &str) -> String {
    text.replace('\r', "")
}

/// Review replacing `old` with `new`. Carriage returns are ignored.
///
/// # Examples
///
/// ```
/// use bedrock_db_bot::publish::{GrowthPolicy, Review, review_replacement};
///
/// let policy = GrowthPolicy::RequireGrowth;
/// assert_eq!(review_replacement("[]", "[]", policy), Review::Unchanged);
/// assert_eq!(review_replacement("[\"a\"]", "[]", policy), Review::Invalid);
/// assert_eq!(review_replacement("[]", "[\"a\"", policy), Review::Invalid);
/// assert_eq!(review_replacement("[]", "[\"a\"]", policy), Review::Accepted);
/// ```
#[must_use]
pub fn review_replacement(old: &str, new: &str, policy: GrowthPolicy) -> Review {
    let old = strip_carriage_returns(old);
    let new = strip_carriage_returns(new);
    if old == new {
        return Review::Unchanged;
    }
    if policy == GrowthPolicy::RequireGrowth && new.len() <= old.len() {
        return Review::Invalid;
    }
    if serde_json::from_str::<serde_json::Value>(&new).is_err() {
        return Review::Invalid;
    }
    Review::Accepted
}

/// Write each accepted document and commit them together under `message`.
///
/// In a dry run nothing is written or committed; the report lists what
/// would have been.
///
/// # Errors
///
/// Returns an error when reading, writing, or committing fails.
pub fn publish(
    store: &dyn DocumentStore,
    documents: &[PendingDocument],
    message: &str,
    policy: GrowthPolicy,
    dry_run: bool,
) -> Result<PublishReport> {
    let mut report = PublishReport::default();

    for document in documents {
        let old = store.read(&document.name)?;
        match review_replacement(&old, &document.text, policy) {
            Review::Accepted => {
                if dry_run {
                    info!("dry run: would update \"{}\"", document.name);
                } else {
                    store.write(&document.name, &strip_carriage_returns(&document.text))?;
                }
                report.accepted.push(document.name.clone());
            }
            review @ Review::Unchanged => {
                info!(
                    "skipping \"{}\": no difference from the stored content",
                    document.name
                );
                report.skipped.push((document.name.clone(), review));
            }
            review @ Review::Invalid => {
                info!("skipping \"{}\": the new content is invalid", document.name);
                report.skipped.push((document.name.clone(), review));
            }
        }
    }

    if dry_run {
        if !report.accepted.is_empty() {
            info!("dry run: would commit \"{message}\"");
        }
    } else if !report.accepted.is_empty() {
        store.commit(&report.accepted, message)?;
        report.committed = true;
    }
    Ok(report)
}
