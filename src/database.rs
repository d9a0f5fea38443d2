//! Append-only identifier database and its deduplication pass.
//!
//! The database keeps one ordered sequence of raw identifier strings per
//! channel. Sequences only grow: new strings are appended in the order they
//! were first seen and never rewritten, so the stored order doubles as the
//! provenance record. Catalog output re-sorts independently.

use crate::channel::Channel;
use crate::error::Result;
use crate::identifier::version_name;
use crate::json::{from_document, to_document};
use crate::record::ChannelBatch;
use std::collections::HashSet;

/// Strings appended to one channel by a dedup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUpdate {
    added: Vec<String>,
}

impl ChannelUpdate {
    /// Whether anything was appended.
    #[must_use]
    pub fn did_update(&self) -> bool {
        !self.added.is_empty()
    }

    /// Return the first newly appended string, if any.
    #[must_use]
    pub fn first_added(&self) -> Option<&str> {
        self.added.first().map(String::as_str)
    }

    /// Return every appended string in append order.
    #[must_use]
    pub fn added(&self) -> &[String] {
        &self.added
    }
}

/// Outcome of merging a batch of new identifiers into the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    changed: Vec<(Channel, ChannelUpdate)>,
    commit_message: String,
}

impl UpdateOutcome {
    /// Whether any channel received a new identifier.
    #[must_use]
    pub fn did_update(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Return the channels that changed, in database order.
    pub fn changed_channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.changed.iter().map(|(channel, _)| *channel)
    }

    /// Return the update recorded for `channel`, if it changed.
    #[must_use]
    pub fn channel_update(&self, channel: Channel) -> Option<&ChannelUpdate> {
        self.changed
            .iter()
            .find(|(changed, _)| *changed == channel)
            .map(|(_, update)| update)
    }

    /// Return the commit message summarising the change.
    ///
    /// One `"<version> (<Channel>)"` fragment per changed channel, joined by
    /// `" | "`; empty when nothing changed.
    #[must_use]
    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }
}

/// Three append-only identifier sequences, one per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    release: Vec<String>,
    beta: Vec<String>,
    preview: Vec<String>,
}

impl Database {
    /// Create a database from stored sequences.
    #[must_use]
    pub fn new(release: Vec<String>, beta: Vec<String>, preview: Vec<String>) -> Self {
        Self {
            release,
            beta,
            preview,
        }
    }

    /// Parse a database from its three JSON sequence documents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::InvalidDocument`] when a
    /// document is not a JSON array of strings.
    pub fn from_documents(release: &str, beta: &str, preview: &str) -> Result<Self> {
        Ok(Self::new(
            from_document("release sequence", release)?,
            from_document("beta sequence", beta)?,
            from_document("preview sequence", preview)?,
        ))
    }

    /// Encode one channel's sequence as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::Serialise`] if encoding fails.
    pub fn to_document(&self, channel: Channel) -> Result<String> {
        to_document(channel.as_str(), self.entries(channel))
    }

    /// Return the stored sequence for `channel`.
    #[must_use]
    pub fn entries(&self, channel: Channel) -> &[String] {
        match channel {
            Channel::Release => &self.release,
            Channel::Beta => &self.beta,
            Channel::Preview => &self.preview,
        }
    }

    fn entries_mut(&mut self, channel: Channel) -> &mut Vec<String> {
        match channel {
            Channel::Release => &mut self.release,
            Channel::Beta => &mut self.beta,
            Channel::Preview => &mut self.preview,
        }
    }

    /// Append the strings of `new` not already present in `channel`.
    ///
    /// Duplicates inside `new` are appended once. Running the same input
    /// twice appends nothing the second time.
    pub fn append(&mut self, channel: Channel, new: &[String]) -> ChannelUpdate {
        let slot = self.entries_mut(channel);
        let mut seen: HashSet<String> = slot.iter().cloned().collect();
        let mut added = Vec::new();
        for candidate in new {
            if seen.insert(candidate.clone()) {
                slot.push(candidate.clone());
                added.push(candidate.clone());
            }
        }
        ChannelUpdate { added }
    }

    /// Merge a per-channel batch of new identifiers.
    ///
    /// `did_update` is the logical OR over every channel.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::InvalidIdentifier`] when the
    /// first appended string of a channel cannot yield a version name for
    /// the commit message. The strings are still appended in that case.
    pub fn update(&mut self, batch: &ChannelBatch) -> Result<UpdateOutcome> {
        let mut changed = Vec::new();
        let mut fragments = Vec::new();
        for channel in Channel::ALL {
            let update = self.append(channel, batch.get(channel));
            if let Some(first) = update.first_added() {
                fragments.push(format!("{} ({})", version_name(first)?, channel.label()));
                changed.push((channel, update));
            }
        }
        Ok(UpdateOutcome {
            changed,
            commit_message: fragments.join(" | "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn append_keeps_order_and_skips_known_entries() {
        let mut db = Database::new(strings(&["1 a", "2 b"]), Vec::new(), Vec::new());
        let update = db.append(Channel::Release, &strings(&["2 b", "3 c", "4 d"]));

        assert_eq!(update.added(), strings(&["3 c", "4 d"]).as_slice());
        assert_eq!(update.first_added(), Some("3 c"));
        assert_eq!(
            db.entries(Channel::Release),
            strings(&["1 a", "2 b", "3 c", "4 d"]).as_slice()
        );
    }

    #[test]
    fn append_collapses_duplicates_within_input() {
        let mut db = Database::default();
        let update = db.append(Channel::Preview, &strings(&["1 a", "1 a"]));
        assert_eq!(update.added().len(), 1);
        assert_eq!(db.entries(Channel::Preview).len(), 1);
    }

    #[test]
    fn second_identical_update_reports_no_change() {
        let mut db = Database::default();
        let batch = ChannelBatch {
            release: strings(&["1 Microsoft.MinecraftUWP_1.2.3.0_x64__8wekyb3d8bbwe"]),
            ..ChannelBatch::default()
        };

        let first = db.update(&batch).expect("first update");
        let second = db.update(&batch).expect("second update");

        assert!(first.did_update());
        assert!(!second.did_update());
        assert_eq!(second.commit_message(), "");
        assert_eq!(db.entries(Channel::Release).len(), 1);
    }

    #[test]
    fn preview_only_change_is_reported() {
        let mut db = Database::new(
            strings(&["1 Microsoft.MinecraftUWP_1.2.3.0_x64"]),
            Vec::new(),
            Vec::new(),
        );
        let batch = ChannelBatch {
            release: strings(&["1 Microsoft.MinecraftUWP_1.2.3.0_x64"]),
            preview: strings(&["9 Microsoft.MinecraftWindowsBeta_1.2.10.20_x64__8wekyb3d8bbwe"]),
            ..ChannelBatch::default()
        };

        let outcome = db.update(&batch).expect("update");

        assert!(outcome.did_update());
        assert_eq!(
            outcome.changed_channels().collect::<Vec<_>>(),
            vec![Channel::Preview]
        );
        assert_eq!(outcome.commit_message(), "1.2.10.20 (Preview)");
    }

    #[test]
    fn commit_message_uses_first_added_per_channel() {
        let mut db = Database::default();
        let batch = ChannelBatch {
            release: strings(&[
                "1 Microsoft.MinecraftUWP_1.20.1.0_x64__8wekyb3d8bbwe",
                "2 Microsoft.MinecraftUWP_1.20.2.0_x64__8wekyb3d8bbwe",
            ]),
            preview: strings(&["3 Microsoft.MinecraftWindowsBeta_1.20.10.20_x64"]),
            ..ChannelBatch::default()
        };

        let outcome = db.update(&batch).expect("update");

        assert_eq!(
            outcome.commit_message(),
            "1.20.1.0 (Release) | 1.20.10.20 (Preview)"
        );
        let release = outcome
            .channel_update(Channel::Release)
            .expect("release changed");
        assert_eq!(release.added().len(), 2);
    }

    #[test]
    fn malformed_first_addition_fails_commit_message() {
        let mut db = Database::default();
        let batch = ChannelBatch {
            release: strings(&["garbage"]),
            ..ChannelBatch::default()
        };
        let err = db.update(&batch).expect_err("expected invalid identifier");
        assert!(matches!(err, CatalogError::InvalidIdentifier { .. }));
    }

    #[test]
    fn documents_round_trip_through_json() {
        let db = Database::from_documents("[\"1 a\"]", "[]", "[\"2 b\", \"3 c\"]")
            .expect("parse documents");
        assert_eq!(db.entries(Channel::Preview), strings(&["2 b", "3 c"]).as_slice());
        assert_eq!(
            db.to_document(Channel::Release).expect("encode"),
            "[\n    \"1 a\"\n]"
        );
    }

    #[test]
    fn rejects_non_sequence_document() {
        let err = Database::from_documents("{}", "[]", "[]").expect_err("reject object");
        assert!(matches!(err, CatalogError::InvalidDocument { .. }));
    }
}
