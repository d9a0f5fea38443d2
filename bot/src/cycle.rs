//! One polling cycle and the catalog rebuild.
//!
//! A cycle fetches the current product records, appends the unseen ones to
//! the stored sequences, and when anything was appended re-projects the
//! catalog and publishes the changed documents under one commit.

use crate::config::RepositoryConfig;
use crate::error::Result;
use crate::publish::{GrowthPolicy, PendingDocument, PublishReport, publish};
use crate::repository::DocumentStore;
use bedrock_db::catalog::Catalog;
use bedrock_db::channel::Channel;
use bedrock_db::database::Database;
use bedrock_db::record::partition_records;
use bedrock_db_sync::client::UpdateSource;
use log::info;

/// Commit message used by [`rebuild`].
pub const REBUILD_MESSAGE: &str = "Rebuild version catalog";

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every fetched record was already known.
    NoNewUpdates,
    /// New records were merged and the documents offered for publication.
    Published {
        /// Commit message describing the new versions.
        message: String,
        /// What the publish step did.
        report: PublishReport,
    },
}

/// Read the three identifier sequences from `store`.
///
/// # Errors
///
/// Returns an error when a document is unreadable or not a string array.
pub fn load_database(store: &dyn DocumentStore, config: &RepositoryConfig) -> Result<Database> {
    let release = store.read(config.channel_document(Channel::Release))?;
    let beta = store.read(config.channel_document(Channel::Beta))?;
    let preview = store.read(config.channel_document(Channel::Preview))?;
    Ok(Database::from_documents(&release, &beta, &preview)?)
}

/// Run one cycle.
///
/// # Errors
///
/// Returns an error when fetching, merging, projecting, or publishing fails.
pub fn run_cycle(
    source: &dyn UpdateSource,
    store: &dyn DocumentStore,
    config: &RepositoryConfig,
    dry_run: bool,
) -> Result<CycleOutcome> {
    let records = source.fetch_updates()?;
    let batch = partition_records(&records);

    let mut database = load_database(store, config)?;
    let outcome = database.update(&batch)?;
    if !outcome.did_update() {
        info!("no new update records");
        return Ok(CycleOutcome::NoNewUpdates);
    }
    info!("new versions: {}", outcome.commit_message());

    let catalog = Catalog::from_database(&database)?;
    let mut documents = outcome
        .changed_channels()
        .map(|channel| {
            Ok(PendingDocument::new(
                config.channel_document(channel),
                database.to_document(channel)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    documents.push(PendingDocument::new(
        config.versions.as_str(),
        catalog.to_document()?,
    ));

    let report = publish(
        store,
        &documents,
        outcome.commit_message(),
        GrowthPolicy::RequireGrowth,
        dry_run,
    )?;
    Ok(CycleOutcome::Published {
        message: outcome.commit_message().to_owned(),
        report,
    })
}

/// Recompute the catalog from the stored sequences and publish it.
///
/// # Errors
///
/// Returns an error when the sequences are unreadable or contain an invalid
/// identifier, or when publishing fails.
pub fn rebuild(
    store: &dyn DocumentStore,
    config: &RepositoryConfig,
    dry_run: bool,
) -> Result<PublishReport> {
    let database = load_database(store, config)?;
    let catalog = Catalog::from_database(&database)?;
    info!("rebuilt catalog has {} versions", catalog.entries().len());
    publish(
        store,
        &[PendingDocument::new(
            config.versions.as_str(),
            catalog.to_document()?,
        )],
        REBUILD_MESSAGE,
        GrowthPolicy::AllowShrink,
        dry_run,
    )
}
