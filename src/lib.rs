//! Version catalog engine for Minecraft Bedrock update identifiers.
//!
//! Raw identifiers fetched from the update service are deduplicated into an
//! append-only per-channel [`database::Database`], parsed into structured
//! fields, and projected into a naturally ordered [`catalog::Catalog`].
//! Everything here is a pure function of its inputs; network access and
//! storage live in `bedrock-db-sync` and `bedrock-db-bot`.
//!
//! # Modules
//!
//! - [`aggregate`] - Grouping by build and cross-architecture aggregation
//! - [`architecture`] - Target architecture table
//! - [`catalog`] - Catalog projection and its JSON document
//! - [`channel`] - Channels and vendor prefix table
//! - [`database`] - Append-only identifier sequences and the dedup pass
//! - [`error`] - Parse and document errors
//! - [`identifier`] - Raw identifier parser
//! - [`json`] - Document encoding shared by database and catalog
//! - [`record`] - Update records and per-channel partitioning

pub mod aggregate;
pub mod architecture;
pub mod catalog;
pub mod channel;
pub mod database;
pub mod error;
pub mod identifier;
pub mod json;
pub mod record;

pub use catalog::Catalog;
pub use database::Database;
pub use record::UpdateRecord;
