//! Version catalog projection.
//!
//! The catalog is recomputed from the full database on every cycle; it has
//! no identity of its own beyond its content. Entries are ordered by version
//! name using natural ordering, so `1.2.10.0` follows `1.2.9.0`. The sort is
//! stable: entries sharing a name keep their release, beta, preview order.

use crate::aggregate::{VersionAggregate, aggregate_groups, squash_groups};
use crate::channel::Channel;
use crate::database::Database;
use crate::error::Result;
use crate::identifier::{ParsedIdentifier, parse_channel};
use crate::json::{from_document, to_document};

/// File name of the catalog document in the published repository.
pub const CATALOG_DOCUMENT: &str = "versions.json";

/// The ordered version catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<VersionAggregate>,
}

impl Catalog {
    /// Project a catalog from parsed identifiers spanning every channel.
    #[must_use]
    pub fn project(identifiers: &[ParsedIdentifier]) -> Self {
        let mut entries = aggregate_groups(&squash_groups(identifiers));
        entries.sort_by(|a, b| natord::compare(&a.name, &b.name));
        Self { entries }
    }

    /// Parse every channel of `database` and project the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::InvalidIdentifier`] for the
    /// first stored identifier that breaks the grammar; no partial catalog
    /// is produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_db::catalog::Catalog;
    /// use bedrock_db::database::Database;
    ///
    /// let db = Database::new(
    ///     vec![
    ///         "1 Microsoft.MinecraftUWP_1.2.3.0_x64".to_owned(),
    ///         "2 Microsoft.MinecraftUWP_1.2.3.0_x86".to_owned(),
    ///     ],
    ///     Vec::new(),
    ///     Vec::new(),
    /// );
    /// let catalog = Catalog::from_database(&db).expect("valid database");
    /// assert_eq!(catalog.entries().len(), 1);
    /// assert_eq!(catalog.entries()[0].guids.x86, vec!["2".to_owned()]);
    /// ```
    pub fn from_database(database: &Database) -> Result<Self> {
        let mut identifiers = Vec::new();
        for channel in Channel::ALL {
            identifiers.extend(parse_channel(database.entries(channel), channel)?);
        }
        Ok(Self::project(&identifiers))
    }

    /// Return the ordered entries.
    #[must_use]
    pub fn entries(&self) -> &[VersionAggregate] {
        &self.entries
    }

    /// Encode the catalog as its JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::Serialise`] if encoding fails.
    pub fn to_document(&self) -> Result<String> {
        to_document(CATALOG_DOCUMENT, &self.entries)
    }

    /// Decode a previously published catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CatalogError::InvalidDocument`] if the text
    /// is not a catalog.
    pub fn from_document(text: &str) -> Result<Self> {
        Ok(Self {
            entries: from_document(CATALOG_DOCUMENT, text)?,
        })
    }
}
