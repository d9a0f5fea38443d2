//! Update records as issued by the synchronisation service.
//!
//! A record pairs the server-assigned update id with the package moniker it
//! describes. Its display form, `"<id> <moniker>"`, is the raw identifier
//! string stored in the database.

use crate::channel::Channel;
use std::fmt;

/// Monikers of interest all start with this product family prefix.
pub const PRODUCT_FAMILY_PREFIX: &str = "Microsoft.Minecraft";

/// Moniker prefix of release builds.
pub const RELEASE_MONIKER_PREFIX: &str = "Microsoft.MinecraftUWP_";

/// Moniker prefix of preview builds.
pub const PREVIEW_MONIKER_PREFIX: &str = "Microsoft.MinecraftWindowsBeta_";

/// One update artefact returned by the service.
///
/// # Examples
///
/// ```
/// use bedrock_db::record::UpdateRecord;
///
/// let record = UpdateRecord::new("abc", "Microsoft.MinecraftUWP_1.2.3.0_x64__8wekyb3d8bbwe");
/// assert_eq!(record.to_string(), "abc Microsoft.MinecraftUWP_1.2.3.0_x64__8wekyb3d8bbwe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateRecord {
    id: String,
    package_moniker: String,
}

impl UpdateRecord {
    /// Create a record from an update id and a package moniker.
    #[must_use]
    pub fn new(id: impl Into<String>, package_moniker: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            package_moniker: package_moniker.into(),
        }
    }

    /// Return the server-assigned update id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the package moniker.
    #[must_use]
    pub fn package_moniker(&self) -> &str {
        &self.package_moniker
    }

    /// Whether the moniker belongs to the tracked product family.
    #[must_use]
    pub fn is_product_family(&self) -> bool {
        self.package_moniker.starts_with(PRODUCT_FAMILY_PREFIX)
    }

    /// Return the channel this record is published into, if any.
    ///
    /// Betas are never returned: the vendor stopped publishing them, and
    /// their moniker prefix is shared with releases.
    #[must_use]
    pub fn channel(&self) -> Option<Channel> {
        if self.package_moniker.starts_with(RELEASE_MONIKER_PREFIX) {
            Some(Channel::Release)
        } else if self.package_moniker.starts_with(PREVIEW_MONIKER_PREFIX) {
            Some(Channel::Preview)
        } else {
            None
        }
    }
}

impl fmt::Display for UpdateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.package_moniker)
    }
}

/// Raw identifier strings split by the channel they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBatch {
    /// New release identifiers, in server order.
    pub release: Vec<String>,
    /// New beta identifiers, in server order.
    pub beta: Vec<String>,
    /// New preview identifiers, in server order.
    pub preview: Vec<String>,
}

impl ChannelBatch {
    /// Return the identifiers for one channel.
    #[must_use]
    pub fn get(&self, channel: Channel) -> &[String] {
        match channel {
            Channel::Release => &self.release,
            Channel::Beta => &self.beta,
            Channel::Preview => &self.preview,
        }
    }

    fn get_mut(&mut self, channel: Channel) -> &mut Vec<String> {
        match channel {
            Channel::Release => &mut self.release,
            Channel::Beta => &mut self.beta,
            Channel::Preview => &mut self.preview,
        }
    }

    /// Whether no channel holds any identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|channel| self.get(*channel).is_empty())
    }
}

/// Split fetched records into per-channel raw identifier strings.
///
/// Records outside every known channel are dropped.
#[must_use]
pub fn partition_records(records: &[UpdateRecord]) -> ChannelBatch {
    let mut batch = ChannelBatch::default();
    for record in records {
        if let Some(channel) = record.channel() {
            batch.get_mut(channel).push(record.to_string());
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Microsoft.MinecraftUWP_1.20.1.0_x64__8wekyb3d8bbwe", true)]
    #[case("Microsoft.MinecraftWindowsBeta_1.20.0.20_x64__8wekyb3d8bbwe", true)]
    #[case("Microsoft.MinecraftEducationEdition_1.0.0.0_x64__8wekyb3d8bbwe", true)]
    #[case("Microsoft.WindowsStore_12107.1001.15.0_x64__8wekyb3d8bbwe", false)]
    fn product_family_filter(#[case] moniker: &str, #[case] expected: bool) {
        assert_eq!(UpdateRecord::new("id", moniker).is_product_family(), expected);
    }

    #[test]
    fn partition_splits_by_moniker_prefix() {
        let records = vec![
            UpdateRecord::new("1", "Microsoft.MinecraftUWP_1.2.3.0_x64__8wekyb3d8bbwe"),
            UpdateRecord::new("2", "Microsoft.MinecraftWindowsBeta_1.2.4.20_x64__8wekyb3d8bbwe"),
            UpdateRecord::new("3", "Microsoft.MinecraftEducationEdition_1.0.0.0_x64"),
            UpdateRecord::new("4", "Microsoft.MinecraftUWP_1.2.3.0_x86__8wekyb3d8bbwe"),
        ];

        let batch = partition_records(&records);

        assert_eq!(
            batch.release,
            vec![
                "1 Microsoft.MinecraftUWP_1.2.3.0_x64__8wekyb3d8bbwe".to_owned(),
                "4 Microsoft.MinecraftUWP_1.2.3.0_x86__8wekyb3d8bbwe".to_owned(),
            ]
        );
        assert_eq!(
            batch.preview,
            vec!["2 Microsoft.MinecraftWindowsBeta_1.2.4.20_x64__8wekyb3d8bbwe".to_owned()]
        );
        assert!(batch.beta.is_empty());
    }

    #[test]
    fn empty_batch_reports_empty() {
        assert!(partition_records(&[]).is_empty());
    }

    #[test]
    fn records_compare_structurally() {
        let a = UpdateRecord::new("1", "Microsoft.MinecraftUWP_1.2.3.0_x64");
        let b = UpdateRecord::new("1", "Microsoft.MinecraftUWP_1.2.3.0_x64");
        let c = UpdateRecord::new("2", "Microsoft.MinecraftUWP_1.2.3.0_x64");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
