//! Grouping and cross-architecture aggregation of parsed identifiers.
//!
//! A single logical build can appear under several instance ids. The first
//! pass squashes identifiers sharing `(name, architecture, channel)` into a
//! [`VersionGroup`]; the second folds groups sharing `(name, channel)` into a
//! [`VersionAggregate`] keyed by architecture. Both passes group in a single
//! sweep over an insertion-ordered map, so first-seen order is preserved.

use crate::architecture::Architecture;
use crate::channel::Channel;
use crate::identifier::ParsedIdentifier;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Instance ids of one `(name, architecture, channel)` build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGroup {
    /// Version name.
    pub name: String,
    /// Target architecture.
    pub architecture: Architecture,
    /// Channel.
    pub channel: Channel,
    /// Instance ids in first-encounter order.
    pub instance_ids: Vec<String>,
}

/// Instance ids per architecture, always carrying every architecture key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureGuids {
    /// 64-bit x86 instance ids.
    pub x64: Vec<String>,
    /// 32-bit x86 instance ids.
    pub x86: Vec<String>,
    /// ARM instance ids.
    pub arm: Vec<String>,
}

impl ArchitectureGuids {
    /// Return the instance ids for `architecture`.
    #[must_use]
    pub fn get(&self, architecture: Architecture) -> &[String] {
        match architecture {
            Architecture::X64 => &self.x64,
            Architecture::X86 => &self.x86,
            Architecture::Arm => &self.arm,
        }
    }

    fn get_mut(&mut self, architecture: Architecture) -> &mut Vec<String> {
        match architecture {
            Architecture::X64 => &mut self.x64,
            Architecture::X86 => &mut self.x86,
            Architecture::Arm => &mut self.arm,
        }
    }
}

/// One catalog entry: a version within a channel across all architectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAggregate {
    /// Version name.
    pub name: String,
    /// Channel, serialised as `type` for compatibility with existing
    /// catalog consumers.
    #[serde(rename = "type")]
    pub channel: Channel,
    /// Instance ids keyed by architecture.
    pub guids: ArchitectureGuids,
}

/// Squash identifiers sharing `(name, architecture, channel)`.
///
/// Groups appear in the order their first identifier was encountered.
#[must_use]
pub fn squash_groups(identifiers: &[ParsedIdentifier]) -> Vec<VersionGroup> {
    let mut groups: IndexMap<(&str, Architecture, Channel), Vec<String>> = IndexMap::new();
    for identifier in identifiers {
        groups
            .entry((
                identifier.name.as_str(),
                identifier.architecture,
                identifier.channel,
            ))
            .or_default()
            .push(identifier.instance_id.clone());
    }
    groups
        .into_iter()
        .map(|((name, architecture, channel), instance_ids)| VersionGroup {
            name: name.to_owned(),
            architecture,
            channel,
            instance_ids,
        })
        .collect()
}

/// Fold groups sharing `(name, channel)` into catalog entries.
///
/// Architectures without a group keep an empty list. Entries appear in the
/// order their first group was encountered.
#[must_use]
pub fn aggregate_groups(groups: &[VersionGroup]) -> Vec<VersionAggregate> {
    let mut aggregates: IndexMap<(&str, Channel), ArchitectureGuids> = IndexMap::new();
    for group in groups {
        aggregates
            .entry((group.name.as_str(), group.channel))
            .or_default()
            .get_mut(group.architecture)
            .extend(group.instance_ids.iter().cloned());
    }
    aggregates
        .into_iter()
        .map(|((name, channel), guids)| VersionAggregate {
            name: name.to_owned(),
            channel,
            guids,
        })
        .collect()
}
