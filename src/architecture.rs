//! Target architectures published for each package build.
//!
//! Only the three architectures the catalog has always tracked are
//! accepted; anything else is rejected at the parser boundary rather than
//! being dropped later during aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 64-bit x86.
    X64,
    /// 32-bit x86.
    X86,
    /// 32-bit ARM.
    Arm,
}

impl Architecture {
    /// Every architecture in catalog key order.
    pub const ALL: [Self; 3] = [Self::X64, Self::X86, Self::Arm];

    /// Return the architecture as it appears in monikers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Arm => "arm",
        }
    }

    /// Look up an architecture by its moniker text.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_db::architecture::Architecture;
    ///
    /// assert_eq!(Architecture::from_moniker("x86"), Some(Architecture::X86));
    /// assert_eq!(Architecture::from_moniker("arm64"), None);
    /// ```
    #[must_use]
    pub fn from_moniker(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|arch| arch.as_str() == text)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_architecture_round_trips_through_its_text() {
        for arch in Architecture::ALL {
            assert_eq!(Architecture::from_moniker(arch.as_str()), Some(arch));
        }
    }

    #[rstest]
    #[case("X64")]
    #[case("arm64")]
    #[case("")]
    fn rejects_unknown_text(#[case] text: &str) {
        assert_eq!(Architecture::from_moniker(text), None);
    }

    #[test]
    fn ordering_matches_catalog_key_order() {
        let mut archs = vec![Architecture::Arm, Architecture::X64, Architecture::X86];
        archs.sort();
        assert_eq!(archs, Architecture::ALL.to_vec());
    }
}
