//! Distribution channels and the vendor prefixes that publish into them.
//!
//! The mapping from vendor prefix to channel is a fixed table checked
//! exhaustively by the identifier parser. `Microsoft.MinecraftUWP` carries
//! both stable releases and the retired beta track, so the caller's expected
//! channel decides between the two; `Microsoft.MinecraftWindowsBeta` only
//! ever carries previews.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A distribution track for the tracked product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Stable releases.
    Release,
    /// The retired beta track (no new builds since 1.19.34.0).
    Beta,
    /// Preview builds.
    Preview,
}

impl Channel {
    /// Every channel in database order.
    pub const ALL: [Self; 3] = [Self::Release, Self::Beta, Self::Preview];

    /// Return the lowercase key used in catalog documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Preview => "preview",
        }
    }

    /// Return the capitalised label used in commit messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Beta => "Beta",
            Self::Preview => "Preview",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vendor prefix in front of a package moniker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorPrefix {
    /// `Microsoft.MinecraftUWP`: releases and betas.
    Uwp,
    /// `Microsoft.MinecraftWindowsBeta`: previews.
    WindowsBeta,
}

const VENDOR_PREFIXES: &[(&str, VendorPrefix)] = &[
    ("Microsoft.MinecraftUWP", VendorPrefix::Uwp),
    ("Microsoft.MinecraftWindowsBeta", VendorPrefix::WindowsBeta),
];

impl VendorPrefix {
    /// Look up a prefix by its exact text.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        VENDOR_PREFIXES
            .iter()
            .find(|(known, _)| *known == text)
            .map(|(_, prefix)| *prefix)
    }

    /// Return the prefix text as it appears in monikers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uwp => "Microsoft.MinecraftUWP",
            Self::WindowsBeta => "Microsoft.MinecraftWindowsBeta",
        }
    }

    /// Resolve the channel for this prefix given the channel the caller
    /// expects the identifier to belong to.
    ///
    /// Returns `None` when the prefix never publishes into `expected`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedrock_db::channel::{Channel, VendorPrefix};
    ///
    /// assert_eq!(VendorPrefix::Uwp.resolve(Channel::Beta), Some(Channel::Beta));
    /// assert_eq!(VendorPrefix::WindowsBeta.resolve(Channel::Release), None);
    /// ```
    #[must_use]
    pub const fn resolve(self, expected: Channel) -> Option<Channel> {
        match (self, expected) {
            (Self::Uwp, Channel::Release) => Some(Channel::Release),
            (Self::Uwp, Channel::Beta) => Some(Channel::Beta),
            (Self::WindowsBeta, Channel::Preview) => Some(Channel::Preview),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::release(Channel::Release, "release", "Release")]
    #[case::beta(Channel::Beta, "beta", "Beta")]
    #[case::preview(Channel::Preview, "preview", "Preview")]
    fn channel_names(#[case] channel: Channel, #[case] key: &str, #[case] label: &str) {
        assert_eq!(channel.as_str(), key);
        assert_eq!(channel.label(), label);
        assert_eq!(channel.to_string(), key);
    }

    #[test]
    fn channel_serialises_lowercase() {
        let json = serde_json::to_string(&Channel::Preview).expect("serialise");
        assert_eq!(json, "\"preview\"");
    }

    #[rstest]
    #[case("Microsoft.MinecraftUWP", Some(VendorPrefix::Uwp))]
    #[case("Microsoft.MinecraftWindowsBeta", Some(VendorPrefix::WindowsBeta))]
    #[case("Unknown.Thing", None)]
    #[case("microsoft.minecraftuwp", None)]
    fn prefix_lookup(#[case] text: &str, #[case] expected: Option<VendorPrefix>) {
        assert_eq!(VendorPrefix::from_text(text), expected);
    }

    #[rstest]
    #[case(VendorPrefix::Uwp, Channel::Release, Some(Channel::Release))]
    #[case(VendorPrefix::Uwp, Channel::Beta, Some(Channel::Beta))]
    #[case(VendorPrefix::Uwp, Channel::Preview, None)]
    #[case(VendorPrefix::WindowsBeta, Channel::Preview, Some(Channel::Preview))]
    #[case(VendorPrefix::WindowsBeta, Channel::Release, None)]
    fn prefix_resolution(
        #[case] prefix: VendorPrefix,
        #[case] expected: Channel,
        #[case] resolved: Option<Channel>,
    ) {
        assert_eq!(prefix.resolve(expected), resolved);
    }
}
