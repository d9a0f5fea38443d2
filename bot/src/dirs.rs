//! Platform directory resolution.
//!
//! The [`BaseDirs`] trait hides `directories-next` so that path defaults can
//! be tested without touching the real home directory.

use camino::Utf8PathBuf;

const QUALIFIER: &str = "";
const ORGANISATION: &str = "";
const APPLICATION: &str = "bedrock-db-bot";

/// Source of per-user application directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory for persistent bot state (cookie, repository clone).
    fn data_dir(&self) -> Option<Utf8PathBuf>;

    /// Directory searched for the default configuration file.
    fn config_dir(&self) -> Option<Utf8PathBuf>;
}

/// [`BaseDirs`] backed by the platform conventions.
///
/// - Linux: `~/.local/share/bedrock-db-bot`, `~/.config/bedrock-db-bot`
/// - macOS: `~/Library/Application Support/bedrock-db-bot`
/// - Windows: `%APPDATA%\bedrock-db-bot`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl SystemBaseDirs {
    fn project() -> Option<directories_next::ProjectDirs> {
        directories_next::ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
    }
}

impl BaseDirs for SystemBaseDirs {
    fn data_dir(&self) -> Option<Utf8PathBuf> {
        Self::project().and_then(|dirs| Utf8PathBuf::try_from(dirs.data_dir().to_path_buf()).ok())
    }

    fn config_dir(&self) -> Option<Utf8PathBuf> {
        Self::project()
            .and_then(|dirs| Utf8PathBuf::try_from(dirs.config_dir().to_path_buf()).ok())
    }
}
