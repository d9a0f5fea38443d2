//! Bot configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration that syncs against the production endpoint and
//! keeps its state under the platform data directory.
//!
//! ```toml
//! cookie_path = "/var/lib/bedrock-db-bot/last_cookie.json"
//!
//! [service]
//! timeout_secs = 30
//!
//! [repository]
//! path = "/var/lib/bedrock-db-bot/BedrockDB"
//! remote = "https://github.com/example/BedrockDB.git"
//! token_file = "/etc/bedrock-db-bot/token.txt"
//!
//! [schedule]
//! cycles = 3
//! interval_secs = 600
//! ```

use crate::dirs::BaseDirs;
use crate::error::{BotError, Result};
use bedrock_db::catalog::CATALOG_DOCUMENT;
use bedrock_db::channel::Channel;
use bedrock_db_sync::client::{PREVIEW_CATEGORY_ID, RELEASE_CATEGORY_ID, SECURED_URL, SyncSettings};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

/// File name looked up in the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
const COOKIE_FILE_NAME: &str = "last_cookie.json";
const REPOSITORY_DIR_NAME: &str = "BedrockDB";

/// Top-level bot configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Where the session cookie is kept [default: `<data dir>/last_cookie.json`].
    pub cookie_path: Option<Utf8PathBuf>,
    /// Update service settings.
    pub service: ServiceConfig,
    /// Database repository settings.
    pub repository: RepositoryConfig,
    /// Polling schedule.
    pub schedule: ScheduleConfig,
}

/// Update service settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Endpoint every envelope is posted to.
    pub url: String,
    /// Category ids used as the SyncUpdates filter.
    pub category_ids: Vec<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: SECURED_URL.to_owned(),
            category_ids: vec![
                RELEASE_CATEGORY_ID.to_owned(),
                PREVIEW_CATEGORY_ID.to_owned(),
            ],
            timeout_secs: 60,
        }
    }
}

impl ServiceConfig {
    /// Return the session settings for the sync client.
    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            url: self.url.clone(),
            category_ids: self.category_ids.clone(),
        }
    }

    /// Return the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Database repository settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Local clone [default: `<data dir>/BedrockDB`].
    pub path: Option<Utf8PathBuf>,
    /// Clone source used when the local clone is missing.
    pub remote: Option<String>,
    /// Branch to reset to and push.
    pub branch: String,
    /// File whose first line is the push access token.
    pub token_file: Option<Utf8PathBuf>,
    /// Release identifier sequence.
    pub releases: String,
    /// Beta identifier sequence.
    pub betas: String,
    /// Preview identifier sequence.
    pub previews: String,
    /// Version catalog.
    pub versions: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            remote: None,
            branch: "main".to_owned(),
            token_file: None,
            releases: "releases.json".to_owned(),
            betas: "betas.json".to_owned(),
            previews: "previews.json".to_owned(),
            versions: CATALOG_DOCUMENT.to_owned(),
        }
    }
}

impl RepositoryConfig {
    /// Return the document holding `channel`'s identifier sequence.
    #[must_use]
    pub fn channel_document(&self, channel: Channel) -> &str {
        match channel {
            Channel::Release => &self.releases,
            Channel::Beta => &self.betas,
            Channel::Preview => &self.previews,
        }
    }
}

/// Polling schedule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Number of cycles per invocation.
    pub cycles: u32,
    /// Pause between cycles in seconds.
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cycles: 3,
            interval_secs: 600,
        }
    }
}

impl ScheduleConfig {
    /// Return the pause between cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Filesystem locations derived from the configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPaths {
    /// Session cookie file.
    pub cookie: Utf8PathBuf,
    /// Local repository clone.
    pub repository: Utf8PathBuf,
}

impl BotConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] when the text is not a valid configuration.
    pub fn from_toml(path: &Utf8Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BotError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Load the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BotError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::from_toml(path, &text)
    }

    /// Load `explicit` when given, otherwise the file in the configuration
    /// directory when it exists, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] when a selected file is unreadable or
    /// invalid.
    pub fn discover(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match dirs
            .config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the cookie and repository locations, filling gaps from the
    /// platform data directory.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::DataDirUnavailable`] when a location is unset and
    /// no data directory exists.
    pub fn resolve_paths(&self, dirs: &dyn BaseDirs) -> Result<ResolvedPaths> {
        let data_dir = || dirs.data_dir().ok_or(BotError::DataDirUnavailable);
        let cookie = match &self.cookie_path {
            Some(path) => path.clone(),
            None => data_dir()?.join(COOKIE_FILE_NAME),
        };
        let repository = match &self.repository.path {
            Some(path) => path.clone(),
            None => data_dir()?.join(REPOSITORY_DIR_NAME),
        };
        Ok(ResolvedPaths { cookie, repository })
    }
}
