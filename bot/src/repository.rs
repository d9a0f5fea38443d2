//! Database repository backed by a local git clone.
//!
//! [`DocumentStore`] is the seam the cycle talks to: read a document,
//! replace it, and commit what was replaced. [`GitRepository`] implements it
//! over a working tree that is reset to the remote branch when opened and
//! pushed after each commit. A commit that fails to push is discarded by the
//! next open, so the following cycle sees the change as new again.

use crate::error::{BotError, Result};
use crate::git;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};

/// Reads and replaces the JSON documents of the database.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore {
    /// Return the current text of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be read.
    fn read(&self, name: &str) -> Result<String>;

    /// Replace the text of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be written.
    fn write(&self, name: &str, text: &str) -> Result<()>;

    /// Record the replaced documents `names` under `message`.
    ///
    /// # Errors
    ///
    /// Returns an error when the change cannot be recorded or published.
    fn commit(&self, names: &[String], message: &str) -> Result<()>;
}

/// Reads the access token from the first line of `path`.
///
/// # Errors
///
/// Returns [`BotError::CredentialMissing`] when the file is missing or its
/// first line is blank, and [`BotError::Document`] for other read failures.
pub fn read_token(path: &Utf8Path) -> Result<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BotError::CredentialMissing {
                path: path.to_owned(),
            });
        }
        Err(source) => {
            return Err(BotError::Document {
                path: path.to_owned(),
                source,
            });
        }
    };
    text.lines()
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| BotError::CredentialMissing {
            path: path.to_owned(),
        })
}

/// Where commits are pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PushTarget {
    Origin,
    Authenticated { url: String, token: String },
}

/// Git working tree holding the database documents.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: Utf8PathBuf,
    branch: String,
    push_target: PushTarget,
}

impl GitRepository {
    /// Open the clone at `root`, cloning `remote` first when the directory
    /// is missing, then reset it to the remote `branch`.
    ///
    /// With a `token_file` the token is read up front and pushes go to an
    /// authenticated URL derived from the `origin` remote.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::CredentialMissing`] for an unusable token file,
    /// [`BotError::Git`] when cloning, fetching, or resetting fails, and
    /// [`BotError::Document`] when the clone is missing and no remote is
    /// configured.
    pub fn open(
        root: &Utf8Path,
        remote: Option<&str>,
        branch: &str,
        token_file: Option<&Utf8Path>,
    ) -> Result<Self> {
        let token = token_file.map(read_token).transpose()?;

        if root.join(".git").exists() {
            debug!("resetting database clone at {root} to origin/{branch}");
            git::reset_to_remote(root, branch)?;
        } else if let Some(remote) = remote {
            info!("cloning {remote} into {root}");
            git::clone_repository(remote, branch, root)?;
        } else {
            return Err(BotError::Document {
                path: root.to_owned(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not a git clone and no repository.remote configured",
                ),
            });
        }

        let push_target = match token {
            Some(token) => {
                let origin = git::origin_url(root)?;
                let url = git::authenticated_url(&origin, &token).ok_or_else(|| BotError::Git {
                    operation: "push",
                    message: format!("origin {origin} is not an HTTPS remote; cannot use a token"),
                })?;
                PushTarget::Authenticated { url, token }
            }
            None => PushTarget::Origin,
        };

        Ok(Self {
            root: root.to_owned(),
            branch: branch.to_owned(),
            push_target,
        })
    }

    /// Return the working tree root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

impl DocumentStore for GitRepository {
    fn read(&self, name: &str) -> Result<String> {
        let path = self.path_of(name);
        std::fs::read_to_string(&path).map_err(|source| BotError::Document { path, source })
    }

    fn write(&self, name: &str, text: &str) -> Result<()> {
        let path = self.path_of(name);
        std::fs::write(&path, text).map_err(|source| BotError::Document { path, source })
    }

    fn commit(&self, names: &[String], message: &str) -> Result<()> {
        let paths: Vec<&str> = names.iter().map(String::as_str).collect();
        git::add(&self.root, &paths)?;
        if !git::has_staged_changes(&self.root)? {
            info!("nothing to commit");
            return Ok(());
        }
        git::commit(&self.root, message)?;
        match &self.push_target {
            PushTarget::Origin => git::push(&self.root, "origin", &self.branch, None)?,
            PushTarget::Authenticated { url, token } => {
                git::push(&self.root, url, &self.branch, Some(token))?;
            }
        }
        info!("pushed \"{message}\" to {}", self.branch);
        Ok(())
    }
}
