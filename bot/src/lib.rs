//! Polling bot for the Bedrock version database.
//!
//! The binary wires the sync client from `bedrock-db-sync` and the catalog
//! engine from `bedrock-db` to a git-backed database repository.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML configuration and path resolution
//! - [`cycle`] - One polling cycle and the catalog rebuild
//! - [`dirs`] - Platform directory abstraction
//! - [`error`] - Bot error taxonomy
//! - [`git`] - Git subprocess operations with timeouts
//! - [`logging`] - Logger initialisation
//! - [`publish`] - Guarded document publication
//! - [`repository`] - Document store seam and the git working tree
//! - [`schedule`] - Fixed-count cycle loop

pub mod cli;
pub mod config;
pub mod cycle;
pub mod dirs;
pub mod error;
pub mod git;
pub mod logging;
pub mod publish;
pub mod repository;
pub mod schedule;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
