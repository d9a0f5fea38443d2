//! Session client for the Windows Update client web service.
//!
//! The client lists the product packages currently published to the store
//! categories it is configured with, renewing its session cookie as needed.
//!
//! # Modules
//!
//! - [`client`] - Session state machine and the [`client::UpdateSource`] seam
//! - [`cookie`] - Session cookie and its persistence
//! - [`envelope`] - Request builders and response decoders
//! - [`error`] - Error taxonomy and bootstrap classification
//! - [`transport`] - HTTP transport for envelope exchange

pub mod client;
pub mod cookie;
pub mod envelope;
pub mod error;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use client::{SyncClient, SyncSettings, UpdateSource};
pub use cookie::{Cookie, CookieStore, FileCookieStore};
pub use error::SyncError;
pub use transport::{HttpTransport, Transport};
