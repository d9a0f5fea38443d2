//! HTTP transport for envelope exchange.
//!
//! The [`Transport`] trait is the seam tests substitute; [`HttpTransport`]
//! posts envelopes with a shared `ureq` agent.

use crate::envelope::response::fault_reason_from_text;
use crate::error::{Result, SyncError};
use log::debug;
use std::time::Duration;

/// Default timeout for one request, including reading the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest response body accepted. Full SyncUpdates answers exceed ureq's
/// 10 MB default.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

const CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// Posts one serialised envelope and returns the response body.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Post `body` to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] when no response arrives and
    /// [`SyncError::ProtocolFault`] for a non-success status.
    fn post(&self, url: &str, body: &str) -> Result<String>;
}

/// Transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &str) -> Result<String> {
        debug!("posting {} bytes to {url}", body.len());
        let response = self
            .agent
            .post(url)
            .header("content-type", CONTENT_TYPE)
            .send(body)
            .map_err(|e| transport_error(url, &e))?;
        let status = response.status().as_u16();
        let text = response
            .into_body()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| transport_error(url, &e))?;
        interpret_response(status, text)
    }
}

fn transport_error(url: &str, err: &ureq::Error) -> SyncError {
    SyncError::Transport {
        url: url.to_owned(),
        reason: err.to_string(),
    }
}

/// Turn a status and body into the response text, or a fault for any
/// status other than 200.
fn interpret_response(status: u16, body: String) -> Result<String> {
    if status == 200 {
        return Ok(body);
    }
    debug!("service answered with status {status}");
    Err(SyncError::ProtocolFault {
        reason: fault_reason_from_text(&body),
    })
}
