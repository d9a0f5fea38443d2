//! Session client that lists product updates from the service.
//!
//! The session has two states. With a stored cookie the client goes
//! straight to `SyncUpdates`; without one (or after a transport failure or
//! fault) it bootstraps a fresh cookie through `GetConfig` and `GetCookie`
//! and tries `SyncUpdates` once more. There is no third attempt: cycle-level
//! retry belongs to the caller.

use crate::cookie::{Cookie, CookieStore};
use crate::envelope::request::{Request, build_get_config, build_get_cookie, build_sync_updates};
use crate::envelope::response::{
    SyncUpdatesResult, decode_get_config_response, decode_get_cookie_response,
    decode_sync_updates_response,
};
use crate::error::Result;
use crate::transport::Transport;
use bedrock_db::record::UpdateRecord;
use chrono::Utc;
use log::{debug, info, warn};

/// Secured endpoint of the client web service.
pub const SECURED_URL: &str =
    "https://fe3cr.delivery.mp.microsoft.com/ClientWebService/client.asmx/secured";

/// Category of the release and beta packages.
pub const RELEASE_CATEGORY_ID: &str = "d25480ca-36aa-46e6-b76b-39608d49558c";

/// Category of the preview packages.
pub const PREVIEW_CATEGORY_ID: &str = "188f32fc-5eaa-45a8-9f78-7dde4322d131";

/// Endpoint and category filter for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Endpoint every envelope is posted to.
    pub url: String,
    /// Category ids passed as the SyncUpdates filter.
    pub category_ids: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            url: SECURED_URL.to_owned(),
            category_ids: vec![
                RELEASE_CATEGORY_ID.to_owned(),
                PREVIEW_CATEGORY_ID.to_owned(),
            ],
        }
    }
}

/// Anything that can produce the current set of product updates.
#[cfg_attr(test, mockall::automock)]
pub trait UpdateSource {
    /// Return the product-family update records currently offered.
    ///
    /// # Errors
    ///
    /// Returns an error when the updates cannot be obtained.
    fn fetch_updates(&self) -> Result<Vec<UpdateRecord>>;
}

#[derive(Debug)]
enum SessionState {
    HaveCookie(Cookie),
    NeedsBootstrap,
}

/// Client for one update-listing session.
pub struct SyncClient<'a> {
    transport: &'a dyn Transport,
    cookies: &'a dyn CookieStore,
    settings: SyncSettings,
}

impl<'a> SyncClient<'a> {
    /// Create a client over the given collaborators.
    #[must_use]
    pub fn new(
        transport: &'a dyn Transport,
        cookies: &'a dyn CookieStore,
        settings: SyncSettings,
    ) -> Self {
        Self {
            transport,
            cookies,
            settings,
        }
    }

    /// Return the session settings.
    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn initial_state(&self) -> SessionState {
        match self.cookies.load() {
            Ok(Some(cookie)) => SessionState::HaveCookie(cookie),
            Ok(None) => {
                info!("no stored cookie; bootstrapping a new session");
                SessionState::NeedsBootstrap
            }
            Err(e) => {
                warn!("{e}; bootstrapping a new session");
                SessionState::NeedsBootstrap
            }
        }
    }

    fn exchange(&self, request: &Request) -> Result<String> {
        debug!("calling {}", request.operation().as_str());
        let body = request.to_xml()?;
        self.transport.post(&self.settings.url, &body)
    }

    fn sync_updates(&self, cookie: &Cookie) -> Result<SyncUpdatesResult> {
        let request = build_sync_updates(
            &self.settings.url,
            cookie,
            &self.settings.category_ids,
            Utc::now(),
        );
        decode_sync_updates_response(&self.exchange(&request)?)
    }

    fn bootstrap_cookie(&self) -> Result<Cookie> {
        let config = decode_get_config_response(
            &self.exchange(&build_get_config(&self.settings.url, Utc::now()))?,
        )?;
        decode_get_cookie_response(&self.exchange(&build_get_cookie(
            &self.settings.url,
            &config.last_change,
            Utc::now(),
        ))?)
    }

    fn bootstrap_and_sync(&self) -> Result<SyncUpdatesResult> {
        let cookie = self.bootstrap_cookie()?;
        self.sync_updates(&cookie)
    }
}

impl UpdateSource for SyncClient<'_> {
    fn fetch_updates(&self) -> Result<Vec<UpdateRecord>> {
        let result = match self.initial_state() {
            SessionState::HaveCookie(cookie) => match self.sync_updates(&cookie) {
                Ok(result) => result,
                Err(e) if e.triggers_bootstrap() => {
                    warn!("{e} Trying again with a fresh cookie.");
                    self.bootstrap_and_sync()?
                }
                Err(e) => return Err(e),
            },
            SessionState::NeedsBootstrap => self.bootstrap_and_sync()?,
        };

        self.cookies.save(&result.new_cookie)?;

        let records: Vec<UpdateRecord> = result
            .new_updates
            .into_iter()
            .filter(UpdateRecord::is_product_family)
            .collect();
        info!("{} product update records returned", records.len());
        for record in &records {
            debug!("update record: {record}");
        }
        Ok(records)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
