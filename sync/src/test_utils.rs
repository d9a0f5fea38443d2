//! Test doubles for the session client.

use crate::cookie::{Cookie, CookieStore, CookieStoreError};
use crate::envelope::request::Operation;
use crate::error::Result;
use crate::transport::Transport;
use std::cell::RefCell;
use std::collections::VecDeque;

/// One scripted request/response pair.
#[derive(Debug)]
pub struct ExpectedExchange {
    /// The operation the posted envelope must invoke.
    pub operation: Operation,
    /// What the transport returns for it.
    pub response: Result<String>,
}

impl ExpectedExchange {
    /// Expect `operation` and answer with `body`.
    pub fn ok(operation: Operation, body: impl Into<String>) -> Self {
        Self {
            operation,
            response: Ok(body.into()),
        }
    }

    /// Expect `operation` and fail with `error`.
    pub fn err(operation: Operation, error: crate::error::SyncError) -> Self {
        Self {
            operation,
            response: Err(error),
        }
    }
}

/// A [`Transport`] that replays a scripted queue of exchanges.
///
/// Each post is checked against the next expected operation by looking for
/// its action URI in the envelope.
#[derive(Debug, Default)]
pub struct StubTransport {
    expected: RefCell<VecDeque<ExpectedExchange>>,
    posted: RefCell<Vec<Operation>>,
}

impl StubTransport {
    /// Create a transport with the given script.
    pub fn new(expected: Vec<ExpectedExchange>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            posted: RefCell::new(Vec::new()),
        }
    }

    /// Operations posted so far, in order.
    pub fn posted(&self) -> Vec<Operation> {
        self.posted.borrow().clone()
    }

    /// Asserts that the whole script has been consumed.
    ///
    /// # Panics
    ///
    /// Panics if scripted exchanges remain.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further exchanges"
        );
    }
}

impl Transport for StubTransport {
    fn post(&self, _url: &str, body: &str) -> Result<String> {
        let exchange = self
            .expected
            .borrow_mut()
            .pop_front()
            .expect("unexpected request");
        let action = format!("{}<", exchange.operation.action());
        assert!(
            body.contains(&action),
            "expected a {} request",
            exchange.operation.as_str()
        );
        self.posted.borrow_mut().push(exchange.operation);
        exchange.response
    }
}

/// An in-memory [`CookieStore`].
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookie: RefCell<Option<Cookie>>,
    saves: RefCell<usize>,
}

impl MemoryCookieStore {
    /// Create a store holding `cookie`.
    pub fn with_cookie(cookie: Cookie) -> Self {
        Self {
            cookie: RefCell::new(Some(cookie)),
            saves: RefCell::new(0),
        }
    }

    /// The currently stored cookie.
    pub fn current(&self) -> Option<Cookie> {
        self.cookie.borrow().clone()
    }

    /// How many times a cookie was saved.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl CookieStore for MemoryCookieStore {
    fn load(&self) -> std::result::Result<Option<Cookie>, CookieStoreError> {
        Ok(self.current())
    }

    fn save(&self, cookie: &Cookie) -> std::result::Result<(), CookieStoreError> {
        *self.cookie.borrow_mut() = Some(cookie.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// Wrap `body` in a SOAP envelope.
pub fn soap_envelope(body: &str) -> String {
    format!(
        "<s:Envelope xmlns:s=\"http://www.w3.org/2003/05/soap-envelope\"><s:Body>{body}</s:Body></s:Envelope>"
    )
}

/// A GetConfig response carrying `last_change`.
pub fn get_config_response(last_change: &str) -> String {
    soap_envelope(&format!(
        "<GetConfigResponse><GetConfigResult><LastChange>{last_change}</LastChange></GetConfigResult></GetConfigResponse>"
    ))
}

/// A GetCookie response carrying `cookie`.
pub fn get_cookie_response(cookie: &Cookie) -> String {
    soap_envelope(&format!(
        "<GetCookieResponse><GetCookieResult><Expiration>{}</Expiration><EncryptedData>{}</EncryptedData></GetCookieResult></GetCookieResponse>",
        cookie.expiration, cookie.encrypted_data
    ))
}

/// A SyncUpdates response listing `(id, moniker)` pairs and renewing the
/// session with `cookie`.
pub fn sync_updates_response(updates: &[(&str, &str)], cookie: &Cookie) -> String {
    let entries: String = updates
        .iter()
        .map(|(id, moniker)| {
            format!(
                "<UpdateInfo><Xml>&lt;UpdateIdentity UpdateID=\"{id}\" /&gt;&lt;ApplicabilityRules&gt;&lt;Metadata&gt;&lt;AppxPackageMetadata&gt;&lt;AppxMetadata PackageMoniker=\"{moniker}\" /&gt;&lt;/AppxPackageMetadata&gt;&lt;/Metadata&gt;&lt;/ApplicabilityRules&gt;</Xml></UpdateInfo>"
            )
        })
        .collect();
    soap_envelope(&format!(
        "<SyncUpdatesResponse><SyncUpdatesResult><NewUpdates>{entries}</NewUpdates><NewCookie><Expiration>{}</Expiration><EncryptedData>{}</EncryptedData></NewCookie></SyncUpdatesResult></SyncUpdatesResponse>",
        cookie.expiration, cookie.encrypted_data
    ))
}

/// A fault response with the given reason text.
pub fn fault_response(reason: &str) -> String {
    soap_envelope(&format!(
        "<s:Fault><s:Reason><s:Text>{reason}</s:Text></s:Reason></s:Fault>"
    ))
}
