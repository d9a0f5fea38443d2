//! Response decoding.
//!
//! Element lookups match on local names so the decoders do not depend on
//! the prefixes the service picks. A fault body always wins over field
//! parsing.

use crate::cookie::Cookie;
use crate::error::{Result, SyncError};
use bedrock_db::record::UpdateRecord;
use log::warn;
use roxmltree::{Document, Node};

/// Reason reported when a fault carries no readable text.
pub const UNKNOWN_FAULT_REASON: &str = "An unknown error has occurred";

/// Decoded SyncUpdates result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpdatesResult {
    /// Update records, in response order.
    pub new_updates: Vec<UpdateRecord>,
    /// Replacement session cookie.
    pub new_cookie: Cookie,
}

/// Decoded GetConfig result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResult {
    /// Opaque configuration change marker passed on to GetCookie.
    pub last_change: String,
}

/// Normalise a fault reason: trim, fall back to a generic message, and make
/// sure it ends with exactly one period.
///
/// # Examples
///
/// ```
/// use bedrock_db_sync::envelope::response::normalize_fault_reason;
///
/// assert_eq!(normalize_fault_reason(Some(" Cookie expired ")), "Cookie expired.");
/// assert_eq!(normalize_fault_reason(Some("Done.")), "Done.");
/// assert_eq!(normalize_fault_reason(None), "An unknown error has occurred.");
/// ```
#[must_use]
pub fn normalize_fault_reason(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).filter(|text| !text.is_empty());
    let mut reason = trimmed.unwrap_or(UNKNOWN_FAULT_REASON).to_owned();
    if !reason.ends_with('.') {
        reason.push('.');
    }
    reason
}

/// Extract the normalised fault reason from a response body of any shape.
///
/// Bodies that are not XML, or carry no fault text, yield the generic reason.
#[must_use]
pub fn fault_reason_from_text(body: &str) -> String {
    let raw = Document::parse(body).ok().and_then(|doc| {
        descend(doc.root_element(), &["Body", "Fault", "Reason", "Text"])
            .and_then(|node| node.text())
            .map(str::to_owned)
    });
    normalize_fault_reason(raw.as_deref())
}

fn parse<'a>(operation: &'static str, body: &'a str) -> Result<Document<'a>> {
    Document::parse(body).map_err(|e| SyncError::ProtocolParse {
        operation,
        reason: e.to_string(),
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn descend<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| child(current, name))
}

fn non_empty_text<'a>(node: Node<'a, '_>, path: &[&str]) -> Option<&'a str> {
    descend(node, path)
        .and_then(|n| n.text())
        .filter(|text| !text.is_empty())
}

fn check_fault(root: Node<'_, '_>) -> Result<()> {
    match descend(root, &["Body", "Fault"]) {
        Some(fault) => Err(SyncError::ProtocolFault {
            reason: normalize_fault_reason(
                descend(fault, &["Reason", "Text"]).and_then(|n| n.text()),
            ),
        }),
        None => Ok(()),
    }
}

fn missing(operation: &'static str, what: &str) -> SyncError {
    SyncError::ProtocolParse {
        operation,
        reason: format!("no {what} value was found"),
    }
}

/// Decode the embedded update fragment of one `NewUpdates` entry.
///
/// Returns `None` for entries without a fragment or without an update id
/// and package moniker.
fn decode_update_info(entry: Node<'_, '_>) -> Option<UpdateRecord> {
    let xml = non_empty_text(entry, &["Xml"])?;
    let wrapped = format!("<Xml>{xml}</Xml>");
    let fragment = match Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("skipping update entry with malformed fragment: {e}");
            return None;
        }
    };
    let root = fragment.root_element();
    let id = child(root, "UpdateIdentity")?.attribute("UpdateID")?;
    let moniker = descend(
        root,
        &[
            "ApplicabilityRules",
            "Metadata",
            "AppxPackageMetadata",
            "AppxMetadata",
        ],
    )?
    .attribute("PackageMoniker")?;
    if id.is_empty() || moniker.is_empty() {
        return None;
    }
    Some(UpdateRecord::new(id, moniker))
}

/// Decode a SyncUpdates response.
///
/// # Errors
///
/// Returns [`SyncError::ProtocolFault`] for a fault body, and
/// [`SyncError::ProtocolParse`] when the update list or the renewed cookie
/// is absent.
pub fn decode_sync_updates_response(body: &str) -> Result<SyncUpdatesResult> {
    const OPERATION: &str = "SyncUpdates";
    let doc = parse(OPERATION, body)?;
    let root = doc.root_element();
    check_fault(root)?;

    let result = descend(root, &["Body", "SyncUpdatesResponse", "SyncUpdatesResult"])
        .ok_or_else(|| missing(OPERATION, "SyncUpdatesResult"))?;
    let new_updates = child(result, "NewUpdates")
        .ok_or_else(|| missing(OPERATION, "NewUpdates"))?
        .children()
        .filter(Node::is_element)
        .filter_map(decode_update_info)
        .collect();

    let encrypted_data = non_empty_text(result, &["NewCookie", "EncryptedData"]);
    let expiration = non_empty_text(result, &["NewCookie", "Expiration"]);
    let (Some(encrypted_data), Some(expiration)) = (encrypted_data, expiration) else {
        return Err(missing(
            OPERATION,
            "NewCookie/EncryptedData or NewCookie/Expiration",
        ));
    };

    Ok(SyncUpdatesResult {
        new_updates,
        new_cookie: Cookie::new(encrypted_data, expiration),
    })
}

/// Decode a GetCookie response.
///
/// # Errors
///
/// Returns [`SyncError::ProtocolFault`] for a fault body, and
/// [`SyncError::ProtocolParse`] when either cookie field is absent.
pub fn decode_get_cookie_response(body: &str) -> Result<Cookie> {
    const OPERATION: &str = "GetCookie";
    let doc = parse(OPERATION, body)?;
    let root = doc.root_element();
    check_fault(root)?;

    let result = descend(root, &["Body", "GetCookieResponse", "GetCookieResult"]);
    let field = |name: &str| result.and_then(|r| non_empty_text(r, &[name]));
    match (field("EncryptedData"), field("Expiration")) {
        (Some(encrypted_data), Some(expiration)) => Ok(Cookie::new(encrypted_data, expiration)),
        _ => Err(missing(OPERATION, "EncryptedData or Expiration")),
    }
}

/// Decode a GetConfig response.
///
/// # Errors
///
/// Returns [`SyncError::ProtocolFault`] for a fault body, and
/// [`SyncError::ProtocolParse`] when `LastChange` is absent.
pub fn decode_get_config_response(body: &str) -> Result<ConfigResult> {
    const OPERATION: &str = "GetConfig";
    let doc = parse(OPERATION, body)?;
    let root = doc.root_element();
    check_fault(root)?;

    non_empty_text(
        root,
        &["Body", "GetConfigResponse", "GetConfigResult", "LastChange"],
    )
    .map(|last_change| ConfigResult {
        last_change: last_change.to_owned(),
    })
    .ok_or_else(|| missing(OPERATION, "LastChange"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SYNC_UPDATES: &str = include_str!("../../tests/fixtures/sync_updates_response.xml");
    const GET_COOKIE: &str = include_str!("../../tests/fixtures/get_cookie_response.xml");
    const GET_CONFIG: &str = include_str!("../../tests/fixtures/get_config_response.xml");
    const FAULT: &str = include_str!("../../tests/fixtures/fault_response.xml");

    fn envelope(body: &str) -> String {
        format!(
            "<s:Envelope xmlns:s=\"http://www.w3.org/2003/05/soap-envelope\"><s:Body>{body}</s:Body></s:Envelope>"
        )
    }

    #[rstest]
    #[case::missing_period(Some("Cookie expired"), "Cookie expired.")]
    #[case::has_period(Some("Cookie expired."), "Cookie expired.")]
    #[case::padded(Some("  Server busy \n"), "Server busy.")]
    #[case::blank(Some("   "), "An unknown error has occurred.")]
    #[case::absent(None, "An unknown error has occurred.")]
    fn fault_reasons_are_normalised(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(normalize_fault_reason(raw), expected);
    }

    #[test]
    fn decodes_updates_and_renewed_cookie() {
        let result = decode_sync_updates_response(SYNC_UPDATES).expect("decode");

        assert_eq!(
            result.new_updates,
            vec![
                UpdateRecord::new(
                    "a1b2c3d4-0000-0000-0000-000000000001",
                    "Microsoft.MinecraftUWP_1.20.3001.0_x64__8wekyb3d8bbwe"
                ),
                UpdateRecord::new(
                    "a1b2c3d4-0000-0000-0000-000000000002",
                    "Microsoft.VCLibs.140.00_14.0.30704.0_x64__8wekyb3d8bbwe"
                ),
            ]
        );
        assert_eq!(
            result.new_cookie,
            Cookie::new("renewed-cookie-data", "2026-10-24T12:00:00Z")
        );
    }

    #[test]
    fn entries_missing_fields_are_skipped() {
        // The fixture carries one entry without a fragment and one whose
        // fragment has no package moniker.
        let result = decode_sync_updates_response(SYNC_UPDATES).expect("decode");
        assert_eq!(result.new_updates.len(), 2);
    }

    #[test]
    fn missing_new_cookie_is_a_parse_error() {
        let body = envelope(
            "<SyncUpdatesResponse><SyncUpdatesResult><NewUpdates/></SyncUpdatesResult></SyncUpdatesResponse>",
        );
        let err = decode_sync_updates_response(&body).expect_err("expected parse error");
        assert!(matches!(
            err,
            SyncError::ProtocolParse {
                operation: "SyncUpdates",
                ..
            }
        ));
    }

    #[test]
    fn missing_new_updates_is_a_parse_error() {
        let body = envelope(
            "<SyncUpdatesResponse><SyncUpdatesResult><NewCookie><EncryptedData>d</EncryptedData><Expiration>e</Expiration></NewCookie></SyncUpdatesResult></SyncUpdatesResponse>",
        );
        assert!(matches!(
            decode_sync_updates_response(&body),
            Err(SyncError::ProtocolParse { .. })
        ));
    }

    #[test]
    fn decodes_cookie() {
        let cookie = decode_get_cookie_response(GET_COOKIE).expect("decode");
        assert_eq!(
            cookie,
            Cookie::new("bootstrap-cookie-data", "2026-10-17T13:00:00Z")
        );
    }

    #[test]
    fn cookie_without_expiration_is_a_parse_error() {
        let body = envelope(
            "<GetCookieResponse><GetCookieResult><EncryptedData>d</EncryptedData></GetCookieResult></GetCookieResponse>",
        );
        assert!(matches!(
            decode_get_cookie_response(&body),
            Err(SyncError::ProtocolParse {
                operation: "GetCookie",
                ..
            })
        ));
    }

    #[test]
    fn decodes_last_change() {
        let config = decode_get_config_response(GET_CONFIG).expect("decode");
        assert_eq!(config.last_change, "2026-09-30T08:15:00Z");
    }

    #[test]
    fn config_without_last_change_is_a_parse_error() {
        let body = envelope("<GetConfigResponse><GetConfigResult/></GetConfigResponse>");
        assert!(matches!(
            decode_get_config_response(&body),
            Err(SyncError::ProtocolParse { .. })
        ));
    }

    #[rstest]
    #[case::sync_updates(decode_sync_updates_response(FAULT).map(|_| ()))]
    #[case::get_cookie(decode_get_cookie_response(FAULT).map(|_| ()))]
    #[case::get_config(decode_get_config_response(FAULT).map(|_| ()))]
    fn fault_takes_precedence(#[case] outcome: Result<()>) {
        match outcome {
            Err(SyncError::ProtocolFault { reason }) => {
                assert_eq!(reason, "Cookie has expired.");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn fault_reason_from_plain_text_body_is_generic() {
        assert_eq!(
            fault_reason_from_text("<html>Bad gateway</html>"),
            "An unknown error has occurred."
        );
        assert_eq!(fault_reason_from_text(FAULT), "Cookie has expired.");
    }

    #[rstest]
    #[case::sync_updates(decode_sync_updates_response("not xml").map(|_| ()), "SyncUpdates")]
    #[case::get_cookie(decode_get_cookie_response("not xml").map(|_| ()), "GetCookie")]
    #[case::get_config(decode_get_config_response("not xml").map(|_| ()), "GetConfig")]
    fn malformed_document_is_a_parse_error(
        #[case] outcome: Result<()>,
        #[case] expected_operation: &str,
    ) {
        match outcome {
            Err(SyncError::ProtocolParse { operation, .. }) => {
                assert_eq!(operation, expected_operation);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn parsed_document_borrows_the_body() {
        let body = String::from("<root><child>text</child></root>");
        let doc = parse("GetConfig", &body).expect("well-formed body");
        assert_eq!(non_empty_text(doc.root_element(), &["child"]), Some("text"));
    }
}
