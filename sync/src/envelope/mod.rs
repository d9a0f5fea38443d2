//! Request builders and response decoders for the client web service.
//!
//! Outbound documents are assembled as [`document::Element`] trees and
//! written with `quick-xml`; inbound documents are read with `roxmltree`.

pub mod document;
pub mod request;
pub mod response;

pub use request::{Operation, Request, build_get_config, build_get_cookie, build_sync_updates};
pub use response::{
    ConfigResult, SyncUpdatesResult, decode_get_config_response, decode_get_cookie_response,
    decode_sync_updates_response,
};
