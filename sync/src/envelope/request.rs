//! Request envelopes for the client web service.
//!
//! Every request shares one header shape: WS-Addressing action, message id
//! and destination, plus a WS-Security block with a five-minute timestamp
//! window and an anonymous AAD ticket. Only the body differs per operation.

use super::document::Element;
use crate::cookie::Cookie;
use crate::error::{Result, SyncError};
use chrono::{DateTime, Duration, Utc};

/// Namespace of the client web service operations.
pub const WUCLIENT_NS: &str = "http://www.microsoft.com/SoftwareDistribution/Server/ClientWebService";
const ADDRESSING_NS: &str = "http://www.w3.org/2005/08/addressing";
const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const WSU_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const WUWS_NS: &str = "http://schemas.microsoft.com/msus/2014/10/WindowsUpdateAuthorization";

/// Protocol version announced by GetConfig and GetCookie.
pub const PROTOCOL_VERSION: &str = "1.81";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const SECURITY_WINDOW_MINUTES: i64 = 5;

/// Update ids the client claims to have installed. The service rejects
/// sync requests whose list differs from what a real client sends.
pub const INSTALLED_NON_LEAF_UPDATE_IDS: &[u32] = &[
    1, 2, 3, 11, 19, 2_359_974, 5_169_044, 8_788_830, 23_110_993, 23_110_994, 59_830_006,
    59_830_007, 59_830_008, 60_484_010, 62_450_018, 62_450_019, 62_450_020, 98_959_022,
    98_959_023, 98_959_024, 98_959_025, 98_959_026, 129_905_029, 130_040_030, 130_040_031,
    130_040_032, 130_040_033, 138_372_035, 138_372_036, 139_536_037, 158_941_041, 158_941_042,
    158_941_043, 158_941_044,
    // ARM
    133_399_034, 2_359_977,
];

const DEVICE_ATTRIBUTES: &str = concat!(
    "E:BranchReadinessLevel=CBB&DchuNvidiaGrfxExists=1",
    "&ProcessorIdentifier=Intel64%20Family%206%20Model%2063%20Stepping%202",
    "&CurrentBranch=rs4_release&DataVer_RS5=1942&FlightRing=Retail&AttrDataVer=57",
    "&InstallLanguage=en-US&DchuAmdGrfxExists=1&OSUILocale=en-US&InstallationType=Client",
    "&FlightingBranchName=&Version_RS5=10&UpgEx_RS5=Green&GStatus_RS5=2&OSSkuId=48&App=WU",
    "&InstallDate=1529700913&ProcessorManufacturer=GenuineIntel&AppVer=10.0.17134.471",
    "&OSArchitecture=AMD64&UpdateManagementGroup=2&IsDeviceRetailDemo=0",
    "&HidOverGattReg=C%3A%5CWINDOWS%5CSystem32%5CDriverStore%5CFileRepository",
    "%5Chidbthle.inf_amd64_467f181075371c89%5CMicrosoft.Bluetooth.Profiles.HidOverGatt.dll",
    "&IsFlightingEnabled=0&DchuIntelGrfxExists=1&TelemetryLevel=1&DefaultUserRegion=244",
    "&DeferFeatureUpdatePeriodInDays=365&Bios=Unknown&WuClientVer=10.0.17134.471",
    "&PausedFeatureStatus=1&Steam=URL%3Asteam%20protocol&Free=8to16&OSVersion=10.0.17134.472",
    "&DeviceFamily=Windows.Desktop",
);

const CALLER_ATTRIBUTES: &str = concat!(
    "E:Interactive=1&IsSeeker=1&Acquisition=1&SheddingAware=1",
    "&Id=Acquisition%3BMicrosoft.WindowsStore_8wekyb3d8bbwe&",
);

/// The three service operations the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetch the service configuration (for `LastChange`).
    GetConfig,
    /// Obtain a fresh session cookie.
    GetCookie,
    /// List updates for the requested categories.
    SyncUpdates,
}

impl Operation {
    /// Return the operation's element name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetConfig => "GetConfig",
            Self::GetCookie => "GetCookie",
            Self::SyncUpdates => "SyncUpdates",
        }
    }

    /// Return the WS-Addressing action URI.
    #[must_use]
    pub fn action(self) -> String {
        format!("{WUCLIENT_NS}/{}", self.as_str())
    }
}

/// A built request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    operation: Operation,
    envelope: Element,
}

impl Request {
    /// Return the operation this request invokes.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Return the envelope document.
    #[must_use]
    pub fn envelope(&self) -> &Element {
        &self.envelope
    }

    /// Serialise the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Encode`] if the writer fails.
    pub fn to_xml(&self) -> Result<String> {
        self.envelope.to_xml().map_err(|reason| SyncError::Encode {
            operation: self.operation.as_str(),
            reason,
        })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn header(url: &str, operation: Operation, issued_at: DateTime<Utc>) -> Element {
    let expires_at = issued_at + Duration::minutes(SECURITY_WINDOW_MINUTES);
    let security = Element::new("o:Security")
        .with_attr("s:mustUnderstand", "1")
        .with_attr("xmlns:o", WSSE_NS)
        .with_child(
            Element::new("Timestamp")
                .with_attr("xmlns", WSU_NS)
                .with_child(Element::text_node("Created", timestamp(issued_at)))
                .with_child(Element::text_node("Expires", timestamp(expires_at))),
        )
        .with_child(
            Element::new("wuws:WindowsUpdateTicketsToken")
                .with_attr("wsu:id", "ClientMSA")
                .with_attr("xmlns:wsu", WSU_NS)
                .with_attr("xmlns:wuws", WUWS_NS)
                .with_child(
                    Element::new("TicketType")
                        .with_attr("Name", "AAD")
                        .with_attr("Version", "1.0")
                        .with_attr("Policy", "MBI_SSL"),
                ),
        );

    Element::new("s:Header")
        .with_child(
            Element::text_node("a:Action", operation.action()).with_attr("s:mustUnderstand", "1"),
        )
        .with_child(Element::text_node(
            "a:MessageID",
            format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        ))
        .with_child(Element::text_node("a:To", url).with_attr("s:mustUnderstand", "1"))
        .with_child(security)
}

fn envelope(url: &str, operation: Operation, body: Element, issued_at: DateTime<Utc>) -> Request {
    let envelope = Element::new("s:Envelope")
        .with_attr("xmlns:a", ADDRESSING_NS)
        .with_attr("xmlns:s", SOAP_NS)
        .with_child(header(url, operation, issued_at))
        .with_child(Element::new("s:Body").with_child(body.with_attr("xmlns", WUCLIENT_NS)));
    Request {
        operation,
        envelope,
    }
}

/// Build a GetConfig request.
#[must_use]
pub fn build_get_config(url: &str, issued_at: DateTime<Utc>) -> Request {
    let body = Element::new(Operation::GetConfig.as_str())
        .with_child(Element::text_node("protocolVersion", PROTOCOL_VERSION));
    envelope(url, Operation::GetConfig, body, issued_at)
}

/// Build a GetCookie request carrying the service's `lastChange` value.
#[must_use]
pub fn build_get_cookie(url: &str, last_change: &str, issued_at: DateTime<Utc>) -> Request {
    let body = Element::new(Operation::GetCookie.as_str())
        .with_child(Element::text_node("lastChange", last_change))
        .with_child(Element::text_node("currentTime", timestamp(issued_at)))
        .with_child(Element::text_node("protocolVersion", PROTOCOL_VERSION));
    envelope(url, Operation::GetCookie, body, issued_at)
}

/// Build a SyncUpdates request for the given category filter.
///
/// # Examples
///
/// ```
/// use bedrock_db_sync::cookie::Cookie;
/// use bedrock_db_sync::envelope::request::{Operation, build_sync_updates};
///
/// let request = build_sync_updates(
///     "https://example.test/client.asmx/secured",
///     &Cookie::new("data", "2026-01-01T00:00:00Z"),
///     &["d25480ca-36aa-46e6-b76b-39608d49558c".to_owned()],
///     chrono::Utc::now(),
/// );
/// assert_eq!(request.operation(), Operation::SyncUpdates);
/// ```
#[must_use]
pub fn build_sync_updates(
    url: &str,
    cookie: &Cookie,
    category_ids: &[String],
    issued_at: DateTime<Utc>,
) -> Request {
    let cookie_element = Element::new("cookie")
        .with_child(Element::text_node("Expiration", cookie.expiration.as_str()))
        .with_child(Element::text_node(
            "EncryptedData",
            cookie.encrypted_data.as_str(),
        ));

    let installed = Element::new("InstalledNonLeafUpdateIDs").with_children(
        INSTALLED_NON_LEAF_UPDATE_IDS
            .iter()
            .map(|id| Element::text_node("int", id.to_string())),
    );

    let categories = Element::new("FilterAppCategoryIds").with_children(
        category_ids.iter().map(|id| {
            Element::new("CategoryIdentifier").with_child(Element::text_node("Id", id.as_str()))
        }),
    );

    let extended = Element::new("ExtendedUpdateInfoParameters")
        .with_child(
            Element::new("XmlUpdateFragmentTypes").with_children(
                ["Extended", "LocalizedProperties", "Eula"]
                    .into_iter()
                    .map(|kind| Element::text_node("XmlUpdateFragmentType", kind)),
            ),
        )
        .with_child(
            Element::new("Locales")
                .with_child(Element::text_node("string", "en-US"))
                .with_child(Element::text_node("string", "en")),
        );

    let products = Element::new("ProductsParameters")
        .with_child(Element::text_node("SyncCurrentVersionOnly", "false"))
        .with_child(Element::text_node("DeviceAttributes", DEVICE_ATTRIBUTES))
        .with_child(Element::text_node("CallerAttributes", CALLER_ATTRIBUTES))
        .with_child(Element::new("Products"));

    let parameters = Element::new("parameters")
        .with_child(Element::text_node("ExpressQuery", "false"))
        .with_child(installed)
        .with_child(Element::text_node("SkipSoftwareSync", "false"))
        .with_child(Element::text_node("NeedTwoGroupOutOfScopeUpdates", "true"))
        .with_child(categories)
        .with_child(Element::text_node("TreatAppCategoryIdsAsInstalled", "true"))
        .with_child(Element::text_node("AlsoPerformRegularSync", "false"))
        .with_child(Element::text_node("ComputerSpec", " "))
        .with_child(extended)
        .with_child(
            Element::new("ClientPreferredLanguages")
                .with_child(Element::text_node("string", "en-US")),
        )
        .with_child(products);

    let body = Element::new(Operation::SyncUpdates.as_str())
        .with_child(cookie_element)
        .with_child(parameters);
    envelope(url, Operation::SyncUpdates, body, issued_at)
}
