//! Raw identifier parsing.
//!
//! A raw identifier is the display form of an update record:
//! `"<instanceId> <vendorPrefix>_<name>_<architecture>[__<familySuffix>]"`.
//! Parsing either yields a [`ParsedIdentifier`], silently excludes the
//! entry (secondary files and the corrupt legacy version), or fails with
//! [`CatalogError::InvalidIdentifier`] when the string breaks the grammar.

use crate::architecture::Architecture;
use crate::channel::{Channel, VendorPrefix};
use crate::error::{CatalogError, Result};

/// Package family suffix stripped before splitting.
pub const PACKAGE_FAMILY_SUFFIX: &str = "__8wekyb3d8bbwe";

/// Marker carried by secondary (encrypted app) package files.
pub const SECONDARY_FILE_MARKER: &str = ".EAppx";

/// Version suffix of a known corrupt legacy publication.
pub const CORRUPT_VERSION_SUFFIX: &str = ".70";

/// Structured fields of one raw identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedIdentifier {
    /// Version name, for example `1.20.1.0`.
    pub name: String,
    /// Target architecture.
    pub architecture: Architecture,
    /// Channel the identifier belongs to.
    pub channel: Channel,
    /// Server-assigned instance id.
    pub instance_id: String,
}

/// The three underscore-separated moniker fields plus the instance id.
struct RawFields<'a> {
    instance_id: &'a str,
    vendor: &'a str,
    name: &'a str,
    architecture: &'a str,
}

fn split_fields(raw: &str) -> Result<RawFields<'_>> {
    let trimmed = raw.strip_suffix(PACKAGE_FAMILY_SUFFIX).unwrap_or(raw);
    let (instance_id, moniker) = trimmed
        .split_once(' ')
        .ok_or_else(|| CatalogError::invalid_identifier(raw, "missing space after instance id"))?;
    if instance_id.is_empty() {
        return Err(CatalogError::invalid_identifier(raw, "empty instance id"));
    }
    if moniker.contains(' ') {
        return Err(CatalogError::invalid_identifier(
            raw,
            "unexpected space inside moniker",
        ));
    }

    let fields: Vec<&str> = moniker.split('_').collect();
    let &[vendor, name, architecture] = fields.as_slice() else {
        return Err(CatalogError::invalid_identifier(
            raw,
            format!(
                "expected 3 underscore-separated fields, found {}",
                fields.len()
            ),
        ));
    };
    if name.is_empty() {
        return Err(CatalogError::invalid_identifier(raw, "empty version name"));
    }

    Ok(RawFields {
        instance_id,
        vendor,
        name,
        architecture,
    })
}

/// Parse one raw identifier expected to belong to `expected`.
///
/// Returns `Ok(None)` for entries that are deliberately excluded from the
/// catalog.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidIdentifier`] when the string does not
/// match the grammar, names an unknown architecture, or carries a vendor
/// prefix that never publishes into `expected`.
///
/// # Examples
///
/// ```
/// use bedrock_db::architecture::Architecture;
/// use bedrock_db::channel::Channel;
/// use bedrock_db::identifier::parse_identifier;
///
/// let parsed = parse_identifier(
///     "abc Microsoft.MinecraftUWP_1.20.1.0_x64__8wekyb3d8bbwe",
///     Channel::Release,
/// )
/// .expect("well-formed identifier")
/// .expect("not excluded");
/// assert_eq!(parsed.name, "1.20.1.0");
/// assert_eq!(parsed.architecture, Architecture::X64);
/// ```
pub fn parse_identifier(raw: &str, expected: Channel) -> Result<Option<ParsedIdentifier>> {
    if raw.contains(SECONDARY_FILE_MARKER) {
        return Ok(None);
    }

    let fields = split_fields(raw)?;
    let prefix = VendorPrefix::from_text(fields.vendor).ok_or_else(|| {
        CatalogError::invalid_identifier(
            raw,
            format!("unknown vendor prefix \"{}\"", fields.vendor),
        )
    })?;
    let channel = prefix.resolve(expected).ok_or_else(|| {
        CatalogError::invalid_identifier(
            raw,
            format!(
                "vendor prefix \"{}\" does not publish {expected} builds",
                prefix.as_str()
            ),
        )
    })?;
    let architecture = Architecture::from_moniker(fields.architecture).ok_or_else(|| {
        CatalogError::invalid_identifier(
            raw,
            format!("unknown architecture \"{}\"", fields.architecture),
        )
    })?;

    if fields.name.ends_with(CORRUPT_VERSION_SUFFIX) {
        return Ok(None);
    }

    Ok(Some(ParsedIdentifier {
        name: fields.name.to_owned(),
        architecture,
        channel,
        instance_id: fields.instance_id.to_owned(),
    }))
}

/// Parse every raw identifier of one channel, dropping excluded entries.
///
/// # Errors
///
/// Fails on the first identifier that breaks the grammar; no partial
/// output is returned.
pub fn parse_channel(lines: &[String], channel: Channel) -> Result<Vec<ParsedIdentifier>> {
    let mut parsed = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(identifier) = parse_identifier(line, channel)? {
            parsed.push(identifier);
        }
    }
    Ok(parsed)
}

/// Derive the displayed version name of a raw identifier.
///
/// This is the second underscore-separated moniker field after the family
/// suffix is removed, and is what commit messages show.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidIdentifier`] when the string does not
/// match the grammar.
pub fn version_name(raw: &str) -> Result<String> {
    split_fields(raw).map(|fields| fields.name.to_owned())
}
