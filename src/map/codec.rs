//! Encoded natives.
//!
//! When a flavor has no real platform format, the flavor map invents a
//! native for it by prefixing its MIME type with `JAVA_DATAFLAVOR:`. Any
//! native carrying that prefix is taken to be such an encoding.

use crate::error::Result;
use crate::flavor::DataFlavor;

/// Prefix marking an encoded native.
pub const JAVA_MIME_PREFIX: &str = "JAVA_DATAFLAVOR:";

/// Encodes a MIME type string as a native.
///
/// # Examples
///
/// ```
/// use flavor_map::map::{decode_java_mime_type, encode_java_mime_type};
///
/// let native = encode_java_mime_type("application/x-custom");
/// assert_eq!(native, "JAVA_DATAFLAVOR:application/x-custom");
/// assert_eq!(decode_java_mime_type(&native), Some("application/x-custom"));
/// assert_eq!(decode_java_mime_type("PNG"), None);
/// ```
pub fn encode_java_mime_type(mime_type: &str) -> String {
    format!("{}{}", JAVA_MIME_PREFIX, mime_type)
}

/// Encodes a flavor's full MIME type as a native.
pub fn encode_data_flavor(flavor: &DataFlavor) -> String {
    encode_java_mime_type(&flavor.mime_type())
}

/// Reports whether the native is an encoded MIME type.
pub fn is_java_mime_type(native: &str) -> bool {
    native.starts_with(JAVA_MIME_PREFIX)
}

/// Returns the MIME type encoded in a native, trimmed, or `None` if the
/// native is not encoded.
pub fn decode_java_mime_type(native: &str) -> Option<&str> {
    native.strip_prefix(JAVA_MIME_PREFIX).map(str::trim)
}

/// Decodes the flavor encoded in a native.
///
/// Returns `Ok(None)` for natives without the prefix, and an error if the
/// encoded MIME type does not make a valid flavor.
pub fn decode_data_flavor(native: &str) -> Result<Option<DataFlavor>> {
    decode_java_mime_type(native)
        .map(DataFlavor::new)
        .transpose()
}
