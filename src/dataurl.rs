use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Decodes a `data:<mime>;base64,<payload>` string into raw bytes.
///
/// Only the structural shape is validated: there must be exactly one comma
/// separating the metadata prefix from the payload. The mime type itself is
/// not inspected.
pub fn decode(data_url: &str) -> Result<Vec<u8>> {
    let mut parts = data_url.splitn(3, ',');
    let (Some(_prefix), Some(payload), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::malformed_input(
            "expected exactly one comma between metadata and payload",
        ));
    };

    STANDARD
        .decode(payload)
        .map_err(|e| Error::malformed_input(format!("base64 payload: {e}")))
}

/// Encodes raw bytes back into a data URL with the given mime type.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
