//! SASL PLAIN helpers for the `AUTHENTICATE` exchange.
//!
//! # Reference
//! - IRCv3 SASL: <https://ircv3.net/specs/extensions/sasl-3.1>
//! - RFC 4616 (PLAIN): <https://tools.ietf.org/html/rfc4616>
//!
//! # Example
//!
//! ```
//! use slirc_wire::sasl::{authenticate_payloads, encode_plain};
//!
//! let encoded = encode_plain("user", "pass");
//! assert_eq!(encoded, "AHVzZXIAcGFzcw==");
//! assert_eq!(authenticate_payloads(&encoded), vec!["AHVzZXIAcGFzcw=="]);
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Maximum length of a single `AUTHENTICATE` payload.
pub const SASL_CHUNK_SIZE: usize = 400;

/// Name of the only mechanism this crate drives.
pub const PLAIN: &str = "PLAIN";

/// Base64 of `authzid NUL authcid NUL password` with an empty authzid.
pub fn encode_plain(username: &str, password: &str) -> String {
    let payload = format!("\0{}\0{}", username, password);
    BASE64.encode(payload.as_bytes())
}

/// Split an encoded response into `AUTHENTICATE` payloads.
///
/// Responses are sent in 400-byte pieces. When the last piece is exactly
/// 400 bytes (or the response is empty) a lone `+` follows so the server
/// knows the response is complete.
pub fn authenticate_payloads(encoded: &str) -> Vec<&str> {
    let mut payloads: Vec<&str> = encoded
        .as_bytes()
        .chunks(SASL_CHUNK_SIZE)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    if encoded.len() % SASL_CHUNK_SIZE == 0 {
        payloads.push("+");
    }
    payloads
}

/// Whether the server advertised PLAIN in a `sasl=` CAP value or `908` list.
///
/// An absent or empty list means the server did not say, which is treated
/// as allowed.
pub fn plain_offered(mechanisms: Option<&str>) -> bool {
    match mechanisms {
        None => true,
        Some(list) if list.trim().is_empty() => true,
        Some(list) => list
            .split(',')
            .any(|m| m.trim().eq_ignore_ascii_case(PLAIN)),
    }
}

/// Decode a base64 `AUTHENTICATE` argument (`+` is an empty payload).
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if encoded == "+" {
        return Ok(Vec::new());
    }
    BASE64.decode(encoded)
}
