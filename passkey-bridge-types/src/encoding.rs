//! Base64URL encoding of byte payloads that cross the boundary as text.
//!
//! The rule is bit-exact by contract: standard Base64 alphabet with `+`→`-`
//! and `/`→`_`, all padding stripped. Decoding tolerates optional padding so
//! that any standards-following caller can round-trip the fields.

use data_encoding::{Specification, BASE64URL, BASE64URL_NOPAD};

/// Encode bytes as Base64URL without padding.
pub fn base64url(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Decode a Base64URL string, with or without padding.
pub fn try_from_base64url(input: &str) -> Option<Vec<u8>> {
    let specs = BASE64URL.specification();
    let padding = specs.padding?;
    let specs = Specification {
        check_trailing_bits: false,
        padding: None,
        ..specs
    };
    let encoding = specs.encoding().ok()?;
    let sane_string = input.trim_end_matches(padding);
    encoding.decode(sane_string.as_bytes()).ok()
}
