//! Dotted-quad IPv4 text <-> [`AddressKey`].

use crate::types::AddressKey;

/// Encode a dotted-quad IPv4 address.
///
/// Surrounding whitespace is ignored. Anything other than exactly four
/// dot-separated decimal octets in `0..=255` yields `None`.
pub fn encode(text: &str) -> Option<AddressKey> {
    let mut octets = [0u8; 4];
    let mut parts = text.trim().split('.');

    for octet in octets.iter_mut() {
        *octet = parse_octet(parts.next()?)?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(AddressKey::from_octets(octets))
}

/// Decode a key back to dotted-quad text.
pub fn decode(key: AddressKey) -> String {
    key.to_string()
}

fn parse_octet(part: &str) -> Option<u8> {
    // u8::from_str would also accept a leading '+'
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl AddressKey {
    /// Parse dotted-quad text, see [`encode`].
    pub fn parse(text: &str) -> Option<Self> {
        encode(text)
    }
}
