use std::fmt;
use std::net::Ipv4Addr;

/// 32-bit key for an IPv4 address, octets packed most-significant-first.
///
/// Only [`crate::codec::encode`] (or a conversion from [`Ipv4Addr`]) produces
/// one, so a key always corresponds to four valid octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressKey(u32);

impl AddressKey {
    /// Pack four octets.
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(octets))
    }

    /// Raw key value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Unpack into four octets
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for AddressKey {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Ipv4Addr> for AddressKey {
    fn from(ip: Ipv4Addr) -> Self {
        Self(u32::from(ip))
    }
}

impl From<AddressKey> for Ipv4Addr {
    fn from(key: AddressKey) -> Self {
        Ipv4Addr::from(key.0)
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Why a connection was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The address is not a valid dotted-quad IPv4 address
    UnparseableAddress,
    /// No range in the table contains the address
    NoGeolocationMatch,
    /// The address resolved to a country outside the allow-list
    CountryNotPermitted { country: String },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::UnparseableAddress => write!(f, "unparseable address"),
            DenyReason::NoGeolocationMatch => write!(f, "no geolocation match"),
            DenyReason::CountryNotPermitted { country } => {
                write!(f, "country {} not permitted", country)
            }
        }
    }
}

/// Outcome of evaluating one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Deny reason, or `None` for an allowed connection
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Deny(reason) => write!(f, "deny: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_key_octets() {
        let key = AddressKey::from_octets([192, 168, 1, 10]);
        assert_eq!(key.value(), (192 << 24) | (168 << 16) | (1 << 8) | 10);
        assert_eq!(key.octets(), [192, 168, 1, 10]);
        assert_eq!(key.to_string(), "192.168.1.10");
    }

    #[test]
    fn test_address_key_ipv4_conversion() {
        let ip = Ipv4Addr::new(8, 8, 4, 4);
        let key = AddressKey::from(ip);
        assert_eq!(key, AddressKey::from_octets([8, 8, 4, 4]));
        assert_eq!(Ipv4Addr::from(key), ip);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Allow.to_string(), "allow");
        let deny = Decision::Deny(DenyReason::CountryNotPermitted {
            country: "RU".into(),
        });
        assert_eq!(deny.to_string(), "deny: country RU not permitted");
        assert!(!deny.is_allowed());
        assert_eq!(
            Decision::Deny(DenyReason::NoGeolocationMatch).deny_reason(),
            Some(&DenyReason::NoGeolocationMatch)
        );
        assert_eq!(Decision::Allow.deny_reason(), None);
    }
}
