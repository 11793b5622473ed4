use std::net::Ipv4Addr;

use ipnet::{Ipv4Net, Ipv4Subnets};

use crate::types::AddressKey;

/// Inclusive span of addresses assigned to one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRange {
    start: AddressKey,
    end: AddressKey,
    country_code: String,
}

impl IpRange {
    /// Create a range. Returns `None` when `start > end`.
    pub fn new(
        start: impl Into<AddressKey>,
        end: impl Into<AddressKey>,
        country_code: impl Into<String>,
    ) -> Option<Self> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            return None;
        }
        Some(Self {
            start,
            end,
            country_code: country_code.into(),
        })
    }

    pub fn start(&self) -> AddressKey {
        self.start
    }

    pub fn end(&self) -> AddressKey {
        self.end
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Check if the key lies within `start..=end`
    pub fn contains(&self, key: AddressKey) -> bool {
        self.start <= key && key <= self.end
    }

    /// Smallest set of CIDR blocks covering exactly this range.
    pub fn cidrs(&self) -> Vec<Ipv4Net> {
        Ipv4Subnets::new(Ipv4Addr::from(self.start), Ipv4Addr::from(self.end), 0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_inclusive_bounds() {
        let range = IpRange::new(100u32, 200u32, "US").unwrap();
        assert!(range.contains(AddressKey::from(100)));
        assert!(range.contains(AddressKey::from(150)));
        assert!(range.contains(AddressKey::from(200)));
        assert!(!range.contains(AddressKey::from(99)));
        assert!(!range.contains(AddressKey::from(201)));
    }

    #[test]
    fn test_range_single_address() {
        let range = IpRange::new(7u32, 7u32, "DE").unwrap();
        assert!(range.contains(AddressKey::from(7)));
        assert!(!range.contains(AddressKey::from(8)));
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        assert!(IpRange::new(10u32, 9u32, "US").is_none());
    }

    #[test]
    fn test_range_cidrs() {
        // 1.0.0.0 - 1.0.0.255
        let range = IpRange::new(16777216u32, 16777471u32, "AU").unwrap();
        let cidrs = range.cidrs();
        assert_eq!(cidrs, vec!["1.0.0.0/24".parse::<Ipv4Net>().unwrap()]);

        // 1.0.1.0 - 1.0.3.255 is not a single block
        let range = IpRange::new(16777472u32, 16778239u32, "CN").unwrap();
        let cidrs: Vec<String> = range.cidrs().iter().map(|n| n.to_string()).collect();
        assert_eq!(cidrs, vec!["1.0.1.0/24", "1.0.2.0/23"]);
    }
}
