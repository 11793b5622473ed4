//! IP Guard - connection-time country allow-listing for Rust
//!
//! This library decides whether a connecting IPv4 client may proceed:
//! - Dotted-quad address encoding to 32-bit keys
//! - IP-range-to-country lookup over an IP2Location LITE DB1 style CSV table
//! - Country allow-list with per-address exclusions
//! - YAML/JSON configuration and a host-facing connection guard
//!
//! # Example
//!
//! ```rust
//! use ipguard::{AccessPolicy, Decision, DenyReason, RangeTable};
//!
//! let table = RangeTable::load_str(
//!     "\"16777216\",\"33554431\",\"US\",\"United States of America\"\n\
//!      \"134217728\",\"150994943\",\"RU\",\"Russian Federation\"\n",
//! )
//! .unwrap();
//!
//! let policy = AccessPolicy::builder()
//!     .allowed_countries(["US"])
//!     .excluded_addresses(["8.8.8.8"])
//!     .table(table)
//!     .build();
//!
//! assert_eq!(policy.evaluate("1.1.1.1"), Decision::Allow);
//! assert_eq!(policy.evaluate("8.8.8.8"), Decision::Allow);
//! assert_eq!(
//!     policy.evaluate("8.8.4.4"),
//!     Decision::Deny(DenyReason::CountryNotPermitted { country: "RU".into() })
//! );
//! ```
//!
//! # Decision order
//!
//! | Step | Condition | Result |
//! |------|-----------|--------|
//! | 1 | address encodes and is excluded | Allow |
//! | 2 | address does not encode | Deny (unparseable address) |
//! | 3 | no range contains the address | Deny (no geolocation match) |
//! | 4 | range country is allowed | Allow |
//! | 5 | otherwise | Deny (country not permitted) |

pub mod codec;
pub mod config;
pub mod error;
pub mod geo;
pub mod guard;
pub mod policy;
pub mod types;

// Re-export commonly used items
pub use codec::{decode, encode};
pub use config::{
    ConfigFormat, GuardConfig, TableFailureMode, CURRENT_CONFIG_VERSION, DEFAULT_DENY_MESSAGE,
};
pub use error::{GuardError, Result, TableErrorKind};
pub use geo::{
    FileTableLoader, IpRange, MemoryTableLoader, NilTableLoader, RangeTable, TableLoader,
    DEFAULT_TABLE_DIR, DEFAULT_TABLE_FILENAME,
};
pub use guard::{ConnectionGuard, Verdict};
pub use policy::{AccessPolicy, AccessPolicyBuilder, AllowedCountrySet, ExcludedAddressSet};
pub use types::{AddressKey, Decision, DenyReason};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() {
        let config_text = r#"
allowed-countries:
  - US
  - ca
excluded-ips:
  - 8.8.8.8
  - not-an-ip
Kick-message: "Access denied."
config-version: 2
"#;
        let table_text = "\
\"0\",\"16777215\",\"-\",\"-\"
\"16777216\",\"33554431\",\"US\",\"United States of America\"
\"33554432\",\"50331647\",\"CA\",\"Canada\"
\"134217728\",\"150994943\",\"RU\",\"Russian Federation\"
";

        let config = GuardConfig::from_yaml_str(config_text).unwrap();
        let guard = ConnectionGuard::from_config(&config, &MemoryTableLoader::new(table_text));

        let policy = guard.policy().unwrap();
        assert_eq!(policy.allowed_countries().len(), 2);
        assert_eq!(policy.excluded_addresses().len(), 1);
        assert_eq!(policy.table().len(), 4);

        // US and CA ranges -> allowed
        assert!(guard.check("1.2.3.4").is_allowed());
        assert!(guard.check("2.0.0.1").is_allowed());

        // Excluded, although RU
        assert!(guard.check("8.8.8.8").is_allowed());

        // RU -> denied with the configured message
        let verdict = guard.check("8.8.4.4");
        assert!(!verdict.is_allowed());
        assert_eq!(verdict.message.as_deref(), Some("Access denied."));

        // Reserved range "-" and gaps -> denied
        assert!(!guard.check("0.0.0.1").is_allowed());
        assert_eq!(
            guard.check("4.0.0.1").decision,
            Decision::Deny(DenyReason::NoGeolocationMatch)
        );
    }
}
