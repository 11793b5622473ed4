//! Access policy.
//!
//! Decides whether a connecting address may proceed, based on an exclusion
//! set, the range table and a country allow-list.

mod countries;
mod exclusions;

use std::net::IpAddr;

pub use countries::AllowedCountrySet;
pub use exclusions::ExcludedAddressSet;

use crate::codec;
use crate::geo::RangeTable;
use crate::types::{Decision, DenyReason};

/// Immutable allow/deny policy.
///
/// Built once with [`AccessPolicy::builder`] and then shared by reference;
/// evaluation touches no mutable state, so it is safe from any number of
/// threads at once.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allowed: AllowedCountrySet,
    excluded: ExcludedAddressSet,
    table: RangeTable,
}

impl AccessPolicy {
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Evaluate a connection from the given textual address
    pub fn evaluate(&self, address: &str) -> Decision {
        let key = codec::encode(address);

        // Exclusions win over everything else, including unknown countries.
        if key.is_some_and(|k| self.excluded.contains(k)) {
            return Decision::Allow;
        }

        let Some(key) = key else {
            return Decision::Deny(DenyReason::UnparseableAddress);
        };

        let Some(range) = self.table.lookup(key) else {
            return Decision::Deny(DenyReason::NoGeolocationMatch);
        };

        if self.allowed.contains(range.country_code()) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::CountryNotPermitted {
                country: range.country_code().to_string(),
            })
        }
    }

    /// Evaluate a socket peer address.
    ///
    /// IPv4-mapped IPv6 addresses are treated as IPv4; any other IPv6 address
    /// cannot be encoded and is denied.
    pub fn evaluate_ip(&self, ip: IpAddr) -> Decision {
        match ip.to_canonical() {
            IpAddr::V4(v4) => self.evaluate(&v4.to_string()),
            IpAddr::V6(_) => Decision::Deny(DenyReason::UnparseableAddress),
        }
    }

    pub fn allowed_countries(&self) -> &AllowedCountrySet {
        &self.allowed
    }

    pub fn excluded_addresses(&self) -> &ExcludedAddressSet {
        &self.excluded
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }
}

/// Builder for [`AccessPolicy`]
#[derive(Debug)]
pub struct AccessPolicyBuilder {
    allowed: AllowedCountrySet,
    excluded: ExcludedAddressSet,
    table: RangeTable,
    verbose: bool,
}

impl Default for AccessPolicyBuilder {
    fn default() -> Self {
        Self {
            allowed: AllowedCountrySet::default(),
            excluded: ExcludedAddressSet::default(),
            table: RangeTable::default(),
            verbose: true,
        }
    }
}

impl AccessPolicyBuilder {
    /// Set the country allow-list
    pub fn allowed_countries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed = AllowedCountrySet::from_entries(entries);
        self
    }

    /// Set the addresses that bypass the country check
    pub fn excluded_addresses<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded = ExcludedAddressSet::from_entries(entries);
        self
    }

    /// Set the range table
    pub fn table(mut self, table: RangeTable) -> Self {
        self.table = table;
        self
    }

    /// Report loaded counts at `info` (default) or only at `debug`
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> AccessPolicy {
        let countries = self.allowed.to_sorted_vec();
        let excluded = self.excluded.len();
        if countries.is_empty() {
            tracing::warn!("no allowed countries configured, every non-excluded address is denied");
        } else if self.verbose {
            tracing::info!(?countries, "allowed countries loaded");
        } else {
            tracing::debug!(?countries, "allowed countries loaded");
        }
        if self.verbose {
            tracing::info!(count = excluded, "excluded IPs loaded");
        } else {
            tracing::debug!(count = excluded, "excluded IPs loaded");
        }

        AccessPolicy {
            allowed: self.allowed,
            excluded: self.excluded,
            table: self.table,
        }
    }
}
