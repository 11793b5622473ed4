use std::collections::HashSet;

use crate::codec;
use crate::types::AddressKey;

/// Addresses that bypass the country check entirely
#[derive(Debug, Clone, Default)]
pub struct ExcludedAddressSet {
    keys: HashSet<AddressKey>,
}

impl ExcludedAddressSet {
    /// Build from configured dotted-quad entries. Entries that do not encode
    /// are dropped with a warning.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = HashSet::new();
        for entry in entries {
            let entry = entry.as_ref();
            match codec::encode(entry) {
                Some(key) => {
                    keys.insert(key);
                }
                None => tracing::warn!(entry, "invalid IP in excluded-ips"),
            }
        }
        Self { keys }
    }

    pub fn contains(&self, key: AddressKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
