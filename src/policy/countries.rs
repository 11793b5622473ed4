use std::collections::HashSet;

/// Allow-list of uppercase two-letter country codes
#[derive(Debug, Clone, Default)]
pub struct AllowedCountrySet {
    codes: HashSet<String>,
}

impl AllowedCountrySet {
    /// Build from configured entries. Entries that are not two ASCII letters
    /// are dropped with a warning; the rest are upper-cased.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = HashSet::new();
        for entry in entries {
            let entry = entry.as_ref();
            match normalize(entry) {
                Some(code) => {
                    codes.insert(code);
                }
                None => tracing::warn!(entry, "invalid country code in allowed-countries"),
            }
        }
        Self { codes }
    }

    /// Membership test against a code exactly as the range table spells it
    pub fn contains(&self, country_code: &str) -> bool {
        self.codes.contains(country_code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in sorted order
    pub fn to_sorted_vec(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

fn normalize(entry: &str) -> Option<String> {
    let code = entry.trim();
    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}
