use std::io::BufRead;

use crate::codec;
use crate::error::{GuardError, Result, TableErrorKind};
use crate::types::AddressKey;

use super::range::IpRange;

/// Minimum number of comma-separated fields in a usable record
const MIN_FIELDS: usize = 4;

/// Ordered collection of IP ranges, in the order the source listed them.
///
/// Sources are expected to be sorted by start address with no overlaps (the
/// IP2Location LITE layout). That is checked once at construction; tables that
/// satisfy it are searched with `partition_point`, anything else falls back to a
/// first-match linear scan. Both give the same answer on well-formed data.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<IpRange>,
    sorted_disjoint: bool,
}

impl RangeTable {
    /// Empty table. Every lookup misses.
    pub fn empty() -> Self {
        Self::from_ranges(Vec::new())
    }

    /// Build a table from ranges already in memory (order is kept).
    pub fn from_ranges(ranges: Vec<IpRange>) -> Self {
        let sorted_disjoint = ranges.windows(2).all(|w| w[0].end() < w[1].start());
        Self {
            ranges,
            sorted_disjoint,
        }
    }

    /// Load `start,end,country,...` records from a delimited text source.
    ///
    /// Lines with fewer than four fields are skipped. A bound that is not an
    /// unsigned integer, does not fit in 32 bits, or a record with
    /// `start > end` aborts the load; nothing parsed so far is returned.
    pub fn load(reader: impl BufRead) -> Result<Self> {
        let mut ranges = Vec::new();
        let mut skipped = 0usize;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = line_num + 1; // 1-based line numbers

            match parse_record(&line, line_num)? {
                Some(range) => ranges.push(range),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped short range table lines");
        }

        let table = Self::from_ranges(ranges);
        if !table.sorted_disjoint {
            tracing::debug!("range table is not sorted and disjoint, using linear lookup");
        }
        Ok(table)
    }

    /// Load from an in-memory string
    pub fn load_str(text: &str) -> Result<Self> {
        Self::load(text.as_bytes())
    }

    /// Find the first range containing the key
    pub fn lookup(&self, key: AddressKey) -> Option<&IpRange> {
        if !self.sorted_disjoint {
            return self.lookup_linear(key);
        }

        // Rightmost range whose start <= key is the only candidate.
        let idx = self.ranges.partition_point(|r| r.start() <= key);
        let candidate = self.ranges.get(idx.checked_sub(1)?)?;
        candidate.contains(key).then_some(candidate)
    }

    /// Reference first-match scan from the beginning of the table.
    pub fn lookup_linear(&self, key: AddressKey) -> Option<&IpRange> {
        self.ranges.iter().find(|r| r.contains(key))
    }

    /// Encode the address text and look it up. Invalid text never matches.
    pub fn lookup_str(&self, text: &str) -> Option<&IpRange> {
        codec::encode(text).and_then(|key| self.lookup(key))
    }

    /// Country code of the range containing the key
    pub fn country_of(&self, key: AddressKey) -> Option<&str> {
        self.lookup(key).map(IpRange::country_code)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpRange> {
        self.ranges.iter()
    }

    /// Whether lookups take the binary search path
    pub fn is_sorted_disjoint(&self) -> bool {
        self.sorted_disjoint
    }
}

/// Parse one record. `Ok(None)` means the line is too short and is skipped.
fn parse_record(line: &str, line_num: usize) -> Result<Option<IpRange>> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Ok(None);
    }

    let start = parse_bound(fields[0], "start", line_num)?;
    let end = parse_bound(fields[1], "end", line_num)?;
    let country_code = unquote(fields[2]);

    IpRange::new(start, end, country_code)
        .map(Some)
        .ok_or_else(|| invalid_data(line_num, format!("start {} is after end {}", start, end)))
}

fn parse_bound(field: &str, name: &str, line_num: usize) -> Result<u32> {
    let value = unquote(field);
    let wide: u64 = value
        .parse()
        .map_err(|_| invalid_data(line_num, format!("invalid {} address {:?}", name, value)))?;
    u32::try_from(wide).map_err(|_| {
        invalid_data(
            line_num,
            format!("{} address {} exceeds the IPv4 range", name, wide),
        )
    })
}

/// Strip surrounding whitespace and double quotes
fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn invalid_data(line: usize, message: String) -> GuardError {
    GuardError::TableLoad {
        kind: TableErrorKind::InvalidData,
        line: Some(line),
        message,
    }
}
