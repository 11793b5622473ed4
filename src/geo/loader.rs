use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{GuardError, Result, TableErrorKind};

use super::table::RangeTable;

/// Directory the range table and its license companions are deployed into
pub const DEFAULT_TABLE_DIR: &str = "ip2location";

/// File name of the IP2Location LITE DB1 table
pub const DEFAULT_TABLE_FILENAME: &str = "IP2LOCATION-LITE-DB1.CSV";

/// Trait for loading the range table
pub trait TableLoader: Send + Sync {
    /// Load the full range table
    fn load_table(&self) -> Result<RangeTable>;
}

/// File-based TableLoader
#[derive(Debug, Clone, Default)]
pub struct FileTableLoader {
    path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl FileTableLoader {
    /// Create a new FileTableLoader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit table file path (overrides the data directory)
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the data directory; the table is expected at
    /// `<dir>/ip2location/IP2LOCATION-LITE-DB1.CSV`
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Resolved table path
    pub fn table_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.path {
            return Some(path.clone());
        }

        self.data_dir
            .as_ref()
            .map(|dir| dir.join(DEFAULT_TABLE_DIR).join(DEFAULT_TABLE_FILENAME))
    }
}

impl TableLoader for FileTableLoader {
    fn load_table(&self) -> Result<RangeTable> {
        let path = self.table_path().ok_or_else(|| GuardError::TableLoad {
            kind: TableErrorKind::NotConfigured,
            line: None,
            message: "range table path not configured".to_string(),
        })?;

        let file = File::open(&path).map_err(|e| GuardError::TableLoad {
            kind: TableErrorKind::FileError,
            line: None,
            message: format!("failed to open {}: {}", path.display(), e),
        })?;

        let table = RangeTable::load(BufReader::new(file))?;
        tracing::debug!(ranges = table.len(), path = %path.display(), "loaded IP ranges");
        Ok(table)
    }
}

/// Nil TableLoader - returns an error for every load
pub struct NilTableLoader;

impl TableLoader for NilTableLoader {
    fn load_table(&self) -> Result<RangeTable> {
        Err(GuardError::TableLoad {
            kind: TableErrorKind::NotConfigured,
            line: None,
            message: "range table not available".to_string(),
        })
    }
}

/// In-memory TableLoader for testing and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryTableLoader {
    text: String,
}

impl MemoryTableLoader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Append one `start,end,country` record
    pub fn add_range(&mut self, start: u32, end: u32, country_code: &str) {
        self.text.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",\"{}\"\n",
            start, end, country_code, country_code
        ));
    }
}

impl TableLoader for MemoryTableLoader {
    fn load_table(&self) -> Result<RangeTable> {
        RangeTable::load_str(&self.text)
    }
}
