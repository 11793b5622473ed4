pub mod loader;
pub mod range;
pub mod table;

pub use loader::{
    FileTableLoader, MemoryTableLoader, NilTableLoader, TableLoader, DEFAULT_TABLE_DIR,
    DEFAULT_TABLE_FILENAME,
};
pub use range::IpRange;
pub use table::RangeTable;
