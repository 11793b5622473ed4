use thiserror::Error;

/// Classifies range table errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorKind {
    /// No table source was configured
    NotConfigured,
    /// File open/read failure
    FileError,
    /// Malformed record (non-numeric bound, out of range, start > end)
    InvalidData,
}

/// IP guard error types
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("{}", table_load_message(.line, .message))]
    TableLoad {
        kind: TableErrorKind,
        line: Option<usize>,
        message: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn table_load_message(line: &Option<usize>, message: &str) -> String {
    match line {
        Some(line) => format!("Range table error at line {}: {}", line, message),
        None => format!("Range table error: {}", message),
    }
}

impl GuardError {
    /// Table error kind, if this is a table load failure.
    pub fn table_kind(&self) -> Option<TableErrorKind> {
        match self {
            GuardError::TableLoad { kind, .. } => Some(*kind),
            GuardError::Io(_) => Some(TableErrorKind::FileError),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
