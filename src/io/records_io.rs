use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::record::TaskRecord;

/// Default name of the record batch inside a project directory
pub const RECORDS_FILE: &str = "tasks.json";

/// Error type for loading records and configuration
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    RecordsParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Accepted shapes of a record batch: a bare array or `{ "tasks": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordBatch {
    List(Vec<TaskRecord>),
    Wrapped { tasks: Vec<TaskRecord> },
}

impl RecordBatch {
    fn into_records(self) -> Vec<TaskRecord> {
        match self {
            RecordBatch::List(records) | RecordBatch::Wrapped { tasks: records } => records,
        }
    }
}

/// Parse a record batch from JSON text
pub fn parse_records(text: &str) -> Result<Vec<TaskRecord>, serde_json::Error> {
    let batch: RecordBatch = serde_json::from_str(text)?;
    Ok(batch.into_records())
}

/// Read and parse the record batch at `path`
pub fn load_records(path: &Path) -> Result<Vec<TaskRecord>, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let records = parse_records(&text).map_err(|e| LoadError::RecordsParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}
