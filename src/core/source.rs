//! Dataset loading
//!
//! Reads a newline-delimited JSON file fully into memory. Any malformed
//! line aborts the load; there is no partial recovery.

use crate::core::models::ReviewRecord;
use crate::utils::error::{BenchError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load every record of a newline-delimited JSON dataset, in file order
///
/// Every line must hold one record object, so an empty line in the middle
/// of the file is malformed too. The first malformed line fails the whole
/// load with [`BenchError::Parse`] carrying its 1-based line number.
pub async fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<ReviewRecord>> {
    let path = path.as_ref();
    debug!("Reading dataset {:?}", path);

    let content = tokio::fs::read_to_string(path).await?;
    let records = parse_records(&content)?;

    info!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Parse newline-delimited JSON records from an in-memory string
pub fn parse_records(content: &str) -> Result<Vec<ReviewRecord>> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str::<ReviewRecord>(line.trim())
                .map_err(|source| BenchError::Parse {
                    line: idx + 1,
                    source,
                })
        })
        .collect()
}
