//! Test fixtures and data factories
//!
//! Provides factory methods for review records and JSONL dataset files.

use keyspaces_bench::ReviewRecord;
use std::io::Write;
use tempfile::NamedTempFile;

/// Factory for creating review records
pub struct RecordFactory;

impl RecordFactory {
    /// Record number `i`, spread over a handful of partitions
    pub fn create(i: usize) -> ReviewRecord {
        ReviewRecord {
            asin: format!("B{:09}", i % 7),
            user_id: format!("USER{:06}", i),
            title: format!("Review title {}", i),
            text: format!("Review body number {}", i),
            rating: (i % 5) as f32 + 1.0,
            timestamp: 1_588_687_728_923 + i as i64,
            helpful_vote: (i % 3) as i32,
            verified_purchase: i % 2 == 0,
        }
    }

    /// `n` records in order
    pub fn many(n: usize) -> Vec<ReviewRecord> {
        (0..n).map(Self::create).collect()
    }

    /// A record pinned to one partition
    pub fn in_partition(i: usize, asin: &str) -> ReviewRecord {
        ReviewRecord {
            asin: asin.to_string(),
            ..Self::create(i)
        }
    }

    /// JSONL line with `rating` and `helpful_vote` encoded as strings
    pub fn stringly_line(record: &ReviewRecord) -> String {
        serde_json::json!({
            "asin": record.asin,
            "user_id": record.user_id,
            "title": record.title,
            "text": record.text,
            "rating": record.rating.to_string(),
            "timestamp": record.timestamp,
            "helpful_vote": record.helpful_vote.to_string(),
            "verified_purchase": record.verified_purchase,
            "images": [],
            "parent_asin": record.asin,
        })
        .to_string()
    }
}

/// Write records as one JSON object per line
pub fn write_dataset(records: &[ReviewRecord]) -> NamedTempFile {
    let lines: Vec<String> = records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    write_lines(&lines)
}

/// Write raw lines to a temporary dataset file
pub fn write_lines<S: AsRef<str>>(lines: &[S]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line.as_ref()).unwrap();
    }
    file.flush().unwrap();
    file
}
