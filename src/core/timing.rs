//! Wall-clock timing and report tables
//!
//! Times use tokio's clock so tests with a paused runtime see exact values.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Milliseconds since `start`, rounded to two decimals
pub fn elapsed_ms(start: Instant) -> f64 {
    duration_ms(start.elapsed())
}

/// Duration in milliseconds, rounded to two decimals
pub fn duration_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

/// Named duration of one benchmark operation
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub operation: String,
    pub duration_ms: f64,
}

/// Ordered collection of operation timings for display
#[derive(Debug, Clone, PartialEq)]
pub struct TimingReport {
    title: String,
    entries: Vec<TimingRecord>,
}

impl TimingReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Append a measured duration
    pub fn record(&mut self, operation: impl Into<String>, duration_ms: f64) {
        self.entries.push(TimingRecord {
            operation: operation.into(),
            duration_ms,
        });
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[TimingRecord] {
        &self.entries
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 {}:", self.title)?;
        for entry in &self.entries {
            writeln!(f, "{:<15} : {} ms", entry.operation, entry.duration_ms)?;
        }
        Ok(())
    }
}
