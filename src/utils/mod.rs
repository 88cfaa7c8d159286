//! Utility modules for the benchmark
//!
//! - **error**: crate-wide error type
//! - **logging**: tracing subscriber setup
//! - **progress**: progress bars for bulk phases

pub mod error; // Error handling
pub mod logging; // Logging setup
pub mod progress; // Progress display

pub use error::{BenchError, Result};
pub use logging::init_logging;
pub use progress::progress_bar;

/// Percentage of `part` in `total`, 100 when `total` is zero
pub fn success_rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (part as f64 / total as f64 * 10000.0).round() / 100.0
}
