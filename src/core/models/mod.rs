//! Core data models for the benchmark
//!
//! This module defines the review record shapes that flow through the
//! loader, the bulk engine and the store.

pub mod review;

// Re-export commonly used types
pub use review::*;
