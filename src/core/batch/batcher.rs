//! Splitting input into fixed-size batches

use super::types::Batch;

/// Split `items` into contiguous batches of `batch_size`
///
/// Every batch but the last holds exactly `batch_size` items; concatenating
/// the batches in index order yields `items` unchanged.
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn split<T>(items: Vec<T>, batch_size: usize) -> Vec<Batch<T>> {
    assert!(batch_size > 0, "batch_size must be greater than zero");

    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut rest = items;
    while !rest.is_empty() {
        let tail = rest.split_off(batch_size.min(rest.len()));
        batches.push(Batch {
            index: batches.len(),
            items: rest,
        });
        rest = tail;
    }
    batches
}
