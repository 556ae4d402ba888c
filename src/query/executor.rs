//! Sampled query execution
//!
//! Runs one descriptor `iterations` times back-to-back and reduces the
//! timings to a median. The timed region covers exactly the store call that
//! issues the query and materializes its rows; descriptor construction,
//! progress output and row counting all happen outside it.

use super::QueryDescriptor;
use crate::store::ReachabilityStore;
use crate::{Error, Result};
use std::time::Instant;

/// Latency samples for one descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    /// Median of `raw_ms`
    pub median_ms: f64,
    /// One duration per iteration, in execution order
    pub raw_ms: Vec<f64>,
}

/// Median of a non-empty sample.
///
/// Odd length: the middle element after sorting. Even length: the mean of the
/// two middle elements. Returns `None` for an empty slice.
///
/// ```
/// use reach_bench::query::median;
///
/// assert_eq!(median(&[7.0, 1.0, 5.0]), Some(5.0));
/// assert_eq!(median(&[5.0, 3.0, 9.0, 1.0]), Some(4.0));
/// assert_eq!(median(&[]), None);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Times a [`QueryDescriptor`] against a store.
pub struct SampledExecutor<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ReachabilityStore + ?Sized> SampledExecutor<'a, S> {
    /// Create an executor over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run the descriptor `iterations` times and return the latency sample.
    ///
    /// Every iteration is a fresh call into the store; nothing is cached
    /// between iterations.
    ///
    /// # Errors
    /// - [`Error::InvalidConfiguration`] if `iterations` is zero
    /// - the first store error raised by any iteration
    pub fn run(&self, descriptor: &QueryDescriptor, iterations: usize) -> Result<LatencySample> {
        if iterations == 0 {
            return Err(Error::InvalidConfiguration(
                "iterationsPerCell must be at least 1".to_string(),
            ));
        }

        let mut raw_ms = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let start = Instant::now();
            let rows = self.store.bounded_reachability(
                descriptor.seed_ids(),
                descriptor.connection_rule(),
                descriptor.max_depth(),
            )?;
            let elapsed = start.elapsed();
            drop(std::hint::black_box(rows));
            raw_ms.push(elapsed.as_secs_f64() * 1000.0);
        }

        let median_ms = median(&raw_ms)
            .ok_or_else(|| Error::Other("no latency samples recorded".to_string()))?;
        Ok(LatencySample { median_ms, raw_ms })
    }
}
