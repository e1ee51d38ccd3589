//! Export statistics tracking.
//!
//! Thread-safe counters shared between request handlers and the `/status`
//! endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ExportErrorKind;

/// Thread-safe export statistics tracker.
///
/// Every [`ExportErrorKind`] is initialized to zero on creation, so the map
/// is never mutated after construction and can be read without locks.
pub struct ExportStats {
    completed: AtomicUsize,
    rows_exported: AtomicUsize,
    batches_run: AtomicUsize,
    failures: HashMap<ExportErrorKind, AtomicUsize>,
}

impl ExportStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in ExportErrorKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        ExportStats {
            completed: AtomicUsize::new(0),
            rows_exported: AtomicUsize::new(0),
            batches_run: AtomicUsize::new(0),
            failures,
        }
    }

    /// Records a successful export of `rows` rows fetched in `batches` queries.
    pub fn record_success(&self, rows: usize, batches: usize) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.rows_exported.fetch_add(rows, Ordering::Relaxed);
        self.batches_run.fetch_add(batches, Ordering::Relaxed);
    }

    /// Increment a failure counter.
    pub fn increment_failure(&self, kind: ExportErrorKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map",
                kind
            );
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn rows_exported(&self) -> usize {
        self.rows_exported.load(Ordering::Relaxed)
    }

    pub fn batches_run(&self) -> usize {
        self.batches_run.load(Ordering::Relaxed)
    }

    pub fn get_failure_count(&self, kind: ExportErrorKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn total_failures(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }
}

impl Default for ExportStats {
    fn default() -> Self {
        Self::new()
    }
}
