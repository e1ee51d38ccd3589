//! The export pipeline: batch, fetch, merge, serialize.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info};

use crate::config::{BATCH_SIZE, DEFAULT_BATCH_CONCURRENCY};
use crate::error_handling::ExportError;

use super::csv::write_csv;
use super::profile::ExportProfile;
use super::source::RecordSource;
use super::types::{ExportResult, Identifier, Record};

/// Bulk ID-based export over an injected [`RecordSource`].
///
/// The pipeline holds no per-request state and can be shared across
/// handlers behind an `Arc`.
pub struct ExportPipeline {
    source: Arc<dyn RecordSource>,
    profile: Arc<ExportProfile>,
    batch_size: usize,
    batch_concurrency: usize,
}

impl ExportPipeline {
    pub fn new(source: Arc<dyn RecordSource>, profile: ExportProfile) -> Self {
        Self {
            source,
            profile: Arc::new(profile),
            batch_size: BATCH_SIZE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Sets the maximum ids per lookup query (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Sets how many batches may be in flight at once (at least 1).
    pub fn with_batch_concurrency(mut self, batch_concurrency: usize) -> Self {
        self.batch_concurrency = batch_concurrency.max(1);
        self
    }

    pub fn profile(&self) -> &ExportProfile {
        &self.profile
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn batch_concurrency(&self) -> usize {
        self.batch_concurrency
    }

    /// Fetches every record matching `ids`.
    ///
    /// Ids are split into consecutive batches of at most `batch_size`. Up to
    /// `batch_concurrency` batches run at once, but results are reassembled
    /// in submission order, so batch `i`'s rows always precede batch `i+1`'s.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidRequest`] if `ids` is empty (the store is not touched)
    /// - [`ExportError::UpstreamFailure`] if any batch fails; no partial result is returned
    /// - [`ExportError::NotFound`] if no batch matched a row
    pub async fn fetch(&self, ids: &[Identifier]) -> Result<ExportResult, ExportError> {
        if ids.is_empty() {
            return Err(ExportError::InvalidRequest);
        }

        let batches: Vec<Vec<Identifier>> = ids
            .chunks(self.batch_size)
            .map(<[Identifier]>::to_vec)
            .collect();
        let batch_count = batches.len();
        debug!(
            "Exporting {} ids in {} batch(es) of up to {}",
            ids.len(),
            batch_count,
            self.batch_size
        );

        let source = &self.source;
        let profile = &*self.profile;
        let per_batch: Vec<Vec<Record>> = stream::iter(batches.into_iter().enumerate())
            .map(|(index, batch)| async move {
                source.fetch_batch(profile, &batch).await.map_err(|e| {
                    error!(
                        "Export batch {} of {} ({} ids) failed: {}",
                        index + 1,
                        batch_count,
                        batch.len(),
                        e
                    );
                    e
                })
            })
            .buffered(self.batch_concurrency)
            .try_collect()
            .await?;

        let result = ExportResult {
            fields: profile.output_fields().map(str::to_string).collect(),
            headers: profile.headers(),
            records: per_batch.into_iter().flatten().collect(),
            batches: batch_count,
        };
        if result.is_empty() {
            return Err(ExportError::NotFound);
        }

        info!(
            "Matched {} of {} requested ids in {} batch(es)",
            result.len(),
            ids.len(),
            batch_count
        );

        Ok(result)
    }

    /// Fetches and serializes in one step, returning the CSV text.
    pub async fn export(&self, ids: &[Identifier]) -> Result<String, ExportError> {
        let result = self.fetch(ids).await?;
        Ok(write_csv(&result)?)
    }
}
