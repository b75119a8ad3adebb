//! Sync orchestrator
//!
//! Executes one concurrent metadata update per row and settles every row
//! to a terminal outcome. Partial failure never cancels or blocks sibling
//! rows; the join collects all results unconditionally.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use partsync_domain::{
    ColumnMap, PropertyUpdate, Result, SheetRow, SyncOutcome, UpdateStatus,
};

use crate::ports::PartMetadataClient;
use crate::reference;
use crate::sync::mapping;

/// Orchestrator tuning knobs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Cap on simultaneous in-flight updates. `None` fans out unbounded,
    /// matching the original tool; batches are human-sized CSV imports.
    pub max_concurrency: Option<usize>,
}

/// Stateless sync orchestrator
///
/// All inputs arrive as parameters; nothing is retained between calls to
/// [`SyncService::synchronize`].
pub struct SyncService {
    client: Arc<dyn PartMetadataClient>,
    options: SyncOptions,
}

/// Everything a row task needs, snapshotted before spawning so no two
/// tasks ever touch the same row.
struct RowPlan {
    row_id: String,
    reference: String,
    payload: Vec<PropertyUpdate>,
}

impl SyncService {
    /// Create an orchestrator with default options (unbounded fan-out).
    pub fn new(client: Arc<dyn PartMetadataClient>) -> Self {
        Self::with_options(client, SyncOptions::default())
    }

    /// Create an orchestrator with explicit options.
    pub fn with_options(client: Arc<dyn PartMetadataClient>, options: SyncOptions) -> Self {
        Self { client, options }
    }

    /// Synchronize a batch of rows against the remote service.
    ///
    /// Every submitted row yields exactly one outcome and ends in
    /// `Success` or `Error`; outcome order is unspecified. The only
    /// fail-fast path is the identifier-column precondition, checked
    /// before any network activity.
    ///
    /// # Errors
    /// Returns `PartSyncError::Config` when the column map does not carry
    /// exactly one identifier column.
    #[instrument(skip(self, rows, column_map), fields(rows = rows.len()))]
    pub async fn synchronize(
        &self,
        rows: &mut [SheetRow],
        column_map: &ColumnMap,
    ) -> Result<Vec<SyncOutcome>> {
        let identifier = mapping::identifier_column(column_map)?.to_string();

        for row in rows.iter_mut() {
            row.status = UpdateStatus::Pending;
            row.error_message = None;
        }

        let semaphore = self
            .options
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let mut tasks: Vec<(String, JoinHandle<SyncOutcome>)> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let plan = RowPlan {
                row_id: row.id.clone(),
                reference: row.value(&identifier).unwrap_or_default().to_string(),
                payload: mapping::build_payload(row, column_map),
            };
            let client = Arc::clone(&self.client);
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                process_row(client, plan).await
            });
            tasks.push((row.id.clone(), handle));
        }

        // Settle-all join: a failed or panicked task still yields an
        // outcome for its row and never cancels siblings.
        let mut outcomes = Vec::with_capacity(tasks.len());
        for (row_id, handle) in tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(row_id = %row_id, error = %err, "row task failed to complete");
                    SyncOutcome::failure(row_id, format!("row task failed: {err}"))
                }
            };
            outcomes.push(outcome);
        }

        for row in rows.iter_mut() {
            if let Some(outcome) = outcomes.iter().find(|outcome| outcome.row_id == row.id) {
                row.status =
                    if outcome.success { UpdateStatus::Success } else { UpdateStatus::Error };
                row.error_message = outcome.error_message.clone();
            }
        }

        let failures = outcomes.iter().filter(|outcome| !outcome.success).count();
        info!(rows = outcomes.len(), failures, "sync run settled");

        Ok(outcomes)
    }
}

/// Process one row to a terminal outcome. Row-scoped errors are folded
/// into the outcome here and never propagate across row boundaries.
async fn process_row(client: Arc<dyn PartMetadataClient>, plan: RowPlan) -> SyncOutcome {
    if plan.payload.is_empty() {
        debug!(row_id = %plan.row_id, "no updatable properties mapped; skipping network call");
        return SyncOutcome::success(plan.row_id);
    }

    let reference = match reference::resolve(&plan.reference) {
        Ok(reference) => reference,
        Err(err) => {
            warn!(row_id = %plan.row_id, error = %err, "part reference did not resolve");
            return SyncOutcome::failure(plan.row_id, err.to_string());
        }
    };

    match client.update_part_metadata(&reference, &plan.payload).await {
        Ok(()) => SyncOutcome::success(plan.row_id),
        Err(err) => {
            warn!(row_id = %plan.row_id, error = %err, "metadata update failed");
            SyncOutcome::failure(plan.row_id, err.to_string())
        }
    }
}
