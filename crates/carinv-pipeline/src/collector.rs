//! Batch accumulator shared by every extraction task of a run.
//!
//! The orchestrator registers how many tasks it will launch, each task
//! appends its normalized records and signals completion once, and the last
//! completion hands the whole batch to the report serializer. The collector
//! then accepts a fresh registration, so one instance can serve successive
//! runs without records leaking between them.
//!
//! All state lives behind one mutex: the completed-task counter and the
//! record list change together, so no interleaving of appends and
//! completions can drop a record or finalize twice.

use std::sync::{Mutex, MutexGuard, PoisonError};

use carinv_core::CanonicalRecord;
use uuid::Uuid;

use crate::error::CollectorError;
use crate::report::InventoryReport;

#[derive(Debug)]
struct Batch {
    id: Uuid,
    expected: usize,
    completed: usize,
    records: Vec<CanonicalRecord>,
}

#[derive(Debug)]
enum BatchState {
    Idle,
    Collecting(Batch),
    Finalized { batch_id: Uuid, expected: usize },
}

impl BatchState {
    /// Rejects a call addressed to a batch other than the current one.
    fn check_target(&self, target: Option<Uuid>) -> Result<(), CollectorError> {
        let current = match self {
            BatchState::Idle => return Ok(()),
            BatchState::Collecting(batch) => batch.id,
            BatchState::Finalized { batch_id, .. } => *batch_id,
        };
        match target {
            Some(got) if got != current => Err(CollectorError::BatchMismatch { current, got }),
            _ => Ok(()),
        }
    }
}

/// Result of [`Collector::complete_task`].
#[derive(Debug)]
pub enum Completion {
    /// Other tasks are still running.
    Pending {
        batch_id: Uuid,
        completed: usize,
        expected: usize,
    },
    /// This was the last task. `report` is `None` when no task appended a
    /// record.
    Finalized {
        batch_id: Uuid,
        report: Option<InventoryReport>,
    },
}

/// Batch accumulator.
///
/// [`append`](Self::append) and [`complete_task`](Self::complete_task) act on
/// whichever batch is open when they run. A task that outlives its batch and
/// calls them after the next `register` lands in the new batch; tasks that
/// can outlive a batch use [`append_to`](Self::append_to) and
/// [`complete_task_for`](Self::complete_task_for) with the id `register`
/// returned.
#[derive(Debug)]
pub struct Collector {
    state: Mutex<BatchState>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BatchState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a batch expecting `expected` task completions.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::InvalidTaskCount`] if `expected` is zero.
    /// - [`CollectorError::BatchInProgress`] if the previous batch has not
    ///   finalized.
    pub fn register(&self, expected: usize) -> Result<Uuid, CollectorError> {
        if expected == 0 {
            return Err(CollectorError::InvalidTaskCount);
        }

        let mut state = self.lock();
        if let BatchState::Collecting(batch) = &*state {
            return Err(CollectorError::BatchInProgress {
                completed: batch.completed,
                expected: batch.expected,
            });
        }

        let id = Uuid::new_v4();
        *state = BatchState::Collecting(Batch {
            id,
            expected,
            completed: 0,
            records: Vec::new(),
        });
        tracing::debug!(batch_id = %id, expected, "batch registered");
        Ok(id)
    }

    /// Adds one record to the open batch.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::NotRegistered`] before the first registration.
    /// - [`CollectorError::AppendAfterFinalize`] once the batch has finalized.
    pub fn append(&self, record: CanonicalRecord) -> Result<(), CollectorError> {
        self.append_checked(None, record)
    }

    /// Adds one record to batch `batch_id`.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append), plus [`CollectorError::BatchMismatch`]
    /// when the collector has moved on to another batch.
    pub fn append_to(&self, batch_id: Uuid, record: CanonicalRecord) -> Result<(), CollectorError> {
        self.append_checked(Some(batch_id), record)
    }

    fn append_checked(
        &self,
        target: Option<Uuid>,
        record: CanonicalRecord,
    ) -> Result<(), CollectorError> {
        let mut state = self.lock();
        state.check_target(target)?;
        match &mut *state {
            BatchState::Collecting(batch) => {
                batch.records.push(record);
                Ok(())
            }
            BatchState::Idle => Err(CollectorError::NotRegistered),
            BatchState::Finalized { batch_id, .. } => Err(CollectorError::AppendAfterFinalize {
                batch_id: *batch_id,
            }),
        }
    }

    /// Marks one task as done. The call that completes the last expected task
    /// finalizes the batch and receives the report.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::NotRegistered`] before the first registration.
    /// - [`CollectorError::CompletionOverflow`] if every expected task has
    ///   already completed.
    pub fn complete_task(&self, task_name: &str) -> Result<Completion, CollectorError> {
        self.complete_checked(None, task_name)
    }

    /// Marks one task of batch `batch_id` as done.
    ///
    /// # Errors
    ///
    /// As [`complete_task`](Self::complete_task), plus
    /// [`CollectorError::BatchMismatch`] when the collector has moved on to
    /// another batch.
    pub fn complete_task_for(
        &self,
        batch_id: Uuid,
        task_name: &str,
    ) -> Result<Completion, CollectorError> {
        self.complete_checked(Some(batch_id), task_name)
    }

    fn complete_checked(
        &self,
        target: Option<Uuid>,
        task_name: &str,
    ) -> Result<Completion, CollectorError> {
        let (batch_id, records) = {
            let mut state = self.lock();
            state.check_target(target)?;
            let batch = match &mut *state {
                BatchState::Collecting(batch) => batch,
                BatchState::Idle => return Err(CollectorError::NotRegistered),
                BatchState::Finalized { batch_id, expected } => {
                    return Err(CollectorError::CompletionOverflow {
                        batch_id: *batch_id,
                        expected: *expected,
                    })
                }
            };

            batch.completed += 1;
            if batch.completed < batch.expected {
                tracing::info!(
                    batch_id = %batch.id,
                    task = task_name,
                    records = batch.records.len(),
                    completed = batch.completed,
                    expected = batch.expected,
                    "task finished; waiting for remaining tasks"
                );
                return Ok(Completion::Pending {
                    batch_id: batch.id,
                    completed: batch.completed,
                    expected: batch.expected,
                });
            }

            let batch_id = batch.id;
            let expected = batch.expected;
            let records = std::mem::take(&mut batch.records);
            *state = BatchState::Finalized { batch_id, expected };
            (batch_id, records)
        };

        if records.is_empty() {
            tracing::info!(
                batch_id = %batch_id,
                task = task_name,
                "no records collected, no output produced"
            );
            return Ok(Completion::Finalized {
                batch_id,
                report: None,
            });
        }

        tracing::info!(
            batch_id = %batch_id,
            task = task_name,
            records = records.len(),
            "all tasks finished; batch finalized"
        );
        Ok(Completion::Finalized {
            batch_id,
            report: Some(InventoryReport::from_records(records)),
        })
    }
}
