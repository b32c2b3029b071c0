use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read listing source {path}: {source}")]
    SourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize inventory report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Aggregation protocol violations. These are contract bugs in the
/// orchestration layer, not data problems, and abort the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectorError {
    #[error("expected task count must be at least 1")]
    InvalidTaskCount,

    #[error("no batch registered")]
    NotRegistered,

    #[error("batch already in progress ({completed}/{expected} tasks completed)")]
    BatchInProgress { completed: usize, expected: usize },

    #[error("record appended after batch {batch_id} was finalized")]
    AppendAfterFinalize { batch_id: Uuid },

    #[error("batch {batch_id} received more than {expected} task completions")]
    CompletionOverflow { batch_id: Uuid, expected: usize },

    #[error("call addressed batch {got} but the collector holds batch {current}")]
    BatchMismatch { current: Uuid, got: Uuid },
}
