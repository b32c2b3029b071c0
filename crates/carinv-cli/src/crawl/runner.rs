//! Concurrent execution of one crawl batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

use carinv_pipeline::{
    Collector, CollectorError, Completion, InventoryReport, ListingNormalizer, ListingSource,
};

/// One dealer's extraction source and its normalization settings.
pub(crate) struct DealerTask {
    pub source: Arc<dyn ListingSource>,
    pub normalizer: ListingNormalizer,
}

/// Registers `tasks` with `collector`, runs them with at most
/// `max_concurrent` in flight, and returns the finalized report (`None` when
/// no dealer produced a record).
///
/// A dealer whose extraction fails still completes its task, so the batch
/// always finalizes.
///
/// # Errors
///
/// Returns an error on a collector protocol violation or if no task
/// finalized the batch.
pub(crate) async fn run_batch(
    collector: &Arc<Collector>,
    tasks: Vec<DealerTask>,
    max_concurrent: usize,
    scraped_at: DateTime<Utc>,
) -> anyhow::Result<Option<InventoryReport>> {
    let batch_id = collector.register(tasks.len())?;
    let span = tracing::info_span!("batch", batch_id = %batch_id);
    let task_count = tasks.len();
    let max_concurrent = max_concurrent.max(1);

    async move {
        tracing::info!(tasks = task_count, max_concurrent, "crawl started");

        let results: Vec<Result<Completion, CollectorError>> = stream::iter(tasks)
            .map(|task| run_task(Arc::clone(collector), batch_id, task, scraped_at))
            .buffer_unordered(max_concurrent)
            .collect()
            .await;

        let mut report = None;
        let mut finalized = false;
        for result in results {
            if let Completion::Finalized { report: r, .. } = result? {
                finalized = true;
                report = r;
            }
        }
        anyhow::ensure!(finalized, "batch {batch_id} did not finalize");
        Ok(report)
    }
    .instrument(span)
    .await
}

async fn run_task(
    collector: Arc<Collector>,
    batch_id: Uuid,
    task: DealerTask,
    scraped_at: DateTime<Utc>,
) -> Result<Completion, CollectorError> {
    let name = task.source.name().to_string();
    let platform = task.source.platform();
    let source = Arc::clone(&task.source);
    let span = tracing::Span::current();

    let extracted = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        source.extract()
    })
    .await;

    let appended = match extracted {
        Ok(Ok(listings)) => listings
            .iter()
            .try_fold(0_usize, |count, raw| -> Result<usize, CollectorError> {
                collector.append_to(batch_id, task.normalizer.normalize(raw, scraped_at))?;
                Ok(count + 1)
            })
            .inspect(|records| {
                tracing::info!(dealer = %name, %platform, records, "dealer listings collected");
            }),
        Ok(Err(e)) => {
            tracing::warn!(
                dealer = %name,
                %platform,
                error = %e,
                "extraction failed; completing with no records"
            );
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(
                dealer = %name,
                %platform,
                error = %e,
                "extraction task aborted; completing with no records"
            );
            Ok(0)
        }
    };

    let completion = collector.complete_task_for(batch_id, &name);
    appended?;
    completion
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
