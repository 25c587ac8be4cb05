//! Run many proposal processors under a bounded concurrency limit.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error};

use crate::types::{ProposalOutcome, ProposalTarget};

/// Proposals processed concurrently when no override is given.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Hard ceiling on concurrent proposals, whatever the caller asks for.
pub const MAX_CONCURRENCY: usize = 20;

/// Concurrency actually used for a run: request override, then configured
/// value, clamped to `1..=MAX_CONCURRENCY`.
pub fn effective_concurrency(requested: Option<usize>, configured: usize) -> usize {
    requested.unwrap_or(configured).clamp(1, MAX_CONCURRENCY)
}

/// Dispatch targets chunk by chunk: all processors of a chunk run
/// concurrently, and the whole chunk settles before the next one starts.
///
/// Every target yields exactly one outcome; a failed or even panicked task
/// never cancels its siblings and never loses its slot in the result list.
pub async fn run_chunked<F, Fut>(
    targets: Vec<ProposalTarget>,
    concurrency: usize,
    task: F,
) -> Vec<ProposalOutcome>
where
    F: Fn(ProposalTarget) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProposalOutcome> + Send + 'static,
{
    let task = Arc::new(task);
    let concurrency = concurrency.max(1);
    let mut outcomes = Vec::with_capacity(targets.len());

    for chunk in targets.chunks(concurrency) {
        debug!("dispatching chunk of {} proposals", chunk.len());
        let mut handles = Vec::with_capacity(chunk.len());
        for target in chunk.iter().cloned() {
            let task = Arc::clone(&task);
            let id = target.id;
            let title = target.title.clone();
            handles.push((id, title, tokio::spawn(async move { task(target).await })));
        }
        for (id, title, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    error!("proposal {} task aborted: {}", id, err);
                    outcomes.push(ProposalOutcome::aborted(id, title, err.to_string()));
                }
            }
        }
    }
    outcomes
}
