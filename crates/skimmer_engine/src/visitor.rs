use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use skim_logging::{skim_debug, skim_warn};
use tokio_util::sync::CancellationToken;

use crate::client::ForumApi;
use crate::types::{Candidate, EngineEvent, EventSink, VisitOutcome};

/// Visits each candidate in an isolated background fetch with a fixed dwell,
/// at most `concurrency` in flight.
///
/// A visit counts only after its full dwell; cancellation skips candidates
/// that have not started and cuts running dwells short, so `visited + failed`
/// may be less than the candidate count on a stopped run.
pub async fn run_visits(
    api: &dyn ForumApi,
    candidates: Vec<Candidate>,
    concurrency: usize,
    dwell: Duration,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> VisitOutcome {
    let total = candidates.len() as u32;
    let visited = AtomicU32::new(0);
    let failed = AtomicU32::new(0);
    let done = AtomicU32::new(0);

    let visited_ref = &visited;
    let failed_ref = &failed;
    let done_ref = &done;

    futures_util::stream::iter(candidates)
        .for_each_concurrent(concurrency.max(1), |candidate| async move {
            if cancel.is_cancelled() {
                return;
            }
            match api.fetch_topic_html(&candidate.url).await {
                Ok(_) => {
                    let full_dwell = tokio::select! {
                        _ = tokio::time::sleep(dwell) => true,
                        _ = cancel.cancelled() => false,
                    };
                    if full_dwell {
                        skim_debug!("visited {:?}", candidate.title);
                        visited_ref.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(err) => {
                    skim_warn!("visit of {} failed: {}", candidate.url, err);
                    failed_ref.fetch_add(1, Ordering::Relaxed);
                }
            }
            let done_now = done_ref.fetch_add(1, Ordering::Relaxed) + 1;
            sink.emit(EngineEvent::VisitProgress {
                done: done_now,
                total,
            });
        })
        .await;

    VisitOutcome {
        visited: visited.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        stopped: cancel.is_cancelled(),
    }
}
