use skim_logging::{skim_debug, skim_warn};
use tokio_util::sync::CancellationToken;

use crate::client::ForumApi;
use crate::types::{EngineEvent, EventSink, MarkOutcome, MarkPlan};

/// Drives the unread positions through the rate-limited mark loop.
///
/// Strictly sequential: one timings call per position, in ascending order,
/// sleeping `plan.delay` between calls but not after the last one. The
/// cancellation token is honored before each call and during each sleep; no
/// further calls are issued once it fires, and partial counts stay accurate.
pub async fn run_mark(
    api: &dyn ForumApi,
    plan: &MarkPlan,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> MarkOutcome {
    let total = plan.total();
    let mut outcome = MarkOutcome::default();
    let mut done = 0u32;

    for position in plan.first_position..=plan.last_position {
        if cancel.is_cancelled() {
            outcome.stopped = true;
            break;
        }

        match api.mark_read(plan.topic_id, position).await {
            Ok(()) => {
                skim_debug!("marked topic {} position {}", plan.topic_id, position);
                outcome.marked += 1;
            }
            Err(err) => {
                skim_warn!(
                    "marking topic {} position {} failed: {}",
                    plan.topic_id,
                    position,
                    err
                );
                outcome.failed += 1;
            }
        }
        done += 1;
        sink.emit(EngineEvent::MarkProgress { done, total });

        if position < plan.last_position {
            tokio::select! {
                _ = tokio::time::sleep(plan.delay) => {}
                _ = cancel.cancelled() => {
                    outcome.stopped = true;
                    break;
                }
            }
        }
    }

    outcome
}
