use skim_logging::skim_debug;
use tokio_util::sync::CancellationToken;

use crate::client::ForumApi;
use crate::inspect;
use crate::types::{ApiError, BrowsePlan, Candidate};

/// Walks listing pages and collects candidates admitted by the engagement
/// window, stopping at the target count, an empty page, the page cap, or
/// cancellation. No dedup across runs: a topic visited before may show up
/// again.
pub async fn discover(
    api: &dyn ForumApi,
    plan: &BrowsePlan,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, ApiError> {
    let mut found: Vec<Candidate> = Vec::new();

    for page in 0..plan.max_pages {
        if cancel.is_cancelled() || found.len() >= plan.target {
            break;
        }

        let html = api.fetch_listing_html(page).await?;
        let rows = inspect::topic_rows(&html, None);
        if rows.is_empty() {
            skim_debug!("listing page {} has no rows, stopping discovery", page);
            break;
        }

        let before = found.len();
        for candidate in rows {
            if plan.window.admits(&candidate) {
                found.push(candidate);
                if found.len() >= plan.target {
                    break;
                }
            }
        }
        skim_debug!(
            "listing page {}: {} candidates admitted ({} total)",
            page,
            found.len() - before,
            found.len()
        );
    }

    Ok(found)
}
