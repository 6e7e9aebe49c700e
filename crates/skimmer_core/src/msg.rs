use crate::state::{SettingsSnapshot, SpeedProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Persisted settings restored at startup.
    SettingsLoaded(SettingsSnapshot),
    /// User picked a speed profile.
    SpeedSelected(SpeedProfile),
    /// User adjusted the background-visit concurrency limit.
    ConcurrencyChanged(u8),
    /// User adjusted how many topics a browse run should visit.
    VisitTargetChanged(u8),
    /// The host reported its current URL.
    UrlChanged(String),
    /// Engine inspected the current topic page.
    TopicInspected {
        topic_id: u64,
        current_position: u32,
        total_replies: u32,
    },
    /// Engine could not inspect the current topic page.
    InspectFailed { message: String },
    /// Mark sequencer progress.
    MarkProgress { done: u32, total: u32 },
    /// Mark sequencer finished, was stopped, or had nothing usable to do.
    MarkCompleted {
        marked: u32,
        failed: u32,
        stopped: bool,
    },
    /// User asked to stop the mark run.
    StopMarkRequested,
    /// User asked for a discover-and-visit run.
    BrowseRequested,
    /// Discovery finished; visiting starts next.
    DiscoveryCompleted { found: u32 },
    /// Discovery could not fetch or parse a listing page; the browse run
    /// ended before visiting started.
    DiscoveryFailed { message: String },
    /// Background visitor progress.
    VisitProgress { done: u32, total: u32 },
    /// Background visitor finished or was stopped.
    VisitCompleted {
        visited: u32,
        failed: u32,
        stopped: bool,
    },
    /// User asked to stop the browse run.
    StopVisitRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
