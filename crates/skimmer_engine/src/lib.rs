//! Skimmer engine: forum IO and run orchestration.
mod client;
mod discover;
mod engine;
mod inspect;
mod sequencer;
mod types;
mod visitor;

pub use client::{ClientSettings, ForumApi, ReqwestForum, POST_DWELL_MS};
pub use discover::discover;
pub use engine::EngineHandle;
pub use inspect::{csrf_token, read_progress, topic_rows, ReadProgress};
pub use sequencer::run_mark;
pub use types::{
    ApiError, BrowsePlan, Candidate, ChannelEventSink, EngagementWindow, EngineEvent, EventSink,
    FailureKind, InspectRequest, MarkOutcome, MarkPlan, VisitOutcome,
};
pub use visitor::run_visits;
