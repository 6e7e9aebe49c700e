use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// A discovered topic row from a listing page. Consumed once by the
/// background visitor, then discarded; there is no cross-run dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub views: u32,
    pub replies: u32,
}

/// Low-engagement predicate applied to listing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementWindow {
    pub max_views: u32,
    pub max_replies: u32,
}

impl Default for EngagementWindow {
    fn default() -> Self {
        Self {
            max_views: 500,
            max_replies: 10,
        }
    }
}

impl EngagementWindow {
    pub fn admits(&self, candidate: &Candidate) -> bool {
        candidate.views <= self.max_views && candidate.replies <= self.max_replies
    }
}

/// Topic page to inspect. Identity and position come pre-parsed from the
/// URL; the page itself supplies the reply total and the CSRF token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectRequest {
    pub url: String,
    pub topic_id: u64,
    pub current_position: u32,
}

/// One mark run: the inclusive position range and its rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkPlan {
    pub topic_id: u64,
    pub first_position: u32,
    pub last_position: u32,
    pub delay: Duration,
}

impl MarkPlan {
    pub fn total(&self) -> u32 {
        self.last_position
            .checked_sub(self.first_position)
            .map_or(0, |span| span + 1)
    }
}

/// One discover-and-visit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePlan {
    pub target: usize,
    pub concurrency: usize,
    pub window: EngagementWindow,
    pub dwell: Duration,
    pub max_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkOutcome {
    pub marked: u32,
    pub failed: u32,
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitOutcome {
    pub visited: u32,
    pub failed: u32,
    pub stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TopicInspected {
        topic_id: u64,
        current_position: u32,
        total_replies: u32,
    },
    InspectFailed {
        error: ApiError,
    },
    MarkProgress {
        done: u32,
        total: u32,
    },
    MarkCompleted {
        outcome: MarkOutcome,
    },
    DiscoveryCompleted {
        found: u32,
    },
    DiscoveryFailed {
        error: ApiError,
    },
    VisitProgress {
        done: u32,
        total: u32,
    },
    VisitCompleted {
        outcome: VisitOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error")]
    Network,
    #[error("csrf token missing")]
    MissingToken,
    #[error("unrecognized page markup")]
    MarkupChanged,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
