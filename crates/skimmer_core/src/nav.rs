use crate::topic::{topic_position, TopicPosition};

/// Outcome of comparing two host URLs across a navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavChange {
    /// Same URL, or a move between two non-topic pages.
    Unchanged,
    /// Arrived on a topic page from a non-topic page.
    EnteredTopic(TopicPosition),
    /// Moved from one topic to a different one.
    TopicSwitched(TopicPosition),
    /// Same topic, different read position; must not reset any state.
    PositionMoved(TopicPosition),
    /// Moved from a topic page to a non-topic page.
    LeftTopic,
}

/// Classifies a URL change in the single-page-app host.
///
/// Only topic-identity changes matter; within-topic position moves are
/// reported separately so callers can keep runs alive across them.
pub fn classify(last_url: &str, current_url: &str) -> NavChange {
    if last_url == current_url {
        return NavChange::Unchanged;
    }
    match (topic_position(last_url), topic_position(current_url)) {
        (None, None) => NavChange::Unchanged,
        (None, Some(now)) => NavChange::EnteredTopic(now),
        (Some(_), None) => NavChange::LeftTopic,
        (Some(prev), Some(now)) if prev.topic_id != now.topic_id => NavChange::TopicSwitched(now),
        (Some(_), Some(now)) => NavChange::PositionMoved(now),
    }
}
