use crate::nav::{classify, NavChange};
use crate::state::{RunState, Status};
use crate::topic::compute_backlog;
use crate::{Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsLoaded(snapshot) => {
            state.apply_settings(snapshot);
            Vec::new()
        }
        Msg::SpeedSelected(speed) => {
            state.set_speed(speed);
            vec![Effect::SaveSettings(state.settings())]
        }
        Msg::ConcurrencyChanged(value) => {
            state.set_concurrency(value);
            vec![Effect::SaveSettings(state.settings())]
        }
        Msg::VisitTargetChanged(value) => {
            state.set_visit_target(value);
            vec![Effect::SaveSettings(state.settings())]
        }
        Msg::UrlChanged(url) => handle_url_changed(&mut state, url),
        Msg::TopicInspected {
            topic_id,
            current_position,
            total_replies,
        } => handle_topic_inspected(&mut state, topic_id, current_position, total_replies),
        Msg::InspectFailed { .. } => {
            state.set_status(Status::InspectFailed);
            Vec::new()
        }
        Msg::MarkProgress { done, total } => {
            if state.is_marking() {
                state.set_status(Status::Marking { done, total });
            }
            Vec::new()
        }
        Msg::MarkCompleted {
            marked,
            failed,
            stopped,
        } => handle_mark_completed(&mut state, marked, failed, stopped),
        Msg::StopMarkRequested => {
            if state.is_marking() {
                vec![Effect::StopMarking]
            } else {
                Vec::new()
            }
        }
        Msg::BrowseRequested => {
            // Exclusive: a second browse request while one runs is a no-op.
            if state.is_visiting() {
                Vec::new()
            } else {
                state.begin_visiting();
                state.set_status(Status::Discovering);
                vec![Effect::StartBrowsing {
                    target: state.visit_target(),
                    concurrency: state.concurrency(),
                }]
            }
        }
        Msg::DiscoveryCompleted { found } => {
            if state.is_visiting() {
                state.set_status(Status::Discovered { found });
            }
            Vec::new()
        }
        Msg::DiscoveryFailed { .. } => {
            state.finish_visiting();
            state.set_status(Status::DiscoveryFailed);
            Vec::new()
        }
        Msg::VisitProgress { done, total } => {
            if state.is_visiting() {
                state.set_status(Status::Visiting { done, total });
            }
            Vec::new()
        }
        Msg::VisitCompleted {
            visited,
            failed,
            stopped,
        } => {
            state.finish_visiting();
            state.set_status(if stopped {
                Status::VisitStopped { visited, failed }
            } else {
                Status::VisitFinished { visited, failed }
            });
            Vec::new()
        }
        Msg::StopVisitRequested => {
            if state.is_visiting() {
                vec![Effect::StopBrowsing]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn handle_url_changed(state: &mut RunState, url: String) -> Vec<Effect> {
    let change = classify(state.last_url(), &url);
    state.set_last_url(url.clone());

    match change {
        NavChange::Unchanged => Vec::new(),
        NavChange::PositionMoved(pos) => {
            // Same topic, new position: keep any running mark loop alive.
            state.set_last_topic(Some(pos.topic_id));
            Vec::new()
        }
        NavChange::EnteredTopic(pos) | NavChange::TopicSwitched(pos) => {
            state.set_last_topic(Some(pos.topic_id));
            state.set_status(Status::Checking);
            if state.is_marking() {
                // Drain the in-flight run first; inspect once it reports back.
                state.set_pending_inspect(url);
                vec![Effect::StopMarking]
            } else {
                vec![Effect::InspectTopic { url }]
            }
        }
        NavChange::LeftTopic => {
            state.set_last_topic(None);
            state.clear_pending_inspect();
            state.set_status(Status::Idle);
            if state.is_marking() {
                vec![Effect::StopMarking]
            } else {
                Vec::new()
            }
        }
    }
}

fn handle_topic_inspected(
    state: &mut RunState,
    topic_id: u64,
    current_position: u32,
    total_replies: u32,
) -> Vec<Effect> {
    // Stale inspection of a topic we have already navigated away from.
    if state.last_topic_id() != Some(topic_id) {
        return Vec::new();
    }

    let backlog = compute_backlog(current_position, total_replies);
    if backlog.is_empty() {
        state.set_status(Status::NothingToMark);
        return Vec::new();
    }
    if state.is_marking() {
        return Vec::new();
    }

    state.begin_marking();
    state.set_status(Status::BacklogFound {
        count: backlog.len() as u32,
    });
    vec![Effect::StartMarking {
        topic_id,
        first_position: current_position + 1,
        last_position: total_replies,
        delay_ms: state.speed().delay_ms(),
    }]
}

fn handle_mark_completed(
    state: &mut RunState,
    marked: u32,
    failed: u32,
    stopped: bool,
) -> Vec<Effect> {
    state.finish_marking();
    state.set_status(if stopped {
        Status::MarkStopped { marked, failed }
    } else {
        Status::MarkFinished { marked, failed }
    });

    // Re-enter on the topic we switched to while the old run was draining.
    match state.take_pending_inspect() {
        Some(url) => {
            state.set_status(Status::Checking);
            vec![Effect::InspectTopic { url }]
        }
        None => Vec::new(),
    }
}
