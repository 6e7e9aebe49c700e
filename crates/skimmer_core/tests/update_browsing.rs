use skimmer_core::{
    update, Effect, Msg, RunState, SettingsSnapshot, SpeedProfile, Status, MAX_CONCURRENCY,
};

#[test]
fn browse_request_starts_with_current_settings() {
    let (state, effects) = update(RunState::new(), Msg::BrowseRequested);
    assert!(state.is_visiting());
    assert_eq!(
        effects,
        vec![Effect::StartBrowsing {
            target: state.visit_target(),
            concurrency: state.concurrency(),
        }]
    );
    assert_eq!(state.status(), Status::Discovering);
}

#[test]
fn second_browse_request_while_visiting_is_a_no_op() {
    let (state, _) = update(RunState::new(), Msg::BrowseRequested);
    let (state, effects) = update(state, Msg::BrowseRequested);
    assert!(effects.is_empty());
    assert!(state.is_visiting());
}

#[test]
fn browsing_and_marking_are_independent() {
    let (state, _) = update(RunState::new(), Msg::BrowseRequested);
    let (state, _) = update(
        state,
        Msg::UrlChanged("https://forum.example.com/t/topic/100/1".to_string()),
    );
    let (state, effects) = update(
        state,
        Msg::TopicInspected {
            topic_id: 100,
            current_position: 1,
            total_replies: 3,
        },
    );
    assert!(state.is_visiting());
    assert!(state.is_marking());
    assert!(matches!(effects.as_slice(), [Effect::StartMarking { .. }]));
}

#[test]
fn browse_lifecycle_updates_status() {
    let (state, _) = update(RunState::new(), Msg::BrowseRequested);

    let (state, _) = update(state, Msg::DiscoveryCompleted { found: 8 });
    assert_eq!(state.status(), Status::Discovered { found: 8 });

    let (state, _) = update(state, Msg::VisitProgress { done: 3, total: 8 });
    assert_eq!(state.status(), Status::Visiting { done: 3, total: 8 });

    let (state, effects) = update(
        state,
        Msg::VisitCompleted {
            visited: 8,
            failed: 0,
            stopped: false,
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_visiting());
    assert_eq!(state.view().status_line(), "visited 8 topics");
}

#[test]
fn discovery_failure_ends_the_browse_run() {
    let (state, _) = update(RunState::new(), Msg::BrowseRequested);
    assert!(state.is_visiting());

    let (state, effects) = update(
        state,
        Msg::DiscoveryFailed {
            message: "http status 500: listing fetch".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_visiting());
    assert_eq!(state.status(), Status::DiscoveryFailed);
    assert_eq!(state.view().status_line(), "could not discover topics");

    // The run ended, so a fresh browse request is accepted again.
    let (state, effects) = update(state, Msg::BrowseRequested);
    assert!(state.is_visiting());
    assert_eq!(effects.len(), 1);
}

#[test]
fn stop_visit_request_cancels_only_when_running() {
    let (state, effects) = update(RunState::new(), Msg::StopVisitRequested);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::BrowseRequested);
    let (state, effects) = update(state, Msg::StopVisitRequested);
    assert_eq!(effects, vec![Effect::StopBrowsing]);

    let (state, _) = update(
        state,
        Msg::VisitCompleted {
            visited: 2,
            failed: 1,
            stopped: true,
        },
    );
    assert_eq!(state.status(), Status::VisitStopped { visited: 2, failed: 1 });
}

#[test]
fn settings_changes_clamp_and_persist() {
    let (state, effects) = update(RunState::new(), Msg::ConcurrencyChanged(42));
    assert_eq!(state.concurrency(), MAX_CONCURRENCY);
    assert_eq!(effects, vec![Effect::SaveSettings(state.settings())]);

    let (state, _) = update(state, Msg::VisitTargetChanged(0));
    assert_eq!(state.visit_target(), 1);

    let (state, effects) = update(state, Msg::SpeedSelected(SpeedProfile::Turbo));
    assert_eq!(state.speed(), SpeedProfile::Turbo);
    assert_eq!(effects.len(), 1);
}

#[test]
fn loaded_settings_are_clamped_without_resaving() {
    let snapshot = SettingsSnapshot {
        speed: SpeedProfile::Crazy,
        concurrency: 0,
        visit_target: 255,
    };
    let (state, effects) = update(RunState::new(), Msg::SettingsLoaded(snapshot));
    assert!(effects.is_empty());
    assert_eq!(state.speed(), SpeedProfile::Crazy);
    assert_eq!(state.concurrency(), 1);
    assert_eq!(state.visit_target(), 100);
}

#[test]
fn speed_profile_keys_round_trip() {
    for profile in SpeedProfile::ALL {
        assert_eq!(SpeedProfile::from_key(profile.key()), Some(profile));
    }
    assert_eq!(SpeedProfile::from_key("FAST"), Some(SpeedProfile::Fast));
    assert_eq!(SpeedProfile::from_key("ludicrous"), None);
    assert_eq!(SpeedProfile::Normal.delay_ms(), 200);
    assert_eq!(SpeedProfile::Crazy.delay_ms(), 25);
}
