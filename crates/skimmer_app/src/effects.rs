use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use skim_logging::skim_warn;
use skimmer_core::{topic_position, Effect, Msg};
use skimmer_engine::{
    BrowsePlan, ClientSettings, EngagementWindow, EngineEvent, EngineHandle, InspectRequest,
    MarkPlan, ReqwestForum,
};

use crate::persistence::SettingsStore;

/// Fixed knobs of the browse pipeline that are not part of persisted
/// user settings.
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub window: EngagementWindow,
    pub dwell: Duration,
    pub max_pages: u32,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            window: EngagementWindow::default(),
            dwell: Duration::from_secs(3),
            max_pages: 10,
        }
    }
}

/// Executes core effects against the engine and the settings store, and
/// bridges engine events back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: SettingsStore,
    browse: BrowseOptions,
}

impl EffectRunner {
    pub fn new(
        client_settings: ClientSettings,
        browse: BrowseOptions,
        store: SettingsStore,
        msg_tx: mpsc::Sender<Msg>,
    ) -> anyhow::Result<Self> {
        let forum = ReqwestForum::new(client_settings)
            .map_err(|err| anyhow::anyhow!("forum client: {err}"))?;
        let (engine, event_rx) = EngineHandle::new(Arc::new(forum));
        spawn_event_bridge(event_rx, msg_tx);
        Ok(Self {
            engine,
            store,
            browse,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::InspectTopic { url } => match topic_position(&url) {
                    Some(pos) => self.engine.inspect(InspectRequest {
                        url,
                        topic_id: pos.topic_id,
                        current_position: pos.current_position,
                    }),
                    None => skim_warn!("cannot inspect non-topic url {}", url),
                },
                Effect::StartMarking {
                    topic_id,
                    first_position,
                    last_position,
                    delay_ms,
                } => self.engine.start_mark(MarkPlan {
                    topic_id,
                    first_position,
                    last_position,
                    delay: Duration::from_millis(delay_ms),
                }),
                Effect::StopMarking => self.engine.stop_mark(),
                Effect::StartBrowsing {
                    target,
                    concurrency,
                } => self.engine.start_browse(BrowsePlan {
                    target: target as usize,
                    concurrency: concurrency as usize,
                    window: self.browse.window,
                    dwell: self.browse.dwell,
                    max_pages: self.browse.max_pages,
                }),
                Effect::StopBrowsing => self.engine.stop_browse(),
                Effect::SaveSettings(snapshot) => self.store.save(&snapshot),
            }
        }
    }
}

fn spawn_event_bridge(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TopicInspected {
            topic_id,
            current_position,
            total_replies,
        } => Msg::TopicInspected {
            topic_id,
            current_position,
            total_replies,
        },
        EngineEvent::InspectFailed { error } => {
            skim_warn!("inspection failed: {}", error);
            Msg::InspectFailed {
                message: error.to_string(),
            }
        }
        EngineEvent::MarkProgress { done, total } => Msg::MarkProgress { done, total },
        EngineEvent::MarkCompleted { outcome } => Msg::MarkCompleted {
            marked: outcome.marked,
            failed: outcome.failed,
            stopped: outcome.stopped,
        },
        EngineEvent::DiscoveryCompleted { found } => Msg::DiscoveryCompleted { found },
        EngineEvent::DiscoveryFailed { error } => {
            skim_warn!("discovery failed: {}", error);
            Msg::DiscoveryFailed {
                message: error.to_string(),
            }
        }
        EngineEvent::VisitProgress { done, total } => Msg::VisitProgress { done, total },
        EngineEvent::VisitCompleted { outcome } => Msg::VisitCompleted {
            visited: outcome.visited,
            failed: outcome.failed,
            stopped: outcome.stopped,
        },
    }
}
