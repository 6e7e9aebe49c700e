use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use skim_logging::{skim_error, skim_info, skim_warn};
use tokio_util::sync::CancellationToken;

use crate::client::ForumApi;
use crate::types::{
    BrowsePlan, ChannelEventSink, EngineEvent, EventSink, FailureKind, InspectRequest, MarkPlan,
};
use crate::{discover, inspect, sequencer, visitor, ApiError};

enum EngineCommand {
    Inspect(InspectRequest),
    StartMark(MarkPlan),
    StopMark,
    StartBrowse(BrowsePlan),
    StopBrowse,
}

/// Command side of the engine. Commands are spawned as tasks on a dedicated
/// runtime thread, so stop commands stay responsive while runs execute.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Spawns the engine worker and returns the handle plus the event stream.
    pub fn new(api: Arc<dyn ForumApi>) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    skim_error!("failed to start engine runtime: {}", err);
                    return;
                }
            };
            run_worker(&runtime, api, cmd_rx, event_tx);
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn inspect(&self, request: InspectRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Inspect(request));
    }

    pub fn start_mark(&self, plan: MarkPlan) {
        let _ = self.cmd_tx.send(EngineCommand::StartMark(plan));
    }

    pub fn stop_mark(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopMark);
    }

    pub fn start_browse(&self, plan: BrowsePlan) {
        let _ = self.cmd_tx.send(EngineCommand::StartBrowse(plan));
    }

    pub fn stop_browse(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopBrowse);
    }
}

fn run_worker(
    runtime: &tokio::runtime::Runtime,
    api: Arc<dyn ForumApi>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    // One token and one live-run flag per activity kind. The flag is
    // cleared by the task itself before it emits its completion event, so
    // a start observed after a completion is never dropped.
    let mut mark_token = CancellationToken::new();
    let mut browse_token = CancellationToken::new();
    let mark_active = Arc::new(AtomicBool::new(false));
    let browse_active = Arc::new(AtomicBool::new(false));

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Inspect(request) => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = run_inspect(api.as_ref(), &request).await;
                    let _ = event_tx.send(event);
                });
            }
            EngineCommand::StartMark(plan) => {
                if mark_active.swap(true, Ordering::SeqCst) {
                    skim_warn!(
                        "mark run already active, dropping start for topic {}",
                        plan.topic_id
                    );
                    continue;
                }
                mark_token = CancellationToken::new();
                let token = mark_token.clone();
                let api = api.clone();
                let event_tx = event_tx.clone();
                let active = mark_active.clone();
                skim_info!(
                    "mark run: topic {} positions {}..={}",
                    plan.topic_id,
                    plan.first_position,
                    plan.last_position
                );
                runtime.spawn(async move {
                    let sink = ChannelEventSink::new(event_tx.clone());
                    let outcome = sequencer::run_mark(api.as_ref(), &plan, &token, &sink).await;
                    active.store(false, Ordering::SeqCst);
                    let _ = event_tx.send(EngineEvent::MarkCompleted { outcome });
                });
            }
            EngineCommand::StopMark => mark_token.cancel(),
            EngineCommand::StartBrowse(plan) => {
                if browse_active.swap(true, Ordering::SeqCst) {
                    skim_warn!("browse run already active, dropping start");
                    continue;
                }
                browse_token = CancellationToken::new();
                let token = browse_token.clone();
                let api = api.clone();
                let event_tx = event_tx.clone();
                let active = browse_active.clone();
                skim_info!(
                    "browse run: target {} concurrency {}",
                    plan.target,
                    plan.concurrency
                );
                runtime.spawn(async move {
                    let sink = ChannelEventSink::new(event_tx.clone());
                    let last = run_browse(api.as_ref(), &plan, &token, &sink).await;
                    active.store(false, Ordering::SeqCst);
                    let _ = event_tx.send(last);
                });
            }
            EngineCommand::StopBrowse => browse_token.cancel(),
        }
    }
}

async fn run_inspect(api: &dyn ForumApi, request: &InspectRequest) -> EngineEvent {
    let html = match api.fetch_topic_html(&request.url).await {
        Ok(html) => html,
        Err(error) => return EngineEvent::InspectFailed { error },
    };

    if let Some(token) = inspect::csrf_token(&html) {
        api.set_csrf_token(token);
    }

    match inspect::read_progress(&html) {
        Some(progress) => EngineEvent::TopicInspected {
            topic_id: request.topic_id,
            current_position: request.current_position,
            total_replies: progress.total,
        },
        None => EngineEvent::InspectFailed {
            error: ApiError {
                kind: FailureKind::MarkupChanged,
                message: "no reply counter found on topic page".to_string(),
            },
        },
    }
}

/// Discovery followed by visiting under one token. Returns the terminal
/// event for the caller to emit after it clears the live-run flag.
async fn run_browse(
    api: &dyn ForumApi,
    plan: &BrowsePlan,
    token: &CancellationToken,
    sink: &dyn EventSink,
) -> EngineEvent {
    let candidates = match discover::discover(api, plan, token).await {
        Ok(candidates) => candidates,
        Err(error) => {
            skim_error!("discovery failed: {}", error);
            return EngineEvent::DiscoveryFailed { error };
        }
    };

    sink.emit(EngineEvent::DiscoveryCompleted {
        found: candidates.len() as u32,
    });

    let outcome = visitor::run_visits(
        api,
        candidates,
        plan.concurrency,
        plan.dwell,
        token,
        sink,
    )
    .await;
    EngineEvent::VisitCompleted { outcome }
}
