use std::sync::mpsc;

use skim_logging::skim_info;
use skimmer_core::{update, Msg, RunState};
use skimmer_engine::ClientSettings;

use crate::effects::{BrowseOptions, EffectRunner};
use crate::persistence::SettingsStore;

/// Everything the app needs before the message pump starts.
pub struct AppConfig {
    pub client_settings: ClientSettings,
    pub browse: BrowseOptions,
}

/// Message pump around the pure core: receives messages, applies the
/// update function, runs the resulting effects.
pub struct App {
    state: RunState,
    effects: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl App {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();

        let store = SettingsStore::in_current_dir();
        let snapshot = store.load();
        let effects = EffectRunner::new(
            config.client_settings,
            config.browse,
            store,
            msg_tx.clone(),
        )?;

        let mut app = Self {
            state: RunState::new(),
            effects,
            msg_tx,
            msg_rx,
        };
        app.apply(Msg::SettingsLoaded(snapshot));
        Ok(app)
    }

    /// Sender half for feeding messages from other threads.
    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            skim_info!("{}", state.view().status_line());
        }
        self.state = state;
        self.effects.run(effects);
    }

    /// Pumps messages until the predicate holds for the current state.
    pub fn run_until<F>(&mut self, done: F) -> anyhow::Result<()>
    where
        F: Fn(&RunState) -> bool,
    {
        while !done(&self.state) {
            let msg = self
                .msg_rx
                .recv()
                .map_err(|_| anyhow::anyhow!("message channel closed"))?;
            self.apply(msg);
        }
        Ok(())
    }
}
