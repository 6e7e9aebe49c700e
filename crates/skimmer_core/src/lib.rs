//! Skimmer core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod nav;
mod state;
mod topic;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use nav::{classify, NavChange};
pub use state::{
    clamp_concurrency, clamp_visit_target, RunState, SettingsSnapshot, SpeedProfile, Status,
    DEFAULT_CONCURRENCY, DEFAULT_VISIT_TARGET, MAX_CONCURRENCY, MAX_VISIT_TARGET,
};
pub use topic::{compute_backlog, topic_position, ReplyRef, TopicPosition};
pub use update::update;
pub use view_model::PanelView;
