use crate::state::SettingsSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and inspect a topic page (id, position, reply total, token).
    InspectTopic { url: String },
    /// Run the rate-limited mark loop over the given position range.
    StartMarking {
        topic_id: u64,
        first_position: u32,
        last_position: u32,
        delay_ms: u64,
    },
    /// Cooperatively cancel the running mark loop.
    StopMarking,
    /// Discover low-engagement topics and visit them in the background.
    StartBrowsing { target: u8, concurrency: u8 },
    /// Cooperatively cancel the running browse run.
    StopBrowsing,
    /// Persist the user-facing settings.
    SaveSettings(SettingsSnapshot),
}
