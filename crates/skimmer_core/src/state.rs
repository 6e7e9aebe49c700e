use crate::view_model::PanelView;

pub const MAX_CONCURRENCY: u8 = 10;
pub const MAX_VISIT_TARGET: u8 = 100;
pub const DEFAULT_CONCURRENCY: u8 = 3;
pub const DEFAULT_VISIT_TARGET: u8 = 10;

/// User-selectable inter-call delay for the mark sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedProfile {
    #[default]
    Normal,
    Fast,
    Turbo,
    Crazy,
}

impl SpeedProfile {
    pub const ALL: [SpeedProfile; 4] = [
        SpeedProfile::Normal,
        SpeedProfile::Fast,
        SpeedProfile::Turbo,
        SpeedProfile::Crazy,
    ];

    /// Delay between consecutive mark calls, in milliseconds.
    pub fn delay_ms(self) -> u64 {
        match self {
            SpeedProfile::Normal => 200,
            SpeedProfile::Fast => 100,
            SpeedProfile::Turbo => 50,
            SpeedProfile::Crazy => 25,
        }
    }

    /// Stable key used in the settings file and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SpeedProfile::Normal => "normal",
            SpeedProfile::Fast => "fast",
            SpeedProfile::Turbo => "turbo",
            SpeedProfile::Crazy => "crazy",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.key().eq_ignore_ascii_case(key))
    }
}

pub fn clamp_concurrency(value: u8) -> u8 {
    value.clamp(1, MAX_CONCURRENCY)
}

pub fn clamp_visit_target(value: u8) -> u8 {
    value.clamp(1, MAX_VISIT_TARGET)
}

/// The persistable slice of [`RunState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub speed: SpeedProfile,
    pub concurrency: u8,
    pub visit_target: u8,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            speed: SpeedProfile::default(),
            concurrency: DEFAULT_CONCURRENCY,
            visit_target: DEFAULT_VISIT_TARGET,
        }
    }
}

/// Single status line surfaced on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Checking,
    NothingToMark,
    BacklogFound {
        count: u32,
    },
    Marking {
        done: u32,
        total: u32,
    },
    MarkFinished {
        marked: u32,
        failed: u32,
    },
    MarkStopped {
        marked: u32,
        failed: u32,
    },
    InspectFailed,
    Discovering,
    Discovered {
        found: u32,
    },
    DiscoveryFailed,
    Visiting {
        done: u32,
        total: u32,
    },
    VisitFinished {
        visited: u32,
        failed: u32,
    },
    VisitStopped {
        visited: u32,
        failed: u32,
    },
}

/// Process-wide run state. The `is_marking`/`is_visiting` flags are each
/// exclusive: a second start request while one is set is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    is_marking: bool,
    is_visiting: bool,
    speed: SpeedProfile,
    concurrency: u8,
    visit_target: u8,
    last_url: String,
    last_topic_id: Option<u64>,
    // Topic URL whose inspection waits for the in-flight mark run to drain.
    pending_inspect: Option<String>,
    status: Status,
    dirty: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            is_marking: false,
            is_visiting: false,
            speed: SpeedProfile::default(),
            concurrency: DEFAULT_CONCURRENCY,
            visit_target: DEFAULT_VISIT_TARGET,
            last_url: String::new(),
            last_topic_id: None,
            pending_inspect: None,
            status: Status::default(),
            dirty: false,
        }
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            status: self.status,
            speed: self.speed,
            concurrency: self.concurrency,
            visit_target: self.visit_target,
            marking: self.is_marking,
            visiting: self.is_visiting,
            topic_id: self.last_topic_id,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_marking(&self) -> bool {
        self.is_marking
    }

    pub fn is_visiting(&self) -> bool {
        self.is_visiting
    }

    pub fn speed(&self) -> SpeedProfile {
        self.speed
    }

    pub fn concurrency(&self) -> u8 {
        self.concurrency
    }

    pub fn visit_target(&self) -> u8 {
        self.visit_target
    }

    pub fn last_url(&self) -> &str {
        &self.last_url
    }

    pub fn last_topic_id(&self) -> Option<u64> {
        self.last_topic_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn settings(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            speed: self.speed,
            concurrency: self.concurrency,
            visit_target: self.visit_target,
        }
    }

    pub(crate) fn apply_settings(&mut self, snapshot: SettingsSnapshot) {
        self.speed = snapshot.speed;
        self.concurrency = clamp_concurrency(snapshot.concurrency);
        self.visit_target = clamp_visit_target(snapshot.visit_target);
        self.mark_dirty();
    }

    pub(crate) fn set_speed(&mut self, speed: SpeedProfile) {
        self.speed = speed;
        self.mark_dirty();
    }

    pub(crate) fn set_concurrency(&mut self, value: u8) {
        self.concurrency = clamp_concurrency(value);
        self.mark_dirty();
    }

    pub(crate) fn set_visit_target(&mut self, value: u8) {
        self.visit_target = clamp_visit_target(value);
        self.mark_dirty();
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        if self.status != status {
            self.status = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_last_url(&mut self, url: String) {
        self.last_url = url;
    }

    pub(crate) fn set_last_topic(&mut self, topic_id: Option<u64>) {
        self.last_topic_id = topic_id;
        self.mark_dirty();
    }

    pub(crate) fn set_pending_inspect(&mut self, url: String) {
        self.pending_inspect = Some(url);
    }

    pub(crate) fn clear_pending_inspect(&mut self) {
        self.pending_inspect = None;
    }

    pub(crate) fn take_pending_inspect(&mut self) -> Option<String> {
        self.pending_inspect.take()
    }

    pub(crate) fn begin_marking(&mut self) {
        self.is_marking = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_marking(&mut self) {
        self.is_marking = false;
        self.mark_dirty();
    }

    pub(crate) fn begin_visiting(&mut self) {
        self.is_visiting = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_visiting(&mut self) {
        self.is_visiting = false;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
