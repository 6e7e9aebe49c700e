use crate::state::{SpeedProfile, Status};

/// Snapshot of everything a control panel would render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub status: Status,
    pub speed: SpeedProfile,
    pub concurrency: u8,
    pub visit_target: u8,
    pub marking: bool,
    pub visiting: bool,
    pub topic_id: Option<u64>,
}

impl PanelView {
    /// Human-readable status line.
    pub fn status_line(&self) -> String {
        match self.status {
            Status::Idle => "idle".to_string(),
            Status::Checking => "checking topic...".to_string(),
            Status::NothingToMark => "nothing to mark".to_string(),
            Status::BacklogFound { count } => format!("found {count} unread replies"),
            Status::Marking { done, total } => format!("marking {done}/{total}"),
            Status::MarkFinished { marked, failed } if failed == 0 => {
                format!("marked {marked} replies")
            }
            Status::MarkFinished { marked, failed } => {
                format!("marked {marked} replies, {failed} failed")
            }
            Status::MarkStopped { marked, failed } => {
                format!("stopped after {} calls", marked + failed)
            }
            Status::InspectFailed => "could not inspect topic".to_string(),
            Status::Discovering => "discovering topics...".to_string(),
            Status::Discovered { found } => format!("discovered {found} topics"),
            Status::DiscoveryFailed => "could not discover topics".to_string(),
            Status::Visiting { done, total } => format!("visiting {done}/{total}"),
            Status::VisitFinished { visited, failed } if failed == 0 => {
                format!("visited {visited} topics")
            }
            Status::VisitFinished { visited, failed } => {
                format!("visited {visited} topics, {failed} failed")
            }
            Status::VisitStopped { visited, failed } => {
                format!("browse stopped after {} topics", visited + failed)
            }
        }
    }
}
