use url::Url;

/// Topic identity and read position, derived from a topic URL.
///
/// Recomputed per navigation event; never cached beyond the last topic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicPosition {
    pub topic_id: u64,
    pub current_position: u32,
}

/// Parses topic paths of the form `/t/<...>/<id>[/<pos>]`.
///
/// The first numeric segment after `t` is the topic id, the next one the
/// read position. A URL without a position segment means position 1.
pub fn topic_position(url: &str) -> Option<TopicPosition> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    segments.find(|segment| *segment == "t")?;

    let mut topic_id = None;
    let mut position = None;
    for segment in segments {
        let Ok(number) = segment.parse::<u64>() else {
            continue;
        };
        if topic_id.is_none() {
            topic_id = Some(number);
        } else {
            position = u32::try_from(number).ok();
            break;
        }
    }

    Some(TopicPosition {
        topic_id: topic_id?,
        current_position: position.filter(|pos| *pos >= 1).unwrap_or(1),
    })
}

/// One unread reply to mark. The forum keys its timings payload by the
/// stringified position, so the id is kept as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRef {
    pub id: String,
    pub position: u32,
}

/// Positions `current_position + 1 ..= total_replies`, in ascending order.
///
/// An empty backlog is the common terminal state; a stale progress marker
/// (`total < current`) also yields an empty backlog.
pub fn compute_backlog(current_position: u32, total_replies: u32) -> Vec<ReplyRef> {
    if total_replies <= current_position {
        return Vec::new();
    }
    (current_position + 1..=total_replies)
        .map(|position| ReplyRef {
            id: position.to_string(),
            position,
        })
        .collect()
}
