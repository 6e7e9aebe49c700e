use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::Candidate;

/// Read position reported by the topic page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadProgress {
    pub current: u32,
    pub total: u32,
}

/// Pulls "current / total" from the topic timeline.
///
/// Falls back to counting the loaded post nodes when the timeline is absent,
/// treating the count as both current and total.
pub fn read_progress(html: &str) -> Option<ReadProgress> {
    let doc = Html::parse_document(html);

    let timeline_sel = Selector::parse(".timeline-replies").ok()?;
    if let Some(node) = doc.select(&timeline_sel).next() {
        let text = node.text().collect::<String>();
        if let Some(progress) = parse_progress_text(&text) {
            return Some(progress);
        }
    }

    let posts_sel = Selector::parse("article[data-post-id], [data-post-number]").ok()?;
    let count = doc.select(&posts_sel).count() as u32;
    if count == 0 {
        return None;
    }
    Some(ReadProgress {
        current: count,
        total: count,
    })
}

// The timeline text may carry words around the counter; take the first
// digits-slash-digits pair rather than requiring an exact "x / y" string.
fn parse_progress_text(text: &str) -> Option<ReadProgress> {
    for (idx, _) in text.match_indices('/') {
        let head = text[..idx].trim_end();
        let tail = text[idx + 1..].trim_start();

        let Some(start) = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .last()
        else {
            continue;
        };
        let end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());

        let (Ok(current), Ok(total)) = (head[start..].parse(), tail[..end].parse()) else {
            continue;
        };
        return Some(ReadProgress { current, total });
    }
    None
}

/// The anti-forgery token the forum expects on state-changing calls.
pub fn csrf_token(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"meta[name="csrf-token"]"#).ok()?;
    doc.select(&sel)
        .next()?
        .value()
        .attr("content")
        .map(ToOwned::to_owned)
}

/// One [`Candidate`] per listing row. Hrefs are resolved against `base` when
/// given; otherwise site-relative hrefs are kept as-is for the client to
/// resolve at fetch time.
pub fn topic_rows(html: &str, base: Option<&Url>) -> Vec<Candidate> {
    let doc = Html::parse_document(html);
    let (Ok(row_sel), Ok(link_sel), Ok(replies_sel), Ok(views_sel)) = (
        Selector::parse("tr.topic-list-item"),
        Selector::parse("td.main-link a.title"),
        Selector::parse("td.posts .number, td.num.posts .number"),
        Selector::parse("td.views .number, td.num.views .number"),
    ) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for row in doc.select(&row_sel) {
        let Some(link) = row.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let url = match base {
            Some(base) => match base.join(href) {
                Ok(resolved) => String::from(resolved),
                Err(_) => continue,
            },
            None => href.to_string(),
        };
        let replies = row.select(&replies_sel).next().map_or(0, element_count);
        let views = row.select(&views_sel).next().map_or(0, element_count);

        rows.push(Candidate {
            title,
            url,
            views,
            replies,
        });
    }
    rows
}

fn element_count(element: ElementRef) -> u32 {
    // The exact value sometimes lives in the title attribute ("3406 views").
    if let Some(title) = element.value().attr("title") {
        if let Some(count) = title.split_whitespace().next().and_then(parse_count) {
            return count;
        }
    }
    parse_count(&element.text().collect::<String>()).unwrap_or(0)
}

/// Parses the forum's counter renderings: "842", "3,406", "1.2k".
fn parse_count(text: &str) -> Option<u32> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    if let Some(stripped) = cleaned.strip_suffix(['k', 'K']) {
        let value: f64 = stripped.trim().parse().ok()?;
        return Some((value * 1000.0).round() as u32);
    }
    cleaned.parse().ok()
}
