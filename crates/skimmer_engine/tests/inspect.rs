use pretty_assertions::assert_eq;
use skimmer_engine::{csrf_token, read_progress, topic_rows, ReadProgress};
use url::Url;

const TOPIC_PAGE: &str = r#"
<html>
  <head><meta name="csrf-token" content="token-xyz"></head>
  <body>
    <div class="timeline-container">
      <div class="timeline-replies">
        12 / 345
      </div>
    </div>
  </body>
</html>
"#;

const LISTING_PAGE: &str = r#"
<html><body>
<table class="topic-list">
  <tbody>
    <tr class="topic-list-item">
      <td class="main-link">
        <a class="title" href="/t/quiet-topic/101">Quiet topic</a>
      </td>
      <td class="num posts"><span class="number">4</span></td>
      <td class="num views"><span class="number" title="482 views">482</span></td>
    </tr>
    <tr class="topic-list-item">
      <td class="main-link">
        <a class="title" href="/t/busy-topic/102">Busy topic</a>
      </td>
      <td class="num posts"><span class="number">87</span></td>
      <td class="num views"><span class="number" title="12400 views">1.2k</span></td>
    </tr>
    <tr class="topic-list-item">
      <td class="main-link">
        <a class="title" href="https://forum.example.com/t/absolute/103">Absolute link</a>
      </td>
      <td class="num posts"><span class="number">3,406</span></td>
      <td class="num views"><span class="number">1.2k</span></td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

#[test]
fn read_progress_prefers_the_timeline_counter() {
    assert_eq!(
        read_progress(TOPIC_PAGE),
        Some(ReadProgress {
            current: 12,
            total: 345
        })
    );
}

#[test]
fn read_progress_ignores_text_around_the_counter() {
    let html = r#"
        <html><body>
          <div class="timeline-replies">replies 12 / 345 loaded</div>
        </body></html>
    "#;
    assert_eq!(
        read_progress(html),
        Some(ReadProgress {
            current: 12,
            total: 345
        })
    );

    // A slash without digits around it is skipped, not taken as the counter.
    let html = r#"
        <html><body>
          <div class="timeline-replies">back / 7 / 21</div>
        </body></html>
    "#;
    assert_eq!(
        read_progress(html),
        Some(ReadProgress {
            current: 7,
            total: 21
        })
    );
}

#[test]
fn read_progress_falls_back_to_counting_posts() {
    let html = r#"
        <html><body>
          <article data-post-id="1"></article>
          <article data-post-id="2"></article>
          <article data-post-id="3"></article>
        </body></html>
    "#;
    assert_eq!(
        read_progress(html),
        Some(ReadProgress {
            current: 3,
            total: 3
        })
    );
}

#[test]
fn read_progress_reports_unrecognized_markup() {
    assert_eq!(read_progress("<html><body><p>hi</p></body></html>"), None);
}

#[test]
fn csrf_token_comes_from_the_meta_tag() {
    assert_eq!(csrf_token(TOPIC_PAGE), Some("token-xyz".to_string()));
    assert_eq!(csrf_token("<html></html>"), None);
}

#[test]
fn topic_rows_parse_titles_links_and_counters() {
    let rows = topic_rows(LISTING_PAGE, None);
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].title, "Quiet topic");
    assert_eq!(rows[0].url, "/t/quiet-topic/101");
    assert_eq!(rows[0].replies, 4);
    // Exact count from the title attribute wins over the rendered text.
    assert_eq!(rows[0].views, 482);

    assert_eq!(rows[1].views, 12400);
    assert_eq!(rows[1].replies, 87);

    // Abbreviated and comma-grouped counters without a title attribute.
    assert_eq!(rows[2].replies, 3406);
    assert_eq!(rows[2].views, 1200);
}

#[test]
fn topic_rows_resolve_hrefs_against_a_base() {
    let base = Url::parse("https://forum.example.com").unwrap();
    let rows = topic_rows(LISTING_PAGE, Some(&base));
    assert_eq!(rows[0].url, "https://forum.example.com/t/quiet-topic/101");
    assert_eq!(rows[2].url, "https://forum.example.com/t/absolute/103");
}

#[test]
fn topic_rows_skip_rows_without_links() {
    let html = r#"
        <table><tr class="topic-list-item"><td class="main-link"></td></tr></table>
    "#;
    assert!(topic_rows(html, None).is_empty());
}
