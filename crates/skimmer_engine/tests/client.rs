use std::time::Duration;

use pretty_assertions::assert_eq;
use skimmer_engine::{ClientSettings, FailureKind, ForumApi, ReqwestForum, POST_DWELL_MS};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forum_for(server: &MockServer) -> ReqwestForum {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestForum::new(settings).expect("client builds")
}

#[tokio::test]
async fn mark_read_replays_the_timings_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/timings"))
        .and(header("X-CSRF-Token", "tok-123"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "topic_id": 661870,
            "timings": { "6": POST_DWELL_MS },
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let forum = forum_for(&server);
    forum.set_csrf_token("tok-123".to_string());
    forum.mark_read(661870, 6).await.expect("mark ok");
}

#[tokio::test]
async fn mark_read_without_token_fails_before_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/timings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let forum = forum_for(&server);
    let err = forum.mark_read(1, 2).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingToken);
}

#[tokio::test]
async fn mark_read_surfaces_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/timings"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let forum = forum_for(&server);
    forum.set_csrf_token("tok".to_string());
    let err = forum.mark_read(1, 2).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn listing_fetch_addresses_the_requested_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("no_definitions", "true"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let forum = forum_for(&server);
    let html = forum.fetch_listing_html(2).await.expect("listing ok");
    assert_eq!(html, "<html></html>");
}

#[tokio::test]
async fn topic_fetch_resolves_relative_paths_and_sends_the_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/some-topic/42"))
        .and(header("Cookie", "_t=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        session_cookie: Some("_t=abc".to_string()),
        ..ClientSettings::default()
    };
    let forum = ReqwestForum::new(settings).expect("client builds");
    let html = forum.fetch_topic_html("/t/some-topic/42").await.expect("ok");
    assert_eq!(html, "ok");
}

#[tokio::test]
async fn topic_fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/slow/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let forum = ReqwestForum::new(settings).expect("client builds");
    let err = forum.fetch_topic_html("/t/slow/1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}
