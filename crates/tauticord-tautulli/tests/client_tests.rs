// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tauticord_config::model::TautulliConfig;
use tauticord_core::traits::UpstreamApi;
use tauticord_core::types::{HomeStatCategory, LibraryItemCounts, LibraryKind, StatMetric};
use tauticord_core::TauticordError;
use tauticord_tautulli::TautulliApi;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> TautulliApi {
    let config = TautulliConfig {
        url: server.uri(),
        api_key: "test-key".into(),
        ..TautulliConfig::default()
    };
    TautulliApi::new(&config).unwrap()
}

fn success(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "response": {"result": "success", "message": null, "data": data}
    }))
}

fn declined(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "response": {"result": "error", "message": message, "data": {}}
    }))
}

async fn mount(server: &MockServer, cmd: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("cmd", cmd))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn activity_counts_transcodes_locally() {
    let server = MockServer::start().await;
    mount(
        &server,
        "get_activity",
        success(serde_json::json!({
            "stream_count": "2",
            "stream_count_transcode": 0,
            "total_bandwidth": 13500,
            "lan_bandwidth": "4500",
            "sessions": [
                {
                    "session_id": "a", "username": "alice", "friendly_name": "Alice",
                    "bandwidth": "4500", "view_offset": "60000", "duration": "7200000",
                    "state": "playing", "stream_container_decision": "direct play",
                    "media_type": "movie", "full_title": "Heat"
                },
                {
                    "session_id": "b", "username": "bob", "friendly_name": "Bob",
                    "bandwidth": 9000, "state": "paused",
                    "stream_container_decision": "transcode",
                    "media_type": "episode", "full_title": "Show - Pilot"
                }
            ]
        })),
    )
    .await;

    let snapshot = api(&server).get_activity().await.unwrap();
    assert_eq!(snapshot.stream_count(), 2);
    assert_eq!(snapshot.transcode_count(), 1);
    assert_eq!(snapshot.remote_bandwidth_kbps(), 9000);
    assert_eq!(snapshot.session_ids(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(snapshot.sessions[0].title, "Heat");
}

#[tokio::test]
async fn empty_activity_is_not_an_error() {
    let server = MockServer::start().await;
    mount(&server, "get_activity", success(serde_json::json!({"sessions": []}))).await;

    let snapshot = api(&server).get_activity().await.unwrap();
    assert_eq!(snapshot.stream_count(), 0);
}

#[tokio::test]
async fn error_status_is_upstream_error() {
    let server = MockServer::start().await;
    mount(&server, "get_activity", ResponseTemplate::new(500)).await;

    let err = api(&server).get_activity().await.unwrap_err();
    assert!(matches!(err, TauticordError::Upstream { .. }));
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn declined_envelope_is_upstream_error() {
    let server = MockServer::start().await;
    mount(&server, "get_activity", declined("Invalid apikey")).await;

    let err = api(&server).get_activity().await.unwrap_err();
    assert!(err.to_string().contains("Invalid apikey"), "got: {err}");
}

#[tokio::test]
async fn terminate_reports_declined_as_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "terminate_session"))
        .and(query_param("session_id", "gone"))
        .respond_with(declined("No session found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "terminate_session"))
        .and(query_param("session_id", "live"))
        .and(query_param("message", "Your stream has ended."))
        .respond_with(success(serde_json::Value::Null))
        .mount(&server)
        .await;

    let api = api(&server);
    assert!(api.terminate_session("live", "Your stream has ended.").await.unwrap());
    assert!(!api.terminate_session("gone", "Your stream has ended.").await.unwrap());
}

#[tokio::test]
async fn libraries_and_counts() {
    let server = MockServer::start().await;
    mount(
        &server,
        "get_libraries_table",
        success(serde_json::json!({
            "recordsTotal": 3,
            "data": [
                {"section_id": "1", "section_name": "Movies", "section_type": "movie"},
                {"section_id": 2, "section_name": "TV Shows", "section_type": "show"},
                {"section_id": 3, "section_name": "Photos", "section_type": "photo"}
            ]
        })),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_library"))
        .and(query_param("section_id", "2"))
        .respond_with(success(serde_json::json!({
            "section_id": 2, "section_type": "show",
            "count": "12", "parent_count": "40", "child_count": "512"
        })))
        .mount(&server)
        .await;

    let api = api(&server);
    let libraries = api.get_libraries().await.unwrap();
    assert_eq!(libraries.len(), 2);
    assert_eq!(libraries[1].kind, LibraryKind::Show);

    let counts = api.get_library_counts(2).await.unwrap();
    assert_eq!(counts, LibraryItemCounts::shows(12, 40, 512));
}

#[tokio::test]
async fn home_stats_and_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_home_stats"))
        .and(query_param("stat_id", "top_users"))
        .and(query_param("stats_type", "duration"))
        .respond_with(success(serde_json::json!({
            "stat_id": "top_users",
            "rows": [
                {"friendly_name": "Alice", "total_plays": 9, "total_duration": "36000"},
                {"friendly_name": "Bob", "total_plays": 3, "total_duration": "7200"}
            ]
        })))
        .mount(&server)
        .await;
    mount(
        &server,
        "get_users_table",
        success(serde_json::json!({
            "recordsTotal": 3,
            "data": [
                {"user_id": 11, "username": "alice", "friendly_name": "Alice", "is_active": 1},
                {"user_id": 12, "username": "bob", "friendly_name": "Bobby", "is_active": "1"},
                {"user_id": 13, "username": "carol", "friendly_name": "Carol", "is_active": 0}
            ]
        })),
    )
    .await;

    let api = api(&server);
    let rows = api
        .get_home_stats(HomeStatCategory::Users, 30, 5, StatMetric::Duration)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "Alice");
    assert_eq!(rows[0].duration_secs, 36000);

    assert_eq!(api.get_user_count().await.unwrap(), 2);
    assert_eq!(api.get_user_id("BOBBY").await.unwrap(), Some(12));
    assert_eq!(api.get_user_id("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn recently_added_passes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_recently_added"))
        .and(query_param("count", "5"))
        .and(query_param("media_type", "movie"))
        .respond_with(success(serde_json::json!({
            "recently_added": [{
                "rating_key": "101", "title": "Heat", "summary": "Heist.",
                "library_name": "Movies", "media_type": "movie",
                "thumb": "/library/metadata/101/thumb/1", "added_at": "1700000000",
                "year": "1995"
            }]
        })))
        .mount(&server)
        .await;

    let items = api(&server).get_recently_added(5, Some("movie"), None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].added_at, 1_700_000_000);
    assert_eq!(items[0].year, Some(1995));
}

#[tokio::test]
async fn plex_online_accepts_unauthorized() {
    let server = MockServer::start().await;
    let pms = MockServer::start().await;
    mount(
        &server,
        "get_server_info",
        success(serde_json::json!({
            "pms_name": "Home", "pms_plexpass": 1, "pms_url": format!("{}/identity", pms.uri())
        })),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&pms)
        .await;

    let api = api(&server);
    let info = api.server_info().await.unwrap();
    assert!(info.plex_pass);
    assert_eq!(info.name, "Home");
    assert!(api.plex_online().await);
}

#[tokio::test]
async fn plex_offline_when_probe_fails() {
    let server = MockServer::start().await;
    let pms = MockServer::start().await;
    mount(
        &server,
        "get_server_info",
        success(serde_json::json!({"pms_url": format!("{}/identity", pms.uri())})),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&pms)
        .await;

    assert!(!api(&server).plex_online().await);
}

#[tokio::test]
async fn plex_online_pings_last_known_server_when_tautulli_is_down() {
    let server = MockServer::start().await;
    let pms = MockServer::start().await;
    mount(
        &server,
        "get_server_info",
        success(serde_json::json!({"pms_url": format!("{}/identity", pms.uri())})),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&pms)
        .await;

    let api = api(&server);
    assert!(api.plex_online().await);

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(api.server_info().await.is_err());
    assert!(api.plex_online().await);
}

#[tokio::test]
async fn plex_offline_when_tautulli_never_answered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!api(&server).plex_online().await);
}
