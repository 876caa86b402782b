//! Fetch and poll lifecycle against a mock backend
//!
//! Covers the live client (auth header, retries), loading transitions,
//! failure handling, stale result discarding and teardown.

mod helpers;

use std::time::Duration;

use assert_matches::assert_matches;
use futures::StreamExt;
use reqwest::Method;
use serde_json::json;
use serial_test::serial;

use helpers::*;
use marketdeck::{
    services::{ApiClient, SessionStore},
    state::{FetchOutcome, ResourceSpec, ResourceView},
    ViewError,
};

fn alerts_spec() -> Vec<ResourceSpec> {
    vec![ResourceSpec::enveloped("alerts", "/api/alerts/active", "alerts")]
}

fn rules_spec() -> Vec<ResourceSpec> {
    vec![ResourceSpec::enveloped("rules", "/api/alerts/rules", "rules")]
}

#[tokio::test]
#[serial]
async fn test_get_sends_bearer_token_and_request_id() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let body = ctx.services.api_client.get_json("/api/alerts/dashboard").await.unwrap();
    assert_eq!(body["total_active"], 4);

    let requests = ctx.backend.requests_to("GET", "/api/alerts/dashboard").await;
    assert_eq!(requests.len(), 1);
    let request_id = requests[0]
        .headers
        .get("X-Request-Id")
        .expect("request id header missing");
    assert!(!request_id.is_empty());
}

#[tokio::test]
#[serial]
async fn test_signed_out_fetch_fails_without_network() {
    let ctx = TestContext::new_with_config(TestConfig {
        signed_in: false,
        ..Default::default()
    })
    .await
    .unwrap();

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    assert_matches!(view.refresh().await, Err(ViewError::Unauthenticated));

    let state = view.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Please sign in again"));
    ctx.backend.verify_endpoint_called("GET", "/api/alerts/active", 0).await;
}

#[tokio::test]
#[serial]
async fn test_get_retries_server_errors_then_succeeds() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get_times("/api/notifications/unread-count", MockResponseConfig::status(503), 2)
        .await;
    ctx.backend
        .mock_get("/api/notifications/unread-count", MockResponseConfig::ok(json!({ "count": 7 })))
        .await;

    let body = ctx.services.api_client.get_json("/api/notifications/unread-count").await.unwrap();
    assert_eq!(body["count"], 7);
    ctx.backend.verify_endpoint_called("GET", "/api/notifications/unread-count", 3).await;
}

#[tokio::test]
#[serial]
async fn test_get_gives_up_after_max_attempts() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend.mock_get("/api/wishlist", MockResponseConfig::status(502)).await;

    let result = ctx.services.api_client.get_json("/api/wishlist").await;
    assert_matches!(result, Err(ViewError::Status { status: 502, .. }));
    ctx.backend.verify_endpoint_called("GET", "/api/wishlist", 3).await;
}

#[tokio::test]
#[serial]
async fn test_client_errors_are_not_retried() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend.mock_get("/api/wishlist", MockResponseConfig::status(404)).await;

    let result = ctx.services.api_client.get_json("/api/wishlist").await;
    assert_matches!(result, Err(ViewError::Status { status: 404, .. }));
    ctx.backend.verify_endpoint_called("GET", "/api/wishlist", 1).await;
}

#[tokio::test]
#[serial]
async fn test_mutations_are_not_retried() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_mutation("POST", "/api/alerts/a1/acknowledge", MockResponseConfig::status(503))
        .await;

    let result = ctx
        .services
        .api_client
        .send_json(Method::POST, "/api/alerts/a1/acknowledge", Some(&json!({})))
        .await;
    assert_matches!(result, Err(ViewError::Status { status: 503, .. }));
    ctx.backend.verify_endpoint_called("POST", "/api/alerts/a1/acknowledge", 1).await;
}

#[tokio::test]
#[serial]
async fn test_client_keeps_base_path_prefix() {
    let ctx = TestContext::bare().await.unwrap();
    let mut backend = ctx.settings.backend.clone();
    backend.base_url = format!("{}/v2/", ctx.backend.uri());

    let client = ApiClient::new(&backend, &ctx.settings.retry, SessionStore::in_memory("ar")).unwrap();
    let url = client.url_for("/api/wishlist").unwrap();
    assert!(url.as_str().ends_with("/v2/api/wishlist"));
}

#[tokio::test]
#[serial]
async fn test_refresh_loads_all_resources() {
    let ctx = TestContext::new().await.unwrap();
    let view = ResourceView::new(
        "alerts",
        ctx.source(),
        vec![
            ResourceSpec::enveloped("alerts", "/api/alerts/active", "alerts"),
            ResourceSpec::raw("dashboard", "/api/alerts/dashboard"),
        ],
    );

    assert_eq!(view.refresh().await.unwrap(), FetchOutcome::Applied);

    let state = view.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.last_updated.is_some());
    assert_eq!(state.data["alerts"].as_array().map(Vec::len), Some(4));
    assert_eq!(state.data["dashboard"]["critical"], 1);
}

#[tokio::test]
#[serial]
async fn test_loading_is_true_only_while_in_flight() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(150),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    let task = {
        let view = view.clone();
        tokio::spawn(async move { view.refresh().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(view.is_loading());

    task.await.unwrap().unwrap();
    assert!(!view.is_loading());
}

#[tokio::test]
#[serial]
async fn test_loading_flips_once_per_cycle() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(50),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    let collector = {
        let stream = view.changes();
        tokio::spawn(async move { stream.map(|state| state.loading).collect::<Vec<_>>().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    for _ in 0..2 {
        view.refresh().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    view.close();

    let mut loading: Vec<bool> = collector.await.unwrap();
    loading.dedup();
    assert_eq!(loading, vec![false, true, false, true, false]);
}

#[tokio::test]
#[serial]
async fn test_failed_batch_keeps_previous_data() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get_times("/api/alerts/active", MockResponseConfig::ok(alerts_body(&sample_alerts())), 1)
        .await;
    ctx.backend
        .mock_get("/api/alerts/active", MockResponseConfig::status(500))
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    view.refresh().await.unwrap();
    let before = view.state().data["alerts"].clone();

    let result = view.refresh().await;
    assert_matches!(result, Err(ViewError::Status { status: 500, .. }));

    let state = view.state();
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("The server is having trouble, please try again")
    );
    assert_eq!(state.data["alerts"], before);
}

#[tokio::test]
#[serial]
async fn test_failure_never_substitutes_demo_data() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend.mock_get("/api/alerts/active", MockResponseConfig::status(500)).await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    assert!(view.refresh().await.is_err());

    let state = view.state();
    assert!(state.error.is_some());
    assert!(!state.has("alerts"));
}

#[tokio::test]
#[serial]
async fn test_one_failing_resource_fails_the_batch() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get("/api/alerts/active", MockResponseConfig::ok(alerts_body(&sample_alerts())))
        .await;
    ctx.backend.mock_get("/api/alerts/dashboard", MockResponseConfig::status(404)).await;

    let view = ResourceView::new(
        "alerts",
        ctx.source(),
        vec![
            ResourceSpec::enveloped("alerts", "/api/alerts/active", "alerts"),
            ResourceSpec::raw("dashboard", "/api/alerts/dashboard"),
        ],
    );

    assert!(view.refresh().await.is_err());
    let state = view.state();
    assert!(state.data.is_empty());
    assert!(state.error.is_some());
}

#[tokio::test]
#[serial]
async fn test_stale_response_is_discarded_after_dependency_change() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(300),
        )
        .await;
    ctx.backend
        .mock_get("/api/alerts/rules", MockResponseConfig::ok(json!({ "rules": sample_rules() })))
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    let slow = {
        let view = view.clone();
        tokio::spawn(async move { view.refresh().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(view.set_dependency("rules", rules_spec()).await.unwrap());

    assert_eq!(slow.await.unwrap().unwrap(), FetchOutcome::Discarded);

    let state = view.state();
    assert!(state.has("rules"));
    assert!(!state.has("alerts"));
    assert!(!state.loading);
    assert_eq!(state.dependency.as_deref(), Some("rules"));
}

#[tokio::test]
#[serial]
async fn test_close_discards_in_flight_response() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(200),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    let mut rx = view.subscribe();
    let in_flight = {
        let view = view.clone();
        tokio::spawn(async move { view.refresh().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    view.close();
    let _ = rx.borrow_and_update();

    assert_eq!(in_flight.await.unwrap().unwrap(), FetchOutcome::Discarded);
    assert!(!rx.has_changed().unwrap());

    let state = view.state();
    assert!(state.closed);
    assert!(state.data.is_empty());
    assert_matches!(view.refresh().await, Err(ViewError::Closed(_)));
}

#[tokio::test]
#[serial]
async fn test_polling_refreshes_until_closed() {
    let ctx = TestContext::new().await.unwrap();
    let view = ResourceView::new(
        "notifications.badge",
        ctx.source(),
        vec![ResourceSpec::raw("unread", "/api/notifications/unread-count")],
    );

    view.start_polling(ctx.poll_interval());
    assert!(view.is_polling());
    tokio::time::sleep(Duration::from_millis(230)).await;

    view.close();
    assert!(!view.is_polling());
    tokio::time::sleep(Duration::from_millis(30)).await;

    let polled = ctx.backend.requests_to("GET", "/api/notifications/unread-count").await.len();
    assert!(polled >= 3, "expected at least 3 polls, got {}", polled);
    assert_eq!(view.state().data["unread"]["count"], 2);

    tokio::time::sleep(Duration::from_millis(150)).await;
    ctx.backend
        .verify_endpoint_called("GET", "/api/notifications/unread-count", polled)
        .await;
}

#[tokio::test]
#[serial]
async fn test_dropping_last_handle_stops_polling() {
    let ctx = TestContext::new().await.unwrap();
    let view = ResourceView::new(
        "notifications.badge",
        ctx.source(),
        vec![ResourceSpec::raw("unread", "/api/notifications/unread-count")],
    );
    view.start_polling(ctx.poll_interval());
    tokio::time::sleep(Duration::from_millis(80)).await;
    drop(view);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let after_drop = ctx.backend.requests_to("GET", "/api/notifications/unread-count").await.len();
    tokio::time::sleep(Duration::from_millis(150)).await;
    ctx.backend
        .verify_endpoint_called("GET", "/api/notifications/unread-count", after_drop)
        .await;
}

#[tokio::test]
#[serial]
async fn test_stopping_poller_mid_request_clears_loading() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(300),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    view.start_polling(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(view.is_loading());

    view.stop_polling();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = view.state();
    assert!(!state.loading);
    assert!(!state.closed);
    assert!(!state.has("alerts"));
}

#[tokio::test]
#[serial]
async fn test_timed_out_refresh_clears_loading() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(300),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    let timed_out = tokio::time::timeout(Duration::from_millis(50), view.refresh()).await;
    assert!(timed_out.is_err());
    assert!(!view.is_loading());

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(!view.is_loading());
    assert!(!view.state().has("alerts"));
}

#[tokio::test]
#[serial]
async fn test_replacing_poller_mid_request_clears_loading() {
    let ctx = TestContext::bare().await.unwrap();
    ctx.backend
        .mock_get(
            "/api/alerts/active",
            MockResponseConfig::ok(alerts_body(&sample_alerts())).delayed(300),
        )
        .await;

    let view = ResourceView::new("alerts", ctx.source(), alerts_spec());
    view.start_polling(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(view.is_loading());

    view.start_polling(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(view.is_polling());
    assert!(!view.is_loading());
    view.close();
}
