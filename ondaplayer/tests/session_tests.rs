//! Session lifecycle tests against a mocked catalog and transport

mod support;

use ondadrive::DriveCatalogClient;
use ondaplayer::{Error, SessionController, SessionState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{MockConnection, MockSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_for(server: &MockServer) -> Arc<DriveCatalogClient> {
    Arc::new(
        DriveCatalogClient::builder()
            .base_url(server.uri())
            .folder_id("folder")
            .api_key("key")
            .build()
            .unwrap(),
    )
}

/// Mount a three-track listing plus the track bodies themselves
async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                {"id": "id-a", "name": "a.mp3"},
                {"id": "id-b", "name": "b.mp3"},
                {"id": "id-c", "name": "c.mp3"}
            ]
        })))
        .mount(server)
        .await;
    for id in ["id-a", "id-b", "id-c"] {
        Mock::given(method("GET"))
            .and(path(format!("/files/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_string("mp3-bytes"))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn empty_catalog_is_a_clean_noop_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .mount(&server)
        .await;

    let sink = MockSink::new();
    let controller = Arc::new(SessionController::new(catalog_for(&server), sink.clone()));
    let connection = MockConnection::ready();

    controller
        .start_stream(connection.clone(), 60)
        .await
        .unwrap();

    // No sink subscription, no playback, connection released, back to Idle
    assert!(!connection.was_subscribed());
    assert!(connection.was_destroyed());
    assert_eq!(sink.play_count(), 0);
    assert_eq!(controller.state().await, SessionState::Idle);
}

#[tokio::test]
async fn deadline_expiry_invokes_stop_and_not_before() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let sink = MockSink::new();
    let controller = Arc::new(SessionController::new(catalog_for(&server), sink.clone()));
    let connection = MockConnection::ready();

    controller
        .start_stream_for(connection.clone(), Duration::from_millis(400))
        .await
        .unwrap();
    assert_eq!(controller.state().await, SessionState::Active);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.state().await, SessionState::Active);
    assert!(!connection.was_destroyed());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(controller.state().await, SessionState::Idle);
    assert!(connection.was_destroyed());
    assert!(sink.stop_count() >= 1);
}

#[tokio::test]
async fn stop_stream_is_idempotent() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let sink = MockSink::new();
    let controller = Arc::new(SessionController::new(catalog_for(&server), sink.clone()));

    // Stop with no session at all
    controller.stop_stream().await;
    assert_eq!(controller.state().await, SessionState::Idle);

    let connection = MockConnection::ready();
    controller
        .start_stream(connection.clone(), 60)
        .await
        .unwrap();
    assert_eq!(controller.state().await, SessionState::Active);

    controller.stop_stream().await;
    controller.stop_stream().await;
    assert_eq!(controller.state().await, SessionState::Idle);
    assert!(connection.was_destroyed());
}

#[tokio::test]
async fn second_start_is_rejected_while_active() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let sink = MockSink::new();
    let controller = Arc::new(SessionController::new(catalog_for(&server), sink.clone()));

    let first = MockConnection::ready();
    controller.start_stream(first.clone(), 60).await.unwrap();
    assert_eq!(controller.state().await, SessionState::Active);

    let second = MockConnection::ready();
    controller.start_stream(second.clone(), 60).await.unwrap();

    // The second connection was never touched
    assert!(!second.was_subscribed());
    assert!(!second.was_destroyed());
    assert_eq!(controller.state().await, SessionState::Active);

    controller.stop_stream().await;
}

#[tokio::test]
async fn connection_never_ready_aborts_the_start() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let sink = MockSink::new();
    let controller = Arc::new(
        SessionController::new(catalog_for(&server), sink.clone())
            .with_ready_timeout(Duration::from_millis(100)),
    );
    let connection = MockConnection::never_ready();

    let result = controller.start_stream(connection.clone(), 60).await;
    assert!(matches!(result, Err(Error::ConnectionTimeout(_))));
    assert!(connection.was_destroyed());
    assert!(!connection.was_subscribed());
    assert_eq!(controller.state().await, SessionState::Idle);
}

#[tokio::test]
async fn catalog_outage_aborts_the_start() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = MockSink::new();
    let controller = Arc::new(SessionController::new(catalog_for(&server), sink.clone()));
    let connection = MockConnection::ready();

    let result = controller.start_stream(connection.clone(), 60).await;
    assert!(matches!(result, Err(Error::CatalogUnavailable(_))));
    assert!(connection.was_destroyed());
    assert!(!connection.was_subscribed());
    assert_eq!(controller.state().await, SessionState::Idle);
}
