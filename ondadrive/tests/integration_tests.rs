//! Integration tests for ondadrive

use ondadrive::{DriveCatalogClient, Error};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_listing_json() -> serde_json::Value {
    json!({
        "files": [
            {"id": "id-a", "name": "a.mp3", "webContentLink": "https://drive.example/a"},
            {"id": "id-b", "name": "b.mp3"},
            {"id": "id-c", "name": "c.mp3"}
        ]
    })
}

async fn client_for(server: &MockServer) -> DriveCatalogClient {
    DriveCatalogClient::builder()
        .base_url(server.uri())
        .folder_id("folder-1")
        .api_key("key-1")
        .build()
        .unwrap()
}

#[tokio::test]
async fn lists_audio_files_of_the_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            "'folder-1' in parents and mimeType='audio/mpeg' and trashed=false",
        ))
        .and(query_param("orderBy", "name"))
        .and(query_param("key", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_listing_json()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let tracks = client.list_tracks().await.unwrap();

    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0].name, "a.mp3");
    assert_eq!(tracks[0].fetch_hint.as_deref(), Some("https://drive.example/a"));
    assert!(tracks[1].fetch_hint.is_none());
}

#[tokio::test]
async fn empty_folder_is_ok_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let tracks = client.list_tracks().await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn auth_failure_means_catalog_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "keyInvalid"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    match client.list_tracks().await {
        Err(Error::BadStatus(status)) => assert_eq!(status.as_u16(), 403),
        other => panic!("expected BadStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn shuffled_playlist_keeps_the_same_tracks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_listing_json()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let playlist = client.shuffled_playlist().await.unwrap();

    assert_eq!(playlist.len(), 3);
    let mut names: Vec<_> = playlist.tracks().iter().map(|t| t.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3"]);
}

#[tokio::test]
async fn fetch_url_is_derived_without_any_request() {
    // No mock mounted: a network call would fail the test
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server).await;

    let track = ondaplaylist::Track::new("id-a", "a.mp3");
    let url = client.fetch_url(&track);
    assert!(url.as_str().ends_with("/files/id-a?alt=media&key=key-1"));
}
