/*
[INPUT]:  Mock backend requirements of client integration tests
[OUTPUT]: Mock server setup, settings and fixtures
[POS]:    Test infrastructure - shared across client integration tests
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskboard-client tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use taskboard_adapter::{ApiClient, ClientConfig};
use taskboard_client::ClientSettings;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WAIT: Duration = Duration::from_secs(5);

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Backend with no session: profile answers a bare 401, health answers 200
pub async fn mount_anonymous_backend(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub fn settings_for(server: &MockServer, storage: &TempDir) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        storage_dir: Some(storage.path().to_path_buf()),
        ..ClientSettings::default()
    }
}

pub fn client_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(ApiClient::with_config(ClientConfig::default(), &server.uri()).expect("client init"))
}

pub fn alice_json() -> serde_json::Value {
    serde_json::json!({
        "_id": "u1",
        "username": "alice",
        "email": "a@b.com",
    })
}

pub fn tasks_json() -> serde_json::Value {
    serde_json::json!([
        {"id": 7, "title": "Water plants", "description": "", "completed": false},
        {"id": 8, "title": "Pay rent", "completed": true},
    ])
}
