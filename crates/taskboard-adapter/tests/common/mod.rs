/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskboard-adapter tests

use taskboard_adapter::{ApiClient, ClientConfig};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_config(ClientConfig::default(), &server.uri()).expect("client init")
}

/// Profile body as the backend returns it
#[allow(dead_code)]
pub fn alice_json() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "alice",
        "email": "a@b.com",
    })
}
