/*
[INPUT]:  Mock task endpoint responses
[OUTPUT]: Test results for task CRUD calls
[POS]:    Integration tests - task endpoints
[UPDATE]: When task endpoints or payloads change
*/

mod common;

use common::{client_for, setup_mock_server};
use taskboard_adapter::{ApiError, CreateTaskRequest, ResourceId, TaskId, UpdateTaskRequest};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_list_tasks_keeps_server_order() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"_id": "b", "title": "Second in id order", "completed": true},
            {"_id": "a", "title": "First in id order", "description": "d", "completed": false},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tasks = assert_ok!(client.list_tasks().await);

    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(tasks[1].description.as_deref(), Some("d"));
}

#[tokio::test]
async fn test_create_task() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(serde_json::json!({
            "title": "Buy milk",
            "description": "",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 7,
            "title": "Buy milk",
            "description": "",
            "completed": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let task = assert_ok!(
        client
            .create_task(&CreateTaskRequest {
                title: "Buy milk".to_string(),
                description: String::new(),
            })
            .await
    );

    assert_eq!(task.id, ResourceId::from(7));
    assert!(!task.completed);
}

#[tokio::test]
async fn test_update_task_puts_completed_flag() {
    let server = setup_mock_server().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/7"))
        .and(body_json(serde_json::json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "title": "Buy milk",
            "completed": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = TaskId::from(7);
    assert_ok!(client.update_task(&id, &UpdateTaskRequest { completed: true }).await);
}

#[tokio::test]
async fn test_delete_task_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Tâche introuvable",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.delete_task(&TaskId::from("missing")).await);
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("Tâche introuvable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_task_ok_with_empty_body() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_ok!(client.delete_task(&TaskId::from(7)).await);
}
