/*
[INPUT]:  Task payloads, task ids and the client's session cookie
[OUTPUT]: Task lists, created tasks and mutation acknowledgments
[POS]:    HTTP layer - task endpoints (require an authenticated session)
[UPDATE]: When adding task endpoints or changing payloads
*/

use reqwest::Method;

use crate::http::{ApiClient, Result};
use crate::types::{CreateTaskRequest, Task, TaskId, UpdateTaskRequest};

const TASKS_ENDPOINT: &str = "/api/tasks";

impl ApiClient {
    /// List every task of the session owner, in server order
    ///
    /// GET /api/tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let builder = self.request(Method::GET, TASKS_ENDPOINT)?;
        self.send_json(builder).await
    }

    /// Create a task; the server assigns its id
    ///
    /// POST /api/tasks
    pub async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task> {
        let builder = self.request(Method::POST, TASKS_ENDPOINT)?.json(req);
        self.send_json(builder).await
    }

    /// Set the completion flag of a task
    ///
    /// PUT /api/tasks/{id}
    ///
    /// The response body (the updated task) is not decoded: only the status
    /// decides the outcome.
    pub async fn update_task(&self, id: &TaskId, req: &UpdateTaskRequest) -> Result<()> {
        let url = self.item_url(TASKS_ENDPOINT, id.as_str())?;
        let builder = self.request_url(Method::PUT, url).json(req);
        self.send_empty(builder).await
    }

    /// Delete a task
    ///
    /// DELETE /api/tasks/{id}
    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let url = self.item_url(TASKS_ENDPOINT, id.as_str())?;
        let builder = self.request_url(Method::DELETE, url);
        self.send_empty(builder).await
    }
}
