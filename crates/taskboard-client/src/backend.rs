/*
[INPUT]:  ApiClient (or any other transport)
[OUTPUT]: Backend traits consumed by session, task and probe components
[POS]:    Seam layer - decouples state owners from the HTTP adapter
[UPDATE]: When components need new remote operations
*/

use async_trait::async_trait;
use taskboard_adapter::{
    ApiClient, CreateTaskRequest, LoginRequest, RegisterRequest, Result, Task, TaskId,
    UpdateTaskRequest, UserProfile,
};

/// Remote operations behind the session lifecycle
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Profile of whoever owns the ambient credential
    async fn fetch_profile(&self) -> Result<UserProfile>;

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile>;

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserProfile>;

    async fn logout(&self) -> Result<()>;
}

/// Remote operations on the session owner's task collection
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    async fn create_task(&self, title: &str, description: &str) -> Result<Task>;

    async fn set_task_completed(&self, id: &TaskId, completed: bool) -> Result<()>;

    async fn delete_task(&self, id: &TaskId) -> Result<()>;
}

/// Reachability checks used by the connectivity probe.
///
/// Implementations need not bound their own latency; the probe applies its
/// timeout around each call.
#[async_trait]
pub trait ProbeBackend: Send + Sync {
    /// Authenticated check; fails for anonymous clients even when the backend is up
    async fn probe_profile(&self) -> Result<()>;

    /// Unauthenticated liveness check
    async fn probe_health(&self) -> Result<()>;
}

#[async_trait]
impl SessionBackend for ApiClient {
    async fn fetch_profile(&self) -> Result<UserProfile> {
        ApiClient::fetch_profile(self).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        ApiClient::login(self, &req).await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserProfile> {
        let req = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        ApiClient::register(self, &req).await
    }

    async fn logout(&self) -> Result<()> {
        ApiClient::logout(self).await
    }
}

#[async_trait]
impl TaskBackend for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        ApiClient::list_tasks(self).await
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let req = CreateTaskRequest {
            title: title.to_string(),
            description: description.to_string(),
        };
        ApiClient::create_task(self, &req).await
    }

    async fn set_task_completed(&self, id: &TaskId, completed: bool) -> Result<()> {
        ApiClient::update_task(self, id, &UpdateTaskRequest { completed }).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        ApiClient::delete_task(self, id).await
    }
}

#[async_trait]
impl ProbeBackend for ApiClient {
    async fn probe_profile(&self) -> Result<()> {
        ApiClient::fetch_profile(self).await.map(|_| ())
    }

    async fn probe_health(&self) -> Result<()> {
        ApiClient::health(self).await
    }
}
