/*
[INPUT]:  Scripted responses from unit tests
[OUTPUT]: In-memory backends implementing the backend traits
[POS]:    Test infrastructure - shared by component unit tests
[UPDATE]: When backend traits change
*/

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use taskboard_adapter::{ApiError, Result, Task, TaskId, UserProfile};
use tokio::sync::Notify;

use crate::backend::{ProbeBackend, SessionBackend, TaskBackend};

/// Failure a fake backend answers with
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    /// No response at all
    Transport,
    /// Non-success status with an optional `{message}` body
    Status(u16, Option<&'static str>),
}

impl Fault {
    pub(crate) fn to_error(self) -> ApiError {
        match self {
            Fault::Transport => ApiError::Timeout,
            Fault::Status(status, message) => ApiError::Api {
                status,
                message: message.map(str::to_string),
            },
        }
    }
}

pub(crate) fn alice() -> UserProfile {
    UserProfile {
        id: 1u64.into(),
        username: "alice".to_string(),
        email: "a@b.com".to_string(),
    }
}

pub(crate) fn task(id: u64, title: &str, completed: bool) -> Task {
    Task {
        id: id.into(),
        title: title.to_string(),
        description: None,
        completed,
    }
}

#[derive(Debug)]
pub(crate) struct FakeSessionBackend {
    pub profile: Mutex<std::result::Result<UserProfile, Fault>>,
    pub login: Mutex<std::result::Result<UserProfile, Fault>>,
    pub register: Mutex<std::result::Result<UserProfile, Fault>>,
    pub logout: Mutex<Option<Fault>>,
    pub logout_calls: AtomicUsize,
}

impl FakeSessionBackend {
    /// Backend with no session cookie: profile answers 401
    pub(crate) fn anonymous() -> Self {
        Self {
            profile: Mutex::new(Err(Fault::Status(401, None))),
            login: Mutex::new(Ok(alice())),
            register: Mutex::new(Ok(alice())),
            logout: Mutex::new(None),
            logout_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionBackend for FakeSessionBackend {
    async fn fetch_profile(&self) -> Result<UserProfile> {
        self.profile.lock().unwrap().clone().map_err(Fault::to_error)
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<UserProfile> {
        self.login.lock().unwrap().clone().map_err(Fault::to_error)
    }

    async fn register(&self, _username: &str, _email: &str, _password: &str) -> Result<UserProfile> {
        self.register.lock().unwrap().clone().map_err(Fault::to_error)
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        match *self.logout.lock().unwrap() {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }
}

/// Remote task collection kept in memory.
///
/// `hold()` parks every update/delete until the returned guard is dropped,
/// which lets tests observe an operation while it is in flight. Each parked
/// call signals `entered` first.
#[derive(Debug)]
pub(crate) struct FakeTaskBackend {
    remote: Mutex<Vec<Task>>,
    next_id: AtomicU64,
    fault: Mutex<Option<Fault>>,
    gate: tokio::sync::Mutex<()>,
    list_gate: tokio::sync::Mutex<()>,
    pub entered: Notify,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeTaskBackend {
    pub(crate) fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            remote: Mutex::new(tasks),
            next_id: AtomicU64::new(100),
            fault: Mutex::new(None),
            gate: tokio::sync::Mutex::new(()),
            list_gate: tokio::sync::Mutex::new(()),
            entered: Notify::new(),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_fault(&self, fault: Option<Fault>) {
        *self.fault.lock().unwrap() = fault;
    }

    pub(crate) fn set_next_id(&self, id: u64) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    pub(crate) fn remote(&self) -> Vec<Task> {
        self.remote.lock().unwrap().clone()
    }

    pub(crate) async fn hold(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Like `hold`, for list requests
    pub(crate) async fn hold_list(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.list_gate.lock().await
    }

    fn check_fault(&self) -> Result<()> {
        match *self.fault.lock().unwrap() {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self) {
        self.entered.notify_one();
        drop(self.gate.lock().await);
    }
}

#[async_trait]
impl TaskBackend for FakeTaskBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        drop(self.list_gate.lock().await);
        self.check_fault()?;
        Ok(self.remote())
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).into(),
            title: title.to_string(),
            description: Some(description.to_string()),
            completed: false,
        };
        self.remote.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn set_task_completed(&self, id: &TaskId, completed: bool) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.check_fault()?;
        let mut remote = self.remote.lock().unwrap();
        match remote.iter_mut().find(|t| &t.id == id) {
            Some(task) => {
                task.completed = completed;
                Ok(())
            }
            None => Err(Fault::Status(404, Some("Tâche introuvable")).to_error()),
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.check_fault()?;
        let mut remote = self.remote.lock().unwrap();
        let before = remote.len();
        remote.retain(|t| &t.id != id);
        if remote.len() == before {
            return Err(Fault::Status(404, Some("Tâche introuvable")).to_error());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ProbeBehavior {
    Ok,
    Fail(Fault),
    /// Never answers within any sane timeout
    Hang,
}

impl ProbeBehavior {
    async fn run(self) -> Result<()> {
        match self {
            ProbeBehavior::Ok => Ok(()),
            ProbeBehavior::Fail(fault) => Err(fault.to_error()),
            ProbeBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct FakeProbeBackend {
    pub profile: Mutex<ProbeBehavior>,
    pub health: Mutex<ProbeBehavior>,
    pub profile_calls: AtomicUsize,
    pub health_calls: AtomicUsize,
}

impl FakeProbeBackend {
    pub(crate) fn new(profile: ProbeBehavior, health: ProbeBehavior) -> Self {
        Self {
            profile: Mutex::new(profile),
            health: Mutex::new(health),
            profile_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeBackend for FakeProbeBackend {
    async fn probe_profile(&self) -> Result<()> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.profile.lock().unwrap();
        behavior.run().await
    }

    async fn probe_health(&self) -> Result<()> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.health.lock().unwrap();
        behavior.run().await
    }
}
