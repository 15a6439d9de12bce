/*
[INPUT]:  TaskBackend (list/create/update/delete), Notifications, user confirmation
[OUTPUT]: `TaskSnapshot` values published via `watch` + per-operation outcomes
[POS]:    State layer - single owner of the authenticated user's task collection
[UPDATE]: When changing task operations, locking, or user-facing messages
*/

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use taskboard_adapter::{Task, TaskId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::TaskBackend;
use crate::notify::{Notifications, failure_message};

pub const MIN_TITLE_CHARS: usize = 3;

pub const MSG_LOAD_FAILED: &str = "Impossible de récupérer les tâches.";
pub const MSG_TITLE_TOO_SHORT: &str = "Le titre doit contenir au moins 3 caractères.";
pub const MSG_CREATE_OK: &str = "Tâche créée avec succès !";
pub const MSG_CREATE_FAILED: &str = "Erreur lors de la création de la tâche.";
pub const MSG_UPDATE_OK: &str = "Tâche mise à jour !";
pub const MSG_UPDATE_FAILED: &str = "Erreur lors de la mise à jour.";
pub const MSG_CONFIRM_DELETE: &str = "Confirmer la suppression de cette tâche ?";
pub const MSG_DELETE_OK: &str = "Tâche supprimée !";
pub const MSG_DELETE_FAILED: &str = "Erreur lors de la suppression.";

/// Contents of the new-task input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

/// Snapshot of everything the task view renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub creating: bool,
    /// Ids with an update or delete in flight
    pub pending: BTreeSet<TaskId>,
    pub draft: TaskDraft,
}

impl TaskSnapshot {
    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total,
            completed,
            remaining: total - completed,
        }
    }

    pub fn is_pending(&self, id: &TaskId) -> bool {
        self.pending.contains(id)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Applied,
    /// Another operation on the same id is in flight; nothing was sent
    Busy,
    /// Declined by the user, or the result arrived after the collection was cleared
    Cancelled,
    /// Rejected before any request
    Invalid(String),
    Failed(String),
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Releases the id from the pending set when dropped
struct MutationGuard<'a> {
    state: &'a watch::Sender<TaskSnapshot>,
    id: TaskId,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|board| {
            board.pending.remove(&self.id);
        });
    }
}

/// Owns the task collection and serializes mutations per task id.
///
/// Nothing is applied locally before the server confirms it.
pub struct TaskStore {
    backend: Arc<dyn TaskBackend>,
    state: watch::Sender<TaskSnapshot>,
    notifications: Notifications,
    // Bumped by `clear`; results started under an older epoch are dropped
    epoch: AtomicU64,
}

impl TaskStore {
    pub fn new(backend: Arc<dyn TaskBackend>, notifications: Notifications) -> Self {
        let (state, _rx) = watch::channel(TaskSnapshot::default());
        Self {
            backend,
            state,
            notifications,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        self.state.borrow().clone()
    }

    pub fn stats(&self) -> TaskStats {
        self.state.borrow().stats()
    }

    /// Replace the local collection with the server's
    pub async fn load(&self) -> TaskOutcome {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state.send_modify(|board| board.loading = true);

        let result = self.backend.list_tasks().await;
        if !self.is_current(epoch) {
            debug!("discarding task list fetched before clear");
            return TaskOutcome::Cancelled;
        }

        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                self.state.send_modify(|board| {
                    board.tasks = tasks;
                    board.loading = false;
                });
                TaskOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                self.state.send_modify(|board| board.loading = false);
                let message = failure_message(&err, MSG_LOAD_FAILED);
                self.notifications.error(message.clone());
                TaskOutcome::Failed(message)
            }
        }
    }

    pub async fn create(&self, title: &str, description: &str) -> TaskOutcome {
        let title = title.trim();
        let description = description.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            self.notifications.error(MSG_TITLE_TOO_SHORT);
            return TaskOutcome::Invalid(MSG_TITLE_TOO_SHORT.to_string());
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state.send_modify(|board| board.creating = true);

        let result = self.backend.create_task(title, description).await;
        if !self.is_current(epoch) {
            debug!("discarding task created before clear");
            return TaskOutcome::Cancelled;
        }

        match result {
            Ok(task) => {
                info!(task_id = %task.id, "task created");
                self.state.send_modify(|board| {
                    board.tasks.push(task);
                    board.creating = false;
                    board.draft = TaskDraft::default();
                });
                self.notifications.success(MSG_CREATE_OK);
                TaskOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, "failed to create task");
                self.state.send_modify(|board| board.creating = false);
                let message = failure_message(&err, MSG_CREATE_FAILED);
                self.notifications.error(message.clone());
                TaskOutcome::Failed(message)
            }
        }
    }

    pub fn set_draft_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|board| board.draft.title = title);
    }

    pub fn set_draft_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.state.send_modify(|board| board.draft.description = description);
    }

    /// Create a task from the current draft; the draft is cleared on success only
    pub async fn submit_draft(&self) -> TaskOutcome {
        let draft = self.state.borrow().draft.clone();
        self.create(&draft.title, &draft.description).await
    }

    pub async fn set_completed(&self, id: &TaskId, completed: bool) -> TaskOutcome {
        let Some(_guard) = self.try_lock(id) else {
            debug!(task_id = %id, "update skipped; task busy");
            return TaskOutcome::Busy;
        };

        match self.backend.set_task_completed(id, completed).await {
            Ok(()) => {
                info!(task_id = %id, completed, "task updated");
                self.state.send_if_modified(|board| {
                    match board.tasks.iter_mut().find(|t| &t.id == id) {
                        Some(task) => {
                            task.completed = completed;
                            true
                        }
                        None => false,
                    }
                });
                self.notifications.success(MSG_UPDATE_OK);
                TaskOutcome::Applied
            }
            Err(err) => {
                warn!(task_id = %id, error = %err, "failed to update task");
                let message = failure_message(&err, MSG_UPDATE_FAILED);
                self.notifications.error(message.clone());
                TaskOutcome::Failed(message)
            }
        }
    }

    /// Delete a task after explicit confirmation
    pub async fn remove<C>(&self, id: &TaskId, confirm: &C) -> TaskOutcome
    where
        C: Confirm + ?Sized,
    {
        let busy = self.state.borrow().is_pending(id);
        if busy {
            debug!(task_id = %id, "delete skipped; task busy");
            return TaskOutcome::Busy;
        }
        if !confirm.confirm(MSG_CONFIRM_DELETE) {
            debug!(task_id = %id, "delete declined");
            return TaskOutcome::Cancelled;
        }
        // Another operation may have started while the prompt was open
        let Some(_guard) = self.try_lock(id) else {
            return TaskOutcome::Busy;
        };

        match self.backend.delete_task(id).await {
            Ok(()) => {
                info!(task_id = %id, "task deleted");
                self.state.send_if_modified(|board| {
                    let before = board.tasks.len();
                    board.tasks.retain(|t| &t.id != id);
                    board.tasks.len() != before
                });
                self.notifications.success(MSG_DELETE_OK);
                TaskOutcome::Applied
            }
            Err(err) => {
                warn!(task_id = %id, error = %err, "failed to delete task");
                let message = failure_message(&err, MSG_DELETE_FAILED);
                self.notifications.error(message.clone());
                TaskOutcome::Failed(message)
            }
        }
    }

    /// Forget every task, e.g. after logout.
    ///
    /// In-flight loads and creates are discarded when they complete. Pending ids
    /// stay until their operations finish.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|board| {
            board.tasks.clear();
            board.loading = false;
            board.creating = false;
            board.draft = TaskDraft::default();
        });
        debug!("task collection cleared");
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    fn try_lock(&self, id: &TaskId) -> Option<MutationGuard<'_>> {
        let acquired = self
            .state
            .send_if_modified(|board| board.pending.insert(id.clone()));
        acquired.then(|| MutationGuard {
            state: &self.state,
            id: id.clone(),
        })
    }
}
