/*
[INPUT]:  `watch::Receiver<Session>`, shared TaskStore
[OUTPUT]: Task loads on login/session restore, task clears on logout
[POS]:    Coordination layer - keeps the task view tied to the current user
[UPDATE]: When changing which session transitions trigger task reloads
*/

use std::sync::Arc;

use taskboard_adapter::UserId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::tasks::TaskStore;

/// Background worker reacting to changes of the authenticated user.
///
/// Every successful authentication triggers `TaskStore::load`, and losing the
/// user triggers `TaskStore::clear`. A different user clears the previous
/// collection before its own load starts. A load still in flight when the
/// session moves on is abandoned. Loading/error-only session updates are ignored.
pub struct SessionTaskSync {
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl SessionTaskSync {
    pub fn spawn(session_rx: watch::Receiver<Session>, tasks: Arc<TaskStore>) -> Self {
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(run_sync(session_rx, tasks, shutdown.clone()));
        Self {
            shutdown,
            worker: Some(worker),
        }
    }

    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                warn!(error = %err, "session sync worker ended abnormally");
            }
        }
    }
}

impl Drop for SessionTaskSync {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Who is authenticated, and by which authentication
type SyncKey = (UserId, u64);

fn sync_key(session: &Session) -> Option<SyncKey> {
    session.user.as_ref().map(|u| (u.id.clone(), session.generation))
}

async fn run_sync(mut session_rx: watch::Receiver<Session>, tasks: Arc<TaskStore>, shutdown: CancellationToken) {
    let mut tracked: Option<SyncKey> = None;

    'session: loop {
        let key = sync_key(&session_rx.borrow_and_update());
        if key != tracked {
            let user_changed = key.as_ref().map(|(id, _)| id) != tracked.as_ref().map(|(id, _)| id);
            if user_changed && tracked.is_some() {
                info!("user changed; clearing tasks");
                tasks.clear();
            }
            tracked = key.clone();

            if let Some((user_id, generation)) = key {
                info!(user_id = %user_id, generation, "user authenticated; loading tasks");
                let load = tasks.load();
                tokio::pin!(load);
                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => break 'session,
                        _ = &mut load => break,
                        changed = session_rx.changed() => {
                            if changed.is_err() {
                                debug!("session channel closed");
                                break 'session;
                            }
                            if sync_key(&session_rx.borrow()) != tracked {
                                debug!("session changed while loading; abandoning load");
                                continue 'session;
                            }
                        }
                    }
                }
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = session_rx.changed() => {
                if changed.is_err() {
                    debug!("session channel closed");
                    break;
                }
            }
        }
    }
}
