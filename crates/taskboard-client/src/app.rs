/*
[INPUT]:  ClientSettings
[OUTPUT]: Running client: session, tasks, probe, notepad and their workers
[POS]:    Composition root - builds and owns every component
[UPDATE]: When adding components or changing startup/shutdown order
*/

use std::sync::Arc;

use taskboard_adapter::ApiClient;
use tracing::info;

use crate::config::ClientSettings;
use crate::connectivity::{ConnectivityProbe, ProbeHandle};
use crate::error::Result;
use crate::notepad::NotePad;
use crate::notify::Notifications;
use crate::session::SessionManager;
use crate::storage::LocalStorage;
use crate::sync::SessionTaskSync;
use crate::tasks::TaskStore;

/// One client instance wired against one backend.
///
/// All components share a single `ApiClient`, and with it one cookie jar.
pub struct Taskboard {
    notifications: Notifications,
    session: Arc<SessionManager>,
    tasks: Arc<TaskStore>,
    notepad: Arc<NotePad>,
    probe: ProbeHandle,
    sync: SessionTaskSync,
}

impl Taskboard {
    /// Build every component, start the workers and resolve the session
    pub async fn start(settings: &ClientSettings) -> Result<Self> {
        settings.validate()?;

        let api = Arc::new(ApiClient::with_config(settings.client_config(), &settings.base_url)?);
        let notifications = Notifications::new(settings.notification_capacity);

        let storage = LocalStorage::open(settings.storage_dir()?)?;
        let notepad = Arc::new(NotePad::load(storage, notifications.clone()));

        let probe = Arc::new(ConnectivityProbe::new(api.clone(), settings.probe_config())).start()?;

        let session = Arc::new(SessionManager::new(api.clone(), notifications.clone()));
        let tasks = Arc::new(TaskStore::new(api, notifications.clone()));
        let sync = SessionTaskSync::spawn(session.subscribe(), tasks.clone());

        session.bootstrap().await;
        info!(
            base_url = %settings.base_url,
            authenticated = session.snapshot().is_authenticated(),
            "taskboard client started"
        );

        Ok(Self {
            notifications,
            session,
            tasks,
            notepad,
            probe,
            sync,
        })
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn tasks(&self) -> &Arc<TaskStore> {
        &self.tasks
    }

    pub fn notepad(&self) -> &Arc<NotePad> {
        &self.notepad
    }

    pub fn probe(&self) -> &ProbeHandle {
        &self.probe
    }

    /// Stop the workers; in-flight operations are abandoned
    pub async fn shutdown(self) {
        self.sync.shutdown().await;
        self.probe.shutdown().await;
        info!("taskboard client shutdown complete");
    }
}
