/*
[INPUT]:  Public API exports for taskboard-client crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod app;
pub mod backend;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod notepad;
pub mod notify;
pub mod session;
pub mod storage;
pub mod sync;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use app::Taskboard;
pub use config::ClientSettings;
pub use connectivity::{ConnectionStatus, ConnectivityProbe, ConnectivityState, ProbeConfig, ProbeHandle};
pub use error::ClientError;
pub use notepad::{ImportantDate, NotePad, NotePadError, NotePadState};
pub use notify::{Notification, NotificationLevel, Notifications};
pub use session::{Access, AuthOutcome, Session, SessionManager};
pub use storage::{LocalStorage, StorageError};
pub use sync::SessionTaskSync;
pub use tasks::{Confirm, TaskDraft, TaskOutcome, TaskSnapshot, TaskStats, TaskStore};
