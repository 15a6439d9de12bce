/*
[INPUT]:  Outcome messages from session, task and notepad operations
[OUTPUT]: Transient user notifications (broadcast) + structured log lines
[POS]:    Presentation seam - toast-equivalent channel
[UPDATE]: When notification levels or delivery change
*/

use taskboard_adapter::ApiError;
use tokio::sync::broadcast;
use tracing::{info, warn};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// One transient, human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Fan-out of notifications to every subscribed consumer.
///
/// Publishing never fails: with no subscriber the message is only logged,
/// and slow subscribers lose the oldest messages first.
#[derive(Debug, Clone)]
pub struct Notifications {
    tx: broadcast::Sender<Notification>,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "notification");
        self.publish(NotificationLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "notification");
        self.publish(NotificationLevel::Error, message);
    }

    fn publish(&self, level: NotificationLevel, message: String) {
        let _ = self.tx.send(Notification { level, message });
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Server-provided message when there is one, the fixed fallback otherwise
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let notifications = Notifications::default();
        let mut rx = notifications.subscribe();

        notifications.success("Tâche créée avec succès !");
        notifications.error("Erreur lors de la suppression.");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, NotificationLevel::Success);
        assert_eq!(first.message, "Tâche créée avec succès !");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.level, NotificationLevel::Error);
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let notifications = Notifications::new(0);
        notifications.success("nobody listens");
    }

    #[test]
    fn test_failure_message_prefers_server_text() {
        let err = ApiError::Api {
            status: 400,
            message: Some("Titre requis".to_string()),
        };
        assert_eq!(failure_message(&err, "fallback"), "Titre requis");
        assert_eq!(failure_message(&ApiError::Timeout, "fallback"), "fallback");
    }
}
