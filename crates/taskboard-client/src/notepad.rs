/*
[INPUT]:  LocalStorage (keys `importantDates`, `notebook`), Notifications
[OUTPUT]: Calendar notes + free-form notebook, persisted on explicit save
[POS]:    State layer - local-only user data, never sent to the backend
[UPDATE]: When changing stored formats or notepad operations
*/

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::notify::Notifications;
use crate::storage::{LocalStorage, StorageError};

pub const IMPORTANT_DATES_KEY: &str = "importantDates";
pub const NOTEBOOK_KEY: &str = "notebook";

const MSG_DATE_ADDED: &str = "Note ajoutée au calendrier !";
const MSG_NOTEBOOK_SAVED: &str = "Notes sauvegardées !";
const MSG_SAVE_FAILED: &str = "Impossible d'enregistrer les notes.";

#[derive(Error, Debug)]
pub enum NotePadError {
    #[error("Note is empty")]
    EmptyNote,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A note pinned to a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDate {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub note: String,
}

// Older entries carry a full timestamp; only the day matters here
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(day) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.date_naive())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePadState {
    pub important_dates: Vec<ImportantDate>,
    pub freeform_text: String,
}

pub struct NotePad {
    storage: LocalStorage,
    state: watch::Sender<NotePadState>,
    notifications: Notifications,
}

impl NotePad {
    /// Read both values once. Missing or unreadable content starts empty.
    pub fn load(storage: LocalStorage, notifications: Notifications) -> Self {
        let important_dates = match storage.get(IMPORTANT_DATES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key = IMPORTANT_DATES_KEY, error = %err, "ignoring unparsable stored value");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = IMPORTANT_DATES_KEY, error = %err, "failed to read stored value");
                Vec::new()
            }
        };

        let freeform_text = match storage.get(NOTEBOOK_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                warn!(key = NOTEBOOK_KEY, error = %err, "failed to read stored value");
                String::new()
            }
        };

        let (state, _rx) = watch::channel(NotePadState {
            important_dates,
            freeform_text,
        });
        Self {
            storage,
            state,
            notifications,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NotePadState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NotePadState {
        self.state.borrow().clone()
    }

    /// Pin a note to a day and persist the whole list
    pub fn add_important_date(&self, date: NaiveDate, note: &str) -> Result<(), NotePadError> {
        if note.trim().is_empty() {
            return Err(NotePadError::EmptyNote);
        }

        let mut dates = self.state.borrow().important_dates.clone();
        dates.push(ImportantDate {
            date,
            note: note.to_string(),
        });
        let encoded = serde_json::to_string(&dates)?;
        self.persist(IMPORTANT_DATES_KEY, &encoded)?;

        self.state.send_modify(|s| s.important_dates = dates);
        info!(%date, "calendar note added");
        self.notifications.success(MSG_DATE_ADDED);
        Ok(())
    }

    /// Overwrite the notebook with `text`, verbatim
    pub fn save_freeform_text(&self, text: &str) -> Result<(), NotePadError> {
        self.persist(NOTEBOOK_KEY, text)?;
        self.state.send_modify(|s| s.freeform_text = text.to_string());
        info!(bytes = text.len(), "notebook saved");
        self.notifications.success(MSG_NOTEBOOK_SAVED);
        Ok(())
    }

    pub fn is_important(&self, date: NaiveDate) -> bool {
        self.state
            .borrow()
            .important_dates
            .iter()
            .any(|d| d.date == date)
    }

    pub fn notes_for(&self, date: NaiveDate) -> Vec<String> {
        self.state
            .borrow()
            .important_dates
            .iter()
            .filter(|d| d.date == date)
            .map(|d| d.note.clone())
            .collect()
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), NotePadError> {
        self.storage.set(key, value).map_err(|err| {
            warn!(key, error = %err, "failed to persist notepad");
            self.notifications.error(MSG_SAVE_FAILED);
            NotePadError::from(err)
        })
    }
}
