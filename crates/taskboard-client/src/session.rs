/*
[INPUT]:  SessionBackend (profile/login/register/logout), Notifications
[OUTPUT]: Published `Session` snapshots via `watch` + auth outcomes
[POS]:    State layer - single owner of the authenticated-user belief
[UPDATE]: When changing auth flows, fallback messages, or logout semantics
*/

use std::sync::Arc;

use taskboard_adapter::{ApiError, UserProfile};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::SessionBackend;
use crate::notify::{Notifications, failure_message};

pub const MSG_NOT_AUTHENTICATED: &str = "Non authentifié";
pub const MSG_LOGIN_FAILED: &str = "Erreur de connexion";
pub const MSG_REGISTER_FAILED: &str = "Erreur d'inscription";
pub const MSG_LOGOUT_FAILED: &str = "Erreur lors de la déconnexion";
pub const MSG_MISSING_FIELDS: &str = "Veuillez remplir tous les champs.";

const MSG_LOGIN_OK: &str = "Connexion réussie !";
const MSG_REGISTER_OK: &str = "Inscription réussie !";
const MSG_LOGOUT_OK: &str = "Déconnexion réussie.";

/// The client's belief about who is authenticated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped on every successful bootstrap, login or register, so a repeated
    /// login of the same user is still observable
    pub generation: u64,
}

/// Gate decision for views that need an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session not resolved yet; show a placeholder
    Loading,
    Granted,
    RedirectToLogin,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn access(&self) -> Access {
        if self.loading {
            Access::Loading
        } else if self.is_authenticated() {
            Access::Granted
        } else {
            Access::RedirectToLogin
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(UserProfile),
    Rejected { message: String },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }
}

/// Caller-side check that every required form field is filled in
pub fn check_required(fields: &[&str]) -> Result<(), &'static str> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(MSG_MISSING_FIELDS);
    }
    Ok(())
}

/// Owns the session state and runs the four auth operations.
///
/// Operations never fail past this boundary: outcomes are reported through the
/// published `Session`, the returned `AuthOutcome` and notifications.
pub struct SessionManager {
    backend: Arc<dyn SessionBackend>,
    state: watch::Sender<Session>,
    notifications: Notifications,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn SessionBackend>, notifications: Notifications) -> Self {
        let (state, _rx) = watch::channel(Session::default());
        Self {
            backend,
            state,
            notifications,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Resolve the ambient credential into a user, if any
    pub async fn bootstrap(&self) {
        self.begin();
        match self.backend.fetch_profile().await {
            Ok(user) => {
                info!(user_id = %user.id, "session restored");
                self.install(user);
            }
            Err(err) if err.is_unauthorized() => {
                debug!(error = %err, "no active session");
                self.reject(&err, MSG_NOT_AUTHENTICATED);
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                self.reject(&err, MSG_NOT_AUTHENTICATED);
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        self.begin();
        match self.backend.login(email, password).await {
            Ok(user) => {
                info!(user_id = %user.id, "login succeeded");
                self.install(user.clone());
                self.notifications.success(MSG_LOGIN_OK);
                AuthOutcome::Authenticated(user)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                let message = self.reject(&err, MSG_LOGIN_FAILED);
                self.notifications.error(message.clone());
                AuthOutcome::Rejected { message }
            }
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthOutcome {
        self.begin();
        match self.backend.register(username, email, password).await {
            Ok(user) => {
                info!(user_id = %user.id, "registration succeeded");
                self.install(user.clone());
                self.notifications.success(MSG_REGISTER_OK);
                AuthOutcome::Authenticated(user)
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                let message = self.reject(&err, MSG_REGISTER_FAILED);
                self.notifications.error(message.clone());
                AuthOutcome::Rejected { message }
            }
        }
    }

    /// Terminate the session. The local user is cleared whatever the server says.
    pub async fn logout(&self) {
        self.begin();
        let result = self.backend.logout().await;
        self.state.send_modify(|s| {
            s.user = None;
            s.loading = false;
            if result.is_err() {
                s.error = Some(MSG_LOGOUT_FAILED.to_string());
            }
        });

        match result {
            Ok(()) => {
                info!("logged out");
                self.notifications.success(MSG_LOGOUT_OK);
            }
            Err(err) => {
                warn!(error = %err, "server-side logout failed; local session cleared");
                self.notifications.error(MSG_LOGOUT_FAILED);
            }
        }
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn install(&self, user: UserProfile) {
        self.state.send_modify(|s| {
            s.user = Some(user);
            s.loading = false;
            s.error = None;
            s.generation += 1;
        });
    }

    fn reject(&self, err: &ApiError, fallback: &str) -> String {
        let message = failure_message(err, fallback);
        self.state.send_modify(|s| {
            s.user = None;
            s.loading = false;
            s.error = Some(message.clone());
        });
        message
    }
}
