/*
[INPUT]:  ProbeBackend (profile + health checks), timer ticks, manual refresh triggers
[OUTPUT]: ConnectivityState snapshots via `watch`
[POS]:    Monitoring layer - backend reachability, independent of authentication
[UPDATE]: When changing probe order, period, timeout, or worker lifecycle
*/

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use taskboard_adapter::{ApiError, Result as ApiResult};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::ProbeBackend;
use crate::error::{ClientError, Result};

const NO_RESPONSE: &str = "No response from backend";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Vérification de la connexion...",
            ConnectionStatus::Connected => "✅ Backend connecté",
            ConnectionStatus::Disconnected => "❌ Backend déconnecté",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityState {
    pub status: ConnectionStatus,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub error_detail: Option<String>,
}

impl ConnectivityState {
    /// Local time of the last check; the date is included once it is an hour old
    pub fn last_checked_label(&self) -> Option<String> {
        self.last_checked_label_at(Utc::now())
    }

    fn last_checked_label_at(&self, now: DateTime<Utc>) -> Option<String> {
        let checked = self.last_checked_at?;
        let local = checked.with_timezone(&Local);
        if now.signed_duration_since(checked) < chrono::Duration::hours(1) {
            Some(local.format("%H:%M:%S").to_string())
        } else {
            Some(local.format("%d/%m/%Y %H:%M:%S").to_string())
        }
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Checking,
            last_checked_at: None,
            error_detail: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub interval: Duration,
    /// Bound applied to each probe request separately
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Periodic reachability check telling "backend down" apart from "not logged in".
///
/// The authenticated profile endpoint is tried first; when it fails the
/// unauthenticated health endpoint decides.
pub struct ConnectivityProbe {
    backend: Arc<dyn ProbeBackend>,
    config: ProbeConfig,
    state: watch::Sender<ConnectivityState>,
    running: AtomicBool,
}

impl ConnectivityProbe {
    pub fn new(backend: Arc<dyn ProbeBackend>, config: ProbeConfig) -> Self {
        let (state, _rx) = watch::channel(ConnectivityState::default());
        Self {
            backend,
            config,
            state,
            running: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ConnectivityState {
        self.state.borrow().clone()
    }

    /// Run one probe cycle now
    pub async fn check(&self) -> ConnectionStatus {
        self.state.send_modify(|s| {
            s.status = ConnectionStatus::Checking;
            s.error_detail = None;
        });

        let (status, error_detail) = match self.bounded(self.backend.probe_profile()).await {
            Ok(()) => (ConnectionStatus::Connected, None),
            Err(primary) => {
                debug!(error = %primary, "profile probe failed; trying health");
                match self.bounded(self.backend.probe_health()).await {
                    Ok(()) => (ConnectionStatus::Connected, None),
                    Err(detail) => (ConnectionStatus::Disconnected, Some(detail)),
                }
            }
        };

        match &error_detail {
            Some(detail) => warn!(detail = %detail, "backend unreachable"),
            None => debug!("backend reachable"),
        }

        self.state.send_modify(|s| {
            s.status = status;
            s.last_checked_at = Some(Utc::now());
            s.error_detail = error_detail;
        });
        status
    }

    /// Spawn the recurring worker. A probe has at most one worker at a time.
    pub fn start(self: &Arc<Self>) -> Result<ProbeHandle> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ClientError::ProbeAlreadyRunning);
        }

        let trigger = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(run_worker(self.clone(), trigger.clone(), shutdown.clone()));
        info!(
            interval_secs = self.config.interval.as_secs(),
            timeout_secs = self.config.timeout.as_secs(),
            "connectivity probe started"
        );

        Ok(ProbeHandle {
            probe: self.clone(),
            trigger,
            shutdown,
            worker: Some(worker),
        })
    }

    async fn bounded<F>(&self, probe: F) -> std::result::Result<(), String>
    where
        F: Future<Output = ApiResult<()>>,
    {
        match tokio::time::timeout(self.config.timeout, probe).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(ApiError::Http(err))) => {
                debug!(error = %err, "no response to probe");
                Err(NO_RESPONSE.to_string())
            }
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "timeout of {}ms exceeded",
                self.config.timeout.as_millis()
            )),
        }
    }
}

async fn run_worker(probe: Arc<ConnectivityProbe>, trigger: Arc<Notify>, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(probe.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
            _ = trigger.notified() => {
                debug!("manual connectivity check");
                ticker.reset();
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = probe.check() => {}
        }
    }

    probe.running.store(false, Ordering::SeqCst);
    debug!("connectivity probe stopped");
}

/// Owns a running probe worker; dropping it stops the worker
pub struct ProbeHandle {
    probe: Arc<ConnectivityProbe>,
    trigger: Arc<Notify>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl ProbeHandle {
    /// Probe now and restart the period. Coalesces with a pending request.
    pub fn refresh(&self) {
        self.trigger.notify_one();
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.probe.subscribe()
    }

    pub fn state(&self) -> ConnectivityState {
        self.probe.state()
    }

    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                warn!(error = %err, "connectivity worker ended abnormally");
            }
        }
        info!("connectivity probe shutdown complete");
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
