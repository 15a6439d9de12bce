/*
[INPUT]:  CLI arguments, optional YAML settings file, OS shutdown signals
[OUTPUT]: Headless client run with logged session, task and connectivity changes
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskboard_client::session::check_required;
use taskboard_client::{AuthOutcome, ClientSettings, Taskboard};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Headless Taskboard client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[arg(long = "email", value_name = "EMAIL", requires = "password")]
    email: Option<String>,
    #[arg(long = "password", value_name = "PASSWORD", env = "TASKBOARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = ?args.config_path,
        dry_run = args.dry_run,
        "starting taskboard"
    );

    let settings = ClientSettings::load(args.config_path.as_deref()).context("load settings")?;
    info!(base_url = %settings.base_url, "settings loaded");

    if args.dry_run {
        info!("dry-run requested; settings validated");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let app = Taskboard::start(&settings).await.context("start client")?;

    if let (Some(email), Some(password)) = (args.email.as_deref(), args.password.as_deref()) {
        if let Err(message) = check_required(&[email, password]) {
            bail!(message);
        }
        match app.session().login(email, password).await {
            AuthOutcome::Authenticated(user) => info!(user = %user.username, "logged in"),
            AuthOutcome::Rejected { message } => warn!(%message, "login rejected"),
        }
    }

    watch_until_shutdown(&app, &shutdown).await;
    info!("shutdown signal received");

    app.shutdown().await;
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

async fn watch_until_shutdown(app: &Taskboard, shutdown: &CancellationToken) {
    let mut session_rx = app.session().subscribe();
    let mut tasks_rx = app.tasks().subscribe();
    let mut probe_rx = app.probe().subscribe();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            Ok(()) = session_rx.changed() => {
                let session = session_rx.borrow_and_update().clone();
                info!(
                    user = ?session.user.as_ref().map(|u| u.username.as_str()),
                    loading = session.loading,
                    error = ?session.error,
                    "session changed"
                );
            }
            Ok(()) = tasks_rx.changed() => {
                let stats = tasks_rx.borrow_and_update().stats();
                info!(
                    total = stats.total,
                    completed = stats.completed,
                    remaining = stats.remaining,
                    "tasks changed"
                );
            }
            Ok(()) = probe_rx.changed() => {
                let state = probe_rx.borrow_and_update().clone();
                info!(
                    status = state.status.label(),
                    last_checked = ?state.last_checked_label(),
                    detail = ?state.error_detail,
                    "connectivity changed"
                );
            }
        }
    }
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
