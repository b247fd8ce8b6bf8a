use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use skywatch::utils::file_io;
use skywatch::utils::task::spawn_task;
use skywatch::AccountMonitor;
use skywatch::AdvisoryMonitor;
use skywatch::BulletinMonitor;
use skywatch::CallsignMonitor;
use skywatch::Error;
use skywatch::FileWatchStore;
use skywatch::HttpAdvisorySource;
use skywatch::HttpBulletinSource;
use skywatch::HttpFeedSource;
use skywatch::HttpMemberDirectory;
use skywatch::KeywordMonitor;
use skywatch::NamePolicyMonitor;
use skywatch::NewAccountMonitor;
use skywatch::Result;
use skywatch::Settings;
use skywatch::TypeMonitor;
use skywatch::WebhookNotifier;
use skywatch::{run_monitor, Monitor};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let settings = Arc::new(Settings::load(None)?);

    // Initializing Logs
    let _guard = init_observability(&settings.store.log_dir)?;

    // Initializing Shutdown Signal
    let (graceful_tx, graceful_rx) = watch::channel(());

    // Shared collaborators; each monitor takes its own clone so no state
    // crosses task boundaries
    let feed = HttpFeedSource::new(&settings.network)?;
    let store = FileWatchStore::new(&settings.store);
    let notifier = WebhookNotifier::new(&settings.network, &settings.notify)?;
    let directory = HttpMemberDirectory::new(&settings.network)?;
    let advisory_source = HttpAdvisorySource::new(&settings.network)?;
    let bulletin_source = HttpBulletinSource::new(&settings.network)?;

    let mut handles = Vec::new();
    spawn(
        AccountMonitor::new(feed.clone(), notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        CallsignMonitor::new(feed.clone(), notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        TypeMonitor::new(feed.clone(), notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        KeywordMonitor::new(feed.clone(), notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        NamePolicyMonitor::new(feed.clone(), notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        NewAccountMonitor::new(feed, notifier.clone(), store.clone(), directory, settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        AdvisoryMonitor::new(advisory_source, notifier.clone(), store.clone(), settings.clone()),
        graceful_rx.clone(),
        &mut handles,
    )
    .await;
    spawn(
        BulletinMonitor::new(bulletin_source, notifier, store, settings.clone()),
        graceful_rx,
        &mut handles,
    )
    .await;

    info!("Application started. Waiting for CTRL+C signal...");
    // Listen on Shutdown Signal
    if let Err(e) = graceful_shutdown(graceful_tx).await {
        error!("Failed to shutdown: {:?}", e);
    }

    for handle in handles {
        let _ = handle.await;
    }

    println!("Exiting program.");
    Ok(())
}

async fn spawn<M: Monitor + 'static>(
    monitor: M,
    shutdown: watch::Receiver<()>,
    handles: &mut Vec<tokio::task::JoinHandle<()>>,
) {
    let name = monitor.name();
    spawn_task(name, move || run_monitor(monitor, shutdown), Some(handles)).await;
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(Error::Io)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(Error::Io)?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        Error::Fatal(format!("Failed to send shutdown signal: {}", e))
    })?;

    info!("Shutdown completed");
    Ok(())
}

pub fn init_observability(log_dir: &PathBuf) -> Result<WorkerGuard> {
    let log_file = file_io::open_file_for_append(Path::new(log_dir).join("skywatch.log"))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
