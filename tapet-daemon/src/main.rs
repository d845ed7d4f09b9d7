mod engine;
mod ipc;
mod tray;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use tapet_core::autostart::XdgAutostart;
use tapet_core::backend::create_backend;
use tapet_core::config::Config;
use tapet_core::http::ReqwestClient;
use tapet_core::notify::{DesktopNotifier, Notifier};
use tapet_core::paths::TapetPaths;
use tapet_core::refresh::Refresher;

use engine::refresh::RefreshEngine;
use engine::RefreshTrigger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tapet_daemon=info,tapet_core=info".into()),
        )
        .init();

    let paths = TapetPaths::new()?;
    paths.ensure_dirs()?;

    if !paths.config_file().exists() {
        if let Err(e) = Config::default().save(&paths) {
            warn!("failed to write default config: {e}");
        }
    }
    let config = Config::load_or_default(&paths);
    info!(
        backend = %config.general.backend,
        source = %config.source.active().kind(),
        interval = config.general.interval,
        "starting tapet-daemon"
    );

    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier);
    let refresher = Refresher::new(
        paths.clone(),
        Arc::new(ReqwestClient::new()),
        create_backend(config.general.backend),
        notifier.clone(),
    );
    let login = XdgAutostart::for_current_exe()?;

    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (trigger, refresh_rx) = RefreshTrigger::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine = RefreshEngine::new(config, paths, refresher, notifier, Box::new(login));

    // spawn tray
    tray::spawn_tray(cmd_tx.clone(), trigger.clone(), engine.subscribe());

    // spawn IPC server
    let ipc_shutdown = shutdown_rx.clone();
    let ipc_tx = cmd_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = ipc::serve_ipc(ipc_tx, trigger, ipc_shutdown).await {
            tracing::error!("IPC server error: {e}");
        }
    });

    // spawn refresh engine
    let engine_shutdown = shutdown_rx.clone();
    let mut engine_handle = tokio::spawn(async move {
        engine.run(cmd_rx, refresh_rx, engine_shutdown).await;
    });

    // run until ctrl+c or a quit request stops the engine
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("received ctrl+c, shutting down");
            let _ = shutdown_tx.send(true);
            let _ = engine_handle.await;
        }
        _ = &mut engine_handle => {
            let _ = shutdown_tx.send(true);
        }
    }

    // clean up socket
    let socket = TapetPaths::socket_path();
    if socket.exists() {
        let _ = std::fs::remove_file(socket);
    }

    info!("tapet-daemon stopped");
    Ok(())
}
