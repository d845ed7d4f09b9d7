use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use tapet_core::ipc::{IpcRequest, IpcResponse};
use tapet_core::paths::TapetPaths;

use crate::engine::{DaemonCommand, RefreshTrigger, Reply};

pub async fn serve_ipc(
    cmd_tx: mpsc::Sender<DaemonCommand>,
    trigger: RefreshTrigger,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let socket_path = TapetPaths::socket_path();

    // clean up stale socket
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)?;
    }

    let listener = UnixListener::bind(&socket_path)?;
    info!(path = %socket_path.display(), "IPC socket listening");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let tx = cmd_tx.clone();
                        let trigger = trigger.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, tx, trigger).await {
                                warn!("IPC connection error: {e}");
                            }
                        });
                    }
                    Err(e) => warn!("IPC accept error: {e}"),
                }
            }
            _ = shutdown.changed() => {
                info!("IPC server shutting down");
                let _ = std::fs::remove_file(&socket_path);
                return Ok(());
            }
        }
    }
}

async fn handle_connection(
    stream: tokio::net::UnixStream,
    cmd_tx: mpsc::Sender<DaemonCommand>,
    trigger: RefreshTrigger,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut buf_reader = BufReader::new(reader);
    let mut line = String::new();
    buf_reader.read_line(&mut line).await?;

    let response = match serde_json::from_str::<IpcRequest>(line.trim()) {
        Ok(request) => dispatch_request(request, &cmd_tx, &trigger).await,
        Err(e) => IpcResponse::error(format!("invalid request: {e}")),
    };

    let mut resp_line = serde_json::to_string(&response)?;
    resp_line.push('\n');
    writer.write_all(resp_line.as_bytes()).await?;
    Ok(())
}

async fn dispatch_request(
    request: IpcRequest,
    cmd_tx: &mpsc::Sender<DaemonCommand>,
    trigger: &RefreshTrigger,
) -> IpcResponse {
    match request {
        IpcRequest::Status => {
            let (tx, rx) = oneshot::channel();
            if cmd_tx.send(DaemonCommand::Status { respond: tx }).await.is_err() {
                return IpcResponse::error("engine unavailable");
            }
            match rx.await {
                Ok(status) => {
                    IpcResponse::ok_with_data(serde_json::to_value(status).unwrap_or_default())
                }
                Err(_) => IpcResponse::error("engine dropped response"),
            }
        }
        IpcRequest::Refresh => match trigger.trigger() {
            Ok(()) => IpcResponse::ok(),
            Err(e) => IpcResponse::error(e.to_string()),
        },
        IpcRequest::SetInterval { seconds } => {
            request_reply(cmd_tx, |respond| DaemonCommand::SetInterval { seconds, respond }).await
        }
        IpcRequest::SetSource { source } => {
            request_reply(cmd_tx, |respond| DaemonCommand::SetSource { source, respond }).await
        }
        IpcRequest::UseSavedSource { kind } => {
            request_reply(cmd_tx, |respond| DaemonCommand::UseSavedSource { kind, respond }).await
        }
        IpcRequest::SetRunAtLogin { enabled } => {
            request_reply(cmd_tx, |respond| DaemonCommand::SetRunAtLogin { enabled, respond })
                .await
        }
        IpcRequest::SetNotifyOnChange { enabled } => {
            request_reply(cmd_tx, |respond| DaemonCommand::SetNotifyOnChange {
                enabled,
                respond,
            })
            .await
        }
        IpcRequest::Reload => {
            let _ = cmd_tx.send(DaemonCommand::Reload).await;
            IpcResponse::ok()
        }
        IpcRequest::Quit => {
            let _ = cmd_tx.send(DaemonCommand::Quit).await;
            IpcResponse::ok()
        }
    }
}

async fn request_reply(
    cmd_tx: &mpsc::Sender<DaemonCommand>,
    make: impl FnOnce(Reply) -> DaemonCommand,
) -> IpcResponse {
    let (tx, rx) = oneshot::channel();
    if cmd_tx.send(make(tx)).await.is_err() {
        return IpcResponse::error("engine unavailable");
    }
    match rx.await {
        Ok(Ok(())) => IpcResponse::ok(),
        Ok(Err(msg)) => IpcResponse::error(msg),
        Err(_) => IpcResponse::error("engine dropped response"),
    }
}
