use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

const APP_NAME: &str = "Tapet";

/// Best-effort user-facing messages. Never fails; delivery problems are logged.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str);
}

/// Desktop notification through `notify-send`, falling back to a modal
/// `zenity` dialog when no notification daemon accepts it.
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn notify_send(title: &str, message: &str) -> Command {
        let mut cmd = Command::new("notify-send");
        cmd.arg("--app-name").arg(APP_NAME).arg(title).arg(message);
        cmd
    }

    fn zenity(title: &str, message: &str) -> Command {
        let mut cmd = Command::new("zenity");
        cmd.arg("--info")
            .arg("--no-markup")
            .arg(format!("--title={title}"))
            .arg(format!("--text={message}"));
        cmd
    }

    async fn run(mut cmd: Command) -> bool {
        match cmd.output().await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                debug!(
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "notification command failed"
                );
                false
            }
            Err(e) => {
                debug!("notification command unavailable: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) {
        if Self::run(Self::notify_send(title, message)).await {
            return;
        }
        if Self::run(Self::zenity(title, message)).await {
            return;
        }
        warn!(%title, body = %message, "no notification channel available");
    }
}
