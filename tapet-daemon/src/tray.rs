use ksni::blocking::TrayMethods;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

use tapet_core::interval::{format_interval, INTERVAL_PRESETS};
use tapet_core::ipc::DaemonStatus;
use tapet_core::models::{SourceConfig, SourceKind};

use crate::engine::{DaemonCommand, RefreshTrigger, Reply};

/// Menu state is a copy of the engine's last published [`DaemonStatus`];
/// menu actions only send commands and never change it directly.
struct TapetTray {
    cmd_tx: mpsc::Sender<DaemonCommand>,
    trigger: RefreshTrigger,
    status: DaemonStatus,
}

impl TapetTray {
    /// Fire-and-forget: the engine reports failures through the notifier.
    fn send(&self, make: impl FnOnce(Reply) -> DaemonCommand) {
        let (tx, _rx) = oneshot::channel();
        let _ = self.cmd_tx.blocking_send(make(tx));
    }
}

impl ksni::Tray for TapetTray {
    fn id(&self) -> String {
        "tapet".into()
    }

    fn icon_name(&self) -> String {
        "preferences-desktop-wallpaper".into()
    }

    fn title(&self) -> String {
        "Tapet".into()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            title: "Tapet - Wallpaper Changer".into(),
            description: format!(
                "{}, every {}",
                self.status.source.kind().label(),
                format_interval(self.status.interval_secs)
            ),
            ..Default::default()
        }
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::*;

        let intervals: Vec<MenuItem<Self>> = INTERVAL_PRESETS
            .iter()
            .map(|&(label, seconds)| {
                CheckmarkItem {
                    label: label.into(),
                    checked: self.status.interval_secs == seconds,
                    activate: Box::new(move |tray: &mut Self| {
                        tray.send(|respond| DaemonCommand::SetInterval { seconds, respond });
                    }),
                    ..Default::default()
                }
                .into()
            })
            .collect();

        let sources: Vec<MenuItem<Self>> = SourceKind::ALL
            .iter()
            .map(|&kind| {
                CheckmarkItem {
                    label: kind.label().into(),
                    checked: self.status.source.kind() == kind,
                    activate: Box::new(move |tray: &mut Self| match kind {
                        SourceKind::Picsum => tray.send(|respond| DaemonCommand::SetSource {
                            source: SourceConfig::Picsum,
                            respond,
                        }),
                        _ => tray.send(|respond| DaemonCommand::UseSavedSource { kind, respond }),
                    }),
                    ..Default::default()
                }
                .into()
            })
            .collect();

        vec![
            StandardItem {
                label: "Refresh Wallpaper Now".into(),
                activate: Box::new(|tray: &mut Self| {
                    if let Err(e) = tray.trigger.trigger() {
                        info!("manual refresh dropped: {e}");
                    }
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            SubMenu {
                label: "Change Interval".into(),
                submenu: intervals,
                ..Default::default()
            }
            .into(),
            SubMenu {
                label: "Image Source".into(),
                submenu: sources,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            CheckmarkItem {
                label: "Run at Login".into(),
                checked: self.status.run_at_login,
                activate: Box::new(|tray: &mut Self| {
                    let enabled = !tray.status.run_at_login;
                    tray.send(|respond| DaemonCommand::SetRunAtLogin { enabled, respond });
                }),
                ..Default::default()
            }
            .into(),
            CheckmarkItem {
                label: "Notify on Change".into(),
                checked: self.status.notify_on_change,
                activate: Box::new(|tray: &mut Self| {
                    let enabled = !tray.status.notify_on_change;
                    tray.send(|respond| DaemonCommand::SetNotifyOnChange { enabled, respond });
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".into(),
                activate: Box::new(|tray: &mut Self| {
                    let _ = tray.cmd_tx.blocking_send(DaemonCommand::Quit);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// Run the tray on its own thread and keep its menu in step with `status_rx`.
/// Must be called from within the tokio runtime.
pub fn spawn_tray(
    cmd_tx: mpsc::Sender<DaemonCommand>,
    trigger: RefreshTrigger,
    mut status_rx: watch::Receiver<DaemonStatus>,
) {
    let runtime = tokio::runtime::Handle::current();
    std::thread::spawn(move || {
        let tray = TapetTray {
            cmd_tx,
            trigger,
            status: status_rx.borrow_and_update().clone(),
        };
        let handle = match tray.spawn() {
            Ok(handle) => {
                info!("tray spawned");
                handle
            }
            Err(e) => {
                warn!("tray error: {e}");
                return;
            }
        };

        while runtime.block_on(status_rx.changed()).is_ok() {
            let status = status_rx.borrow_and_update().clone();
            handle.update(|tray: &mut TapetTray| tray.status = status);
        }
    });
}
