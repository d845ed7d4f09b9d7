use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, warn};

use tapet_core::autostart::LoginItemRegistrar;
use tapet_core::backend::{create_backend, monitor};
use tapet_core::config::Config;
use tapet_core::interval::{format_interval, is_valid_interval, to_duration};
use tapet_core::ipc::DaemonStatus;
use tapet_core::models::{SourceConfig, SourceKind};
use tapet_core::notify::Notifier;
use tapet_core::paths::TapetPaths;
use tapet_core::refresh::{RefreshOptions, RefreshOutcome, Refresher};

use super::DaemonCommand;

/// Owns the config, the resolution state and the refresher. Every refresh
/// and every settings change runs inside [`RefreshEngine::run`], one at a time.
pub struct RefreshEngine {
    config: Config,
    paths: TapetPaths,
    refresher: Refresher,
    notifier: Arc<dyn Notifier>,
    login: Box<dyn LoginItemRegistrar>,
    last_refresh: Option<DateTime<Local>>,
    last_error: Option<String>,
    next_refresh: Option<Instant>,
    status_tx: watch::Sender<DaemonStatus>,
}

impl RefreshEngine {
    pub fn new(
        config: Config,
        paths: TapetPaths,
        refresher: Refresher,
        notifier: Arc<dyn Notifier>,
        login: Box<dyn LoginItemRegistrar>,
    ) -> Self {
        let (status_tx, _) = watch::channel(DaemonStatus::default());
        let engine = Self {
            config,
            paths,
            refresher,
            notifier,
            login,
            last_refresh: None,
            last_error: None,
            next_refresh: None,
            status_tx,
        };
        engine.publish();
        engine
    }

    /// Status updates, sent after every refresh and every handled command.
    pub fn subscribe(&self) -> watch::Receiver<DaemonStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(
        mut self,
        mut cmd_rx: mpsc::Receiver<DaemonCommand>,
        mut refresh_rx: mpsc::Receiver<()>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        self.sync_login_item();

        // first tick fires immediately: refresh on startup
        let mut timer = self.new_timer();

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.next_refresh = Some(Instant::now() + timer.period());
                    self.refresh().await;
                }
                Some(()) = refresh_rx.recv() => {
                    self.refresh().await;
                }
                Some(cmd) = cmd_rx.recv() => {
                    match cmd {
                        DaemonCommand::Status { respond } => {
                            let _ = respond.send(self.status());
                        }
                        DaemonCommand::SetInterval { seconds, respond } => {
                            let result = self.set_interval(seconds).await;
                            let applied = result.is_ok();
                            let _ = respond.send(result);
                            if applied {
                                timer = self.new_timer();
                            }
                        }
                        DaemonCommand::SetSource { source, respond } => {
                            let result = self.set_source(source).await;
                            let applied = result.is_ok();
                            let _ = respond.send(result);
                            if applied {
                                self.publish();
                                self.refresh().await;
                            }
                        }
                        DaemonCommand::UseSavedSource { kind, respond } => {
                            let result = match self.config.source.saved(kind) {
                                Some(source) => self.set_source(source).await,
                                None => Err(missing_source_message(kind)),
                            };
                            let applied = result.is_ok();
                            let _ = respond.send(result);
                            if applied {
                                self.publish();
                                self.refresh().await;
                            }
                        }
                        DaemonCommand::SetRunAtLogin { enabled, respond } => {
                            let result = self.set_run_at_login(enabled).await;
                            let _ = respond.send(result);
                        }
                        DaemonCommand::SetNotifyOnChange { enabled, respond } => {
                            let previous = self.config.clone();
                            self.config.general.notify_on_change = enabled;
                            let result = self.persist(previous).await;
                            let _ = respond.send(result);
                        }
                        DaemonCommand::Reload => {
                            if self.reload().await {
                                timer = self.new_timer();
                            }
                        }
                        DaemonCommand::Quit => {
                            info!("quit command received");
                            return;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("shutdown signal received");
                    return;
                }
            }
            self.publish();
        }
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status());
    }

    fn new_timer(&self) -> Interval {
        let period = to_duration(self.config.general.interval);
        info!(interval = %format_interval(self.config.general.interval), "refresh timer started");
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }

    async fn refresh(&mut self) {
        let source = self.config.source.active();
        let opts = RefreshOptions {
            screen: monitor::screen_size(&self.config.general.resolution).await,
            fingerprint: self.config.general.fingerprint,
            notify_on_change: self.config.general.notify_on_change,
            keep_downloads: self.config.general.keep_downloads,
        };

        match self.refresher.refresh(&source, &opts).await {
            Ok(outcome) => {
                self.last_refresh = Some(Local::now());
                self.last_error = None;
                if let RefreshOutcome::Unchanged { url } = outcome {
                    info!(url = %url, "wallpaper already current");
                }
            }
            Err(e) => {
                error!(source = %source.kind(), "error refreshing wallpaper: {e}");
                self.last_error = Some(e.to_string());
                self.notifier
                    .notify(
                        "Wallpaper Error",
                        &format!("Failed to update wallpaper.\n\n{e}"),
                    )
                    .await;
            }
        }
    }

    async fn set_interval(&mut self, seconds: f64) -> Result<(), String> {
        if !is_valid_interval(seconds) {
            return Err(format!("invalid interval: {seconds}s"));
        }
        let previous = self.config.clone();
        self.config.general.interval = seconds;
        self.persist(previous).await?;
        info!(interval = %format_interval(seconds), "refresh interval changed");
        Ok(())
    }

    async fn set_source(&mut self, source: SourceConfig) -> Result<(), String> {
        if let Some(field) = source.missing_field() {
            return Err(format!("{} source needs a non-empty {field}", source.kind()));
        }
        let changed = self.config.source.active() != source;
        let previous = self.config.clone();
        self.config.source.select(&source);
        self.persist(previous).await?;

        if changed {
            if let Err(e) = self.refresher.reset_resolved_url() {
                warn!("failed to reset resolution state: {e}");
            }
        }
        info!(source = %source.kind(), "image source changed");
        Ok(())
    }

    /// Re-read the config file. A file that cannot be read or parsed leaves the
    /// running config in place. Returns true when the timer must restart.
    async fn reload(&mut self) -> bool {
        let config = match Config::load(&self.paths) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to reload config: {e}");
                self.notifier
                    .notify("Settings Error", &format!("Could not reload settings.\n\n{e}"))
                    .await;
                return false;
            }
        };

        if config.source.active() != self.config.source.active() {
            if let Err(e) = self.refresher.reset_resolved_url() {
                warn!("failed to reset resolution state: {e}");
            }
        }
        if config.general.backend != self.config.general.backend {
            self.refresher.set_backend(create_backend(config.general.backend));
        }
        let interval_changed = config.general.interval != self.config.general.interval;
        let login_changed = config.general.run_at_login != self.config.general.run_at_login;

        self.config = config;
        if login_changed {
            self.sync_login_item();
        }
        info!(source = %self.config.source.active().kind(), "config reloaded");
        interval_changed
    }

    async fn set_run_at_login(&mut self, enabled: bool) -> Result<(), String> {
        match self.login.set_run_at_login(enabled) {
            Ok(registered) => {
                let previous = self.config.clone();
                self.config.general.run_at_login = registered;
                self.persist(previous).await
            }
            Err(e) => {
                self.notifier.notify("Login Item Error", &e.to_string()).await;
                Err(e.to_string())
            }
        }
    }

    /// Write the config. On failure, restore `previous` and tell the user.
    async fn persist(&mut self, previous: Config) -> Result<(), String> {
        if let Err(e) = self.config.save(&self.paths) {
            self.config = previous;
            self.notifier.notify("Settings Error", &e.to_string()).await;
            return Err(e.to_string());
        }
        Ok(())
    }

    fn sync_login_item(&mut self) {
        let wanted = self.config.general.run_at_login;
        match self.login.set_run_at_login(wanted) {
            Ok(registered) if registered != wanted => {
                warn!(wanted, registered, "login item state differs from config");
            }
            Ok(_) => {}
            Err(e) => warn!("failed to sync login item: {e}"),
        }
    }

    fn status(&self) -> DaemonStatus {
        DaemonStatus {
            running: true,
            source: self.config.source.active(),
            interval_secs: self.config.general.interval,
            last_resolved_image_url: self.refresher.state().last_resolved_image_url.clone(),
            last_refresh: self.last_refresh.map(|t| t.to_rfc3339()),
            last_error: self.last_error.clone(),
            next_refresh: self.next_refresh.map(|t| {
                let remaining = t.saturating_duration_since(Instant::now());
                format!("{}s", remaining.as_secs())
            }),
            run_at_login: self.config.general.run_at_login,
            notify_on_change: self.config.general.notify_on_change,
        }
    }
}

fn missing_source_message(kind: SourceKind) -> String {
    match kind {
        SourceKind::Picsum => "picsum needs no settings".into(),
        SourceKind::StaticUrl => {
            "no static URL saved; set one with `tapet source static <URL>`".into()
        }
        SourceKind::JsonApi => {
            "no JSON API saved; set one with `tapet source json <URL> <PATH>`".into()
        }
    }
}
