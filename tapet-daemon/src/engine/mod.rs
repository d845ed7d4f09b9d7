pub mod refresh;

use tokio::sync::{mpsc, oneshot};

use tapet_core::ipc::DaemonStatus;
use tapet_core::models::{SourceConfig, SourceKind};

pub type Reply = oneshot::Sender<Result<(), String>>;

pub enum DaemonCommand {
    Status {
        respond: oneshot::Sender<DaemonStatus>,
    },
    SetInterval {
        seconds: f64,
        respond: Reply,
    },
    SetSource {
        source: SourceConfig,
        respond: Reply,
    },
    UseSavedSource {
        kind: SourceKind,
        respond: Reply,
    },
    SetRunAtLogin {
        enabled: bool,
        respond: Reply,
    },
    SetNotifyOnChange {
        enabled: bool,
        respond: Reply,
    },
    Reload,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TriggerError {
    /// A manual refresh is already queued; this one was dropped.
    Pending,
    Closed,
}

impl std::fmt::Display for TriggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "refresh already pending"),
            Self::Closed => write!(f, "engine unavailable"),
        }
    }
}

/// Single-slot queue for manual refreshes. While one trigger waits for the
/// engine, further triggers are dropped.
#[derive(Clone)]
pub struct RefreshTrigger {
    tx: mpsc::Sender<()>,
}

impl RefreshTrigger {
    pub fn channel() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    pub fn trigger(&self) -> Result<(), TriggerError> {
        self.tx.try_send(()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(()) => TriggerError::Pending,
            mpsc::error::TrySendError::Closed(()) => TriggerError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_drops_when_pending() {
        let (trigger, mut rx) = RefreshTrigger::channel();

        assert_eq!(trigger.trigger(), Ok(()));
        assert_eq!(trigger.trigger(), Err(TriggerError::Pending));

        // engine picks up the queued trigger; the slot frees
        assert!(rx.try_recv().is_ok());
        assert_eq!(trigger.trigger(), Ok(()));

        drop(rx);
        assert_eq!(trigger.trigger(), Err(TriggerError::Closed));
    }
}
