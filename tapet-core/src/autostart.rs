use std::path::PathBuf;

use tracing::info;

use crate::error::{Result, TapetError};
use crate::paths::TapetPaths;

const DESKTOP_FILE: &str = "tapet-daemon.desktop";

/// Registers the daemon for launch at user login.
pub trait LoginItemRegistrar: Send + Sync {
    /// Returns the registration state after the call.
    fn set_run_at_login(&self, enabled: bool) -> Result<bool>;
}

/// XDG autostart entry in `$XDG_CONFIG_HOME/autostart`.
pub struct XdgAutostart {
    dir: PathBuf,
    exec: PathBuf,
}

impl XdgAutostart {
    pub fn new(dir: PathBuf, exec: PathBuf) -> Self {
        Self { dir, exec }
    }

    /// Entry for the running executable in the user's autostart directory.
    pub fn for_current_exe() -> Result<Self> {
        let exec = std::env::current_exe()
            .map_err(|e| TapetError::LoginItem(format!("cannot locate executable: {e}")))?;
        Ok(Self::new(TapetPaths::autostart_dir()?, exec))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(DESKTOP_FILE)
    }

    pub fn is_registered(&self) -> bool {
        self.entry_path().exists()
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Tapet\n\
             Comment=Periodically refresh the desktop wallpaper\n\
             Exec=\"{}\"\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec.display()
        )
    }
}

impl LoginItemRegistrar for XdgAutostart {
    fn set_run_at_login(&self, enabled: bool) -> Result<bool> {
        let path = self.entry_path();
        if enabled {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                TapetError::LoginItem(format!("failed to create {}: {e}", self.dir.display()))
            })?;
            std::fs::write(&path, self.desktop_entry()).map_err(|e| {
                TapetError::LoginItem(format!("failed to write {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "registered for login");
        } else if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                TapetError::LoginItem(format!("failed to remove {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "unregistered from login");
        }
        Ok(self.is_registered())
    }
}
