use std::path::PathBuf;

use crate::error::{Result, TapetError};

#[derive(Debug, Clone)]
pub struct TapetPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl TapetPaths {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TapetError::Config("cannot resolve XDG config dir".into()))?
            .join("tapet");

        let data_dir = dirs::data_dir()
            .ok_or_else(|| TapetError::Config("cannot resolve XDG data dir".into()))?
            .join("tapet");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.toml")
    }

    pub fn wallpapers_dir(&self) -> PathBuf {
        self.data_dir.join("wallpapers")
    }

    /// XDG autostart directory. Lives next to the app config dir, not inside it.
    pub fn autostart_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("autostart"))
            .ok_or_else(|| TapetError::Config("cannot resolve XDG config dir".into()))
    }

    pub fn socket_path() -> PathBuf {
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/tapet-{uid}.sock"))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.data_dir, &self.wallpapers_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
