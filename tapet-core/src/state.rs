use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TapetError};
use crate::paths::TapetPaths;

/// What the last refresh cycles left behind, persisted across restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionState {
    pub last_resolved_image_url: Option<String>,
    pub last_wallpaper_hash: Option<String>,
}

impl ResolutionState {
    pub fn load(paths: &TapetPaths) -> Result<Self> {
        let path = paths.state_file();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| TapetError::Config(format!("failed to read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Missing state is normal on first run; a corrupt file is logged and ignored.
    pub fn load_or_default(paths: &TapetPaths) -> Self {
        if !paths.state_file().exists() {
            return Self::default();
        }
        Self::load(paths).unwrap_or_else(|e| {
            warn!("ignoring unreadable state: {e}");
            Self::default()
        })
    }

    pub fn save(&self, paths: &TapetPaths) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TapetError::Config(format!("failed to serialize state: {e}")))?;
        let path = paths.state_file();
        std::fs::write(&path, content).map_err(|source| TapetError::FileWrite { path, source })
    }
}
