use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TapetError};
use crate::interval::{is_valid_interval, DEFAULT_INTERVAL_SECS};
use crate::models::{BackendType, FingerprintMode, SourceConfig, SourceKind};
use crate::paths::TapetPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub source: SourceSettings,
}

impl Config {
    pub fn load(paths: &TapetPaths) -> Result<Self> {
        let path = paths.config_file();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| TapetError::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config: Self = toml::from_str(&content)?;
        if !is_valid_interval(config.general.interval) {
            warn!(
                interval = config.general.interval,
                "interval out of range, using default"
            );
            config.general.interval = DEFAULT_INTERVAL_SECS;
        }
        Ok(config)
    }

    pub fn load_or_default(paths: &TapetPaths) -> Self {
        Self::load(paths).unwrap_or_default()
    }

    pub fn save(&self, paths: &TapetPaths) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TapetError::Config(format!("failed to serialize config: {e}")))?;
        let path = paths.config_file();
        std::fs::write(&path, content)
            .map_err(|e| TapetError::Config(format!("failed to write {}: {e}", path.display())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Refresh interval in seconds.
    pub interval: f64,
    pub backend: BackendType,
    /// "auto" or "WIDTHxHEIGHT".
    pub resolution: String,
    pub fingerprint: FingerprintMode,
    pub run_at_login: bool,
    pub notify_on_change: bool,
    pub keep_downloads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            backend: BackendType::System,
            resolution: "auto".into(),
            fingerprint: FingerprintMode::Attributes,
            run_at_login: false,
            notify_on_change: false,
            keep_downloads: 3,
        }
    }
}

/// Persisted source selection. Values for every kind are kept so that
/// switching back to a kind restores what the user last entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub static_url: String,
    pub json_api_url: String,
    pub json_path: String,
}

impl SourceSettings {
    /// The active source. A kind whose fields are empty falls back to picsum.
    pub fn active(&self) -> SourceConfig {
        self.saved(self.kind).unwrap_or(SourceConfig::Picsum)
    }

    /// The stored configuration for `kind`, if it is complete.
    pub fn saved(&self, kind: SourceKind) -> Option<SourceConfig> {
        match kind {
            SourceKind::Picsum => Some(SourceConfig::Picsum),
            SourceKind::StaticUrl if !self.static_url.is_empty() => Some(SourceConfig::StaticUrl {
                url: self.static_url.clone(),
            }),
            SourceKind::JsonApi if !self.json_api_url.is_empty() && !self.json_path.is_empty() => {
                Some(SourceConfig::JsonApi {
                    url: self.json_api_url.clone(),
                    path: self.json_path.clone(),
                })
            }
            _ => None,
        }
    }

    /// Make `source` the active one, keeping the other kinds' values.
    pub fn select(&mut self, source: &SourceConfig) {
        self.kind = source.kind();
        match source {
            SourceConfig::Picsum => {}
            SourceConfig::StaticUrl { url } => self.static_url = url.clone(),
            SourceConfig::JsonApi { url, path } => {
                self.json_api_url = url.clone();
                self.json_path = path.clone();
            }
        }
    }
}
