use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, TapetError};
use crate::models::{MonitorInfo, ScreenSize};

/// Detect connected monitors via `hyprctl monitors -j`.
pub async fn detect_monitors() -> Result<Vec<MonitorInfo>> {
    let output = Command::new("hyprctl")
        .args(["monitors", "-j"])
        .output()
        .await
        .map_err(|e| TapetError::Backend(format!("failed to run hyprctl: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TapetError::Backend(format!(
            "hyprctl monitors failed: {stderr}"
        )));
    }

    let json = String::from_utf8_lossy(&output.stdout);
    parse_monitors(&json)
}

fn parse_monitors(json: &str) -> Result<Vec<MonitorInfo>> {
    let raw: Vec<HyprMonitor> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|m| MonitorInfo {
            name: m.name,
            width: m.width,
            height: m.height,
            scale: m.scale,
        })
        .collect())
}

/// Screen size used to size picsum requests.
///
/// An explicit `WIDTHxHEIGHT` setting wins. With "auto", the first monitor
/// reported by hyprctl is used, then the fallback size.
pub async fn screen_size(resolution: &str) -> ScreenSize {
    if resolution.trim() != "auto" {
        match resolution.parse() {
            Ok(size) => return size,
            Err(e) => warn!("ignoring resolution setting: {e}"),
        }
    }

    match detect_monitors().await {
        Ok(monitors) => primary_size(&monitors).unwrap_or(ScreenSize::FALLBACK),
        Err(e) => {
            debug!("monitor detection unavailable: {e}");
            ScreenSize::FALLBACK
        }
    }
}

fn primary_size(monitors: &[MonitorInfo]) -> Option<ScreenSize> {
    monitors
        .first()
        .filter(|m| m.width > 0 && m.height > 0)
        .map(|m| ScreenSize::new(m.width, m.height))
}

#[derive(Debug, Deserialize)]
struct HyprMonitor {
    name: String,
    width: u32,
    height: u32,
    scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_MONITORS: &str = r#"[
        {"id": 0, "name": "eDP-1", "width": 2880, "height": 1800, "scale": 2.0, "focused": true},
        {"id": 1, "name": "DP-3", "width": 2560, "height": 1440, "scale": 1.0, "focused": false}
    ]"#;

    #[test]
    fn test_parse_monitors() {
        let monitors = parse_monitors(MOCK_MONITORS).unwrap();
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].name, "eDP-1");
        assert_eq!(monitors[0].scale, 2.0);
        assert_eq!(monitors[1].width, 2560);
    }

    #[test]
    fn test_primary_size() {
        let monitors = parse_monitors(MOCK_MONITORS).unwrap();
        assert_eq!(primary_size(&monitors), Some(ScreenSize::new(2880, 1800)));
        assert_eq!(primary_size(&[]), None);
    }

    #[tokio::test]
    async fn test_explicit_resolution_wins() {
        assert_eq!(screen_size("2560x1440").await, ScreenSize::new(2560, 1440));
    }
}
