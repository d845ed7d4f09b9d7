use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, TapetError};

use super::WallpaperBackend;

pub struct HyprpaperBackend;

impl HyprpaperBackend {
    async fn hyprctl(args: &[&str]) -> Result<String> {
        let output = Command::new("hyprctl")
            .args(args)
            .output()
            .await
            .map_err(|e| TapetError::Backend(format!("failed to run hyprctl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TapetError::Backend(format!("hyprctl failed: {stderr}")));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Empty monitor name means every monitor.
    fn wallpaper_arg(path: &Path) -> String {
        format!(",{}", path.to_string_lossy())
    }
}

#[async_trait]
impl WallpaperBackend for HyprpaperBackend {
    async fn set_wallpaper_all(&self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();

        Self::hyprctl(&["hyprpaper", "preload", &path_str]).await?;
        Self::hyprctl(&["hyprpaper", "wallpaper", &Self::wallpaper_arg(path)]).await?;
        // drop the previous image from memory
        Self::hyprctl(&["hyprpaper", "unload", "unused"]).await?;

        Ok(())
    }

    fn name(&self) -> &str {
        "hyprpaper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_wallpaper_arg() {
        let path = PathBuf::from("/data/wallpapers/wallpaper-1.jpg");
        assert_eq!(
            HyprpaperBackend::wallpaper_arg(&path),
            ",/data/wallpapers/wallpaper-1.jpg"
        );
    }
}
