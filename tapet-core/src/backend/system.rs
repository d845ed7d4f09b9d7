use std::path::Path;

use async_trait::async_trait;

use crate::error::{Result, TapetError};

use super::WallpaperBackend;

/// Desktop-agnostic backend: GNOME, KDE, XFCE, macOS and others, via the
/// `wallpaper` crate. The call blocks, so it runs off the async runtime.
pub struct SystemBackend;

#[async_trait]
impl WallpaperBackend for SystemBackend {
    async fn set_wallpaper_all(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| TapetError::Backend(format!("non-UTF-8 path: {}", path.display())))?
            .to_string();

        tokio::task::spawn_blocking(move || {
            wallpaper::set_from_path(&path_str).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| TapetError::Backend(format!("wallpaper task failed: {e}")))?
        .map_err(|e| TapetError::Backend(format!("failed to set wallpaper: {e}")))
    }

    fn name(&self) -> &str {
        "system"
    }
}
