pub mod hyprpaper;
pub mod monitor;
pub mod swww;
pub mod system;

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::models::BackendType;

/// Applies a local image file as the desktop background.
#[async_trait]
pub trait WallpaperBackend: Send + Sync {
    async fn set_wallpaper_all(&self, path: &Path) -> Result<()>;
    fn name(&self) -> &str;
}

pub fn create_backend(backend: BackendType) -> Box<dyn WallpaperBackend> {
    match backend {
        BackendType::System => Box::new(system::SystemBackend),
        BackendType::Hyprpaper => Box::new(hyprpaper::HyprpaperBackend),
        BackendType::Swww => Box::new(swww::SwwwBackend),
    }
}
