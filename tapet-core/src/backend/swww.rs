use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, TapetError};

use super::WallpaperBackend;

pub struct SwwwBackend;

impl SwwwBackend {
    fn build_command(path: &Path) -> Command {
        let mut cmd = Command::new("swww");
        cmd.arg("img").arg(path);
        cmd.arg("--transition-type").arg("fade");
        cmd
    }
}

#[async_trait]
impl WallpaperBackend for SwwwBackend {
    async fn set_wallpaper_all(&self, path: &Path) -> Result<()> {
        let output = Self::build_command(path)
            .output()
            .await
            .map_err(|e| TapetError::Backend(format!("failed to run swww: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TapetError::Backend(format!("swww failed: {stderr}")));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "swww"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_swww_command_args() {
        let path = PathBuf::from("/data/wallpapers/wallpaper-1.jpg");
        let cmd = SwwwBackend::build_command(&path);
        let prog = cmd.as_std().get_program().to_string_lossy().to_string();
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(prog, "swww");
        assert_eq!(args, ["img", "/data/wallpapers/wallpaper-1.jpg", "--transition-type", "fade"]);
    }
}
