use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::Result;

const FILE_PREFIX: &str = "wallpaper-";

/// File name for a newly downloaded wallpaper. Unique per write so that
/// desktops caching by path pick up the new image.
pub fn download_file_name() -> String {
    format!(
        "{FILE_PREFIX}{}.jpg",
        chrono::Utc::now().format("%Y%m%dT%H%M%S%.9f")
    )
}

/// Delete old downloaded wallpapers, keeping the newest `keep` files.
/// `current` is never deleted. Returns the number of files removed.
pub fn prune_downloads(dir: &Path, keep: usize, current: &Path) -> Result<usize> {
    let mut entries: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let is_download = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(FILE_PREFIX));
        if !is_download || path == current {
            continue;
        }
        if let Ok(meta) = entry.metadata() {
            let modified = meta.modified().unwrap_or(std::time::UNIX_EPOCH);
            entries.push((path, modified));
        }
    }

    // newest first; `current` already counts toward `keep`
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in entries.into_iter().skip(keep.saturating_sub(1)) {
        if std::fs::remove_file(&path).is_ok() {
            debug!(path = %path.display(), "old wallpaper removed");
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name() {
        let name = download_file_name();
        assert!(name.starts_with("wallpaper-"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_prune_keeps_newest_and_current() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();

        for i in 0..5 {
            std::fs::write(dir.join(format!("wallpaper-{i}.jpg")), vec![0u8; 10]).unwrap();
            // stagger modification times
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        std::fs::write(dir.join("notes.txt"), b"keep me").unwrap();

        let current = dir.join("wallpaper-4.jpg");
        let removed = prune_downloads(dir, 3, &current).unwrap();
        assert_eq!(removed, 2);

        assert!(current.exists());
        assert!(dir.join("wallpaper-3.jpg").exists());
        assert!(dir.join("wallpaper-2.jpg").exists());
        assert!(!dir.join("wallpaper-1.jpg").exists());
        assert!(!dir.join("wallpaper-0.jpg").exists());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_prune_zero_keeps_current() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let current = dir.join("wallpaper-a.jpg");
        std::fs::write(&current, b"x").unwrap();
        std::fs::write(dir.join("wallpaper-b.jpg"), b"y").unwrap();

        let removed = prune_downloads(dir, 0, &current).unwrap();
        assert_eq!(removed, 1);
        assert!(current.exists());
    }
}
