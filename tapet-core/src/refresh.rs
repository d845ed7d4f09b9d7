use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use tracing::{info, warn};
use url::Url;

use crate::backend::WallpaperBackend;
use crate::cache;
use crate::error::{Result, TapetError};
use crate::fingerprint::{fingerprint, is_change};
use crate::http::HttpClient;
use crate::models::{FingerprintMode, ScreenSize, SourceConfig};
use crate::notify::Notifier;
use crate::paths::TapetPaths;
use crate::sources;
use crate::state::ResolutionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The JSON API pointed at the image already shown; nothing was downloaded.
    Unchanged { url: String },
    Applied {
        url: String,
        path: PathBuf,
        /// The new file's fingerprint differs from the previous wallpaper's.
        changed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub screen: ScreenSize,
    pub fingerprint: FingerprintMode,
    pub notify_on_change: bool,
    pub keep_downloads: usize,
}

/// One refresh cycle: resolve, decide, download, convert, apply, fingerprint.
///
/// Owns the [`ResolutionState`] and writes it back after every mutation.
/// Callers must not run two refreshes at once.
pub struct Refresher {
    paths: TapetPaths,
    http: Arc<dyn HttpClient>,
    backend: Box<dyn WallpaperBackend>,
    notifier: Arc<dyn Notifier>,
    state: ResolutionState,
}

impl Refresher {
    pub fn new(
        paths: TapetPaths,
        http: Arc<dyn HttpClient>,
        backend: Box<dyn WallpaperBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = ResolutionState::load_or_default(&paths);
        Self {
            paths,
            http,
            backend,
            notifier,
            state,
        }
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub fn set_backend(&mut self, backend: Box<dyn WallpaperBackend>) {
        self.backend = backend;
    }

    /// Forget the last resolved URL so the next JSON API refresh always downloads.
    pub fn reset_resolved_url(&mut self) -> Result<()> {
        if self.state.last_resolved_image_url.is_none() {
            return Ok(());
        }
        let next = ResolutionState {
            last_resolved_image_url: None,
            ..self.state.clone()
        };
        self.commit(next)
    }

    /// Persist `next`, then adopt it. A failed write keeps the current state.
    fn commit(&mut self, next: ResolutionState) -> Result<()> {
        next.save(&self.paths)?;
        self.state = next;
        Ok(())
    }

    pub async fn refresh(
        &mut self,
        source: &SourceConfig,
        opts: &RefreshOptions,
    ) -> Result<RefreshOutcome> {
        let url = sources::resolve(source, opts.screen, self.http.as_ref()).await?;
        let url_string = url.to_string();

        // Only the JSON API is trusted to give each distinct image its own URL.
        if matches!(source, SourceConfig::JsonApi { .. })
            && self.state.last_resolved_image_url.as_deref() == Some(url_string.as_str())
        {
            info!(url = %url_string, "image URL unchanged, skipping download");
            return Ok(RefreshOutcome::Unchanged { url: url_string });
        }

        self.commit(ResolutionState {
            last_resolved_image_url: Some(url_string.clone()),
            ..self.state.clone()
        })?;

        let path = self.download_and_apply(&url, opts).await?;

        let current = fingerprint(&path, opts.fingerprint)?;
        let changed = is_change(self.state.last_wallpaper_hash.as_deref(), &current);
        self.commit(ResolutionState {
            last_wallpaper_hash: Some(current),
            ..self.state.clone()
        })?;

        if changed && opts.notify_on_change {
            self.notifier
                .notify("Wallpaper changed", &format!("New wallpaper from {url_string}"))
                .await;
        }

        info!(url = %url_string, path = %path.display(), changed, "wallpaper applied");
        Ok(RefreshOutcome::Applied {
            url: url_string,
            path,
            changed,
        })
    }

    async fn download_and_apply(&self, url: &Url, opts: &RefreshOptions) -> Result<PathBuf> {
        let resp = self.http.get(url).await?;
        if resp.status != 200 {
            return Err(TapetError::DownloadFailed {
                status: resp.status,
            });
        }

        let jpeg = convert_to_jpeg(&resp.body)?;

        let dir = self.paths.wallpapers_dir();
        std::fs::create_dir_all(&dir).map_err(|source| TapetError::FileWrite {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(cache::download_file_name());
        std::fs::write(&path, &jpeg).map_err(|source| TapetError::FileWrite {
            path: path.clone(),
            source,
        })?;

        self.backend.set_wallpaper_all(&path).await?;

        if let Err(e) = cache::prune_downloads(&dir, opts.keep_downloads, &path) {
            warn!("failed to prune old wallpapers: {e}");
        }

        Ok(path)
    }
}

/// Decode any supported image format and re-encode it as JPEG.
pub fn convert_to_jpeg(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|_| TapetError::InvalidImageData)?;
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| TapetError::ImageConversionFailed(e.to_string()))?;
    Ok(buf.into_inner())
}
