use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TapetError {
    #[error("invalid image URL: '{0}'")]
    InvalidImageUrl(String),

    #[error("invalid JSON response from API")]
    InvalidJsonResponse,

    #[error("JSON path '{path}' not found in response: {json}")]
    JsonPathNotFound { path: String, json: String },

    #[error("failed to download image (HTTP {status})")]
    DownloadFailed { status: u16 },

    #[error("invalid image data received")]
    InvalidImageData,

    #[error("failed to convert image format: {0}")]
    ImageConversionFailed(String),

    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("login item error: {0}")]
    LoginItem(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("ipc error: {0}")]
    Ipc(String),
}

pub type Result<T> = std::result::Result<T, TapetError>;
