pub mod json_api;
pub mod picsum;

use tracing::debug;
use url::Url;

use crate::error::{Result, TapetError};
use crate::http::HttpClient;
use crate::models::{ScreenSize, SourceConfig};

/// Turn a source configuration into a concrete image URL.
///
/// Only [`SourceConfig::JsonApi`] touches the network, with a single GET.
pub async fn resolve(
    config: &SourceConfig,
    screen: ScreenSize,
    http: &dyn HttpClient,
) -> Result<Url> {
    let url = match config {
        SourceConfig::Picsum => picsum::image_url(screen)?,
        SourceConfig::StaticUrl { url } => parse_image_url(url)?,
        SourceConfig::JsonApi { url, path } => json_api::resolve(url, path, http).await?,
    };
    debug!(source = %config.kind(), url = %url, "source resolved");
    Ok(url)
}

pub(crate) fn parse_image_url(s: &str) -> Result<Url> {
    Url::parse(s.trim()).map_err(|_| TapetError::InvalidImageUrl(s.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use url::Url;

    use crate::error::Result;
    use crate::http::{HttpClient, HttpResponse};

    /// Serves canned responses by URL and records every request.
    #[derive(Default)]
    pub struct MockHttp {
        responses: Mutex<HashMap<String, HttpResponse>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttp {
        pub fn respond(&self, url: &str, status: u16, body: impl Into<bytes::Bytes>) {
            self.responses.lock().unwrap().insert(
                url.to_string(),
                HttpResponse {
                    status,
                    body: body.into(),
                },
            );
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.as_str() == url)
                .count()
        }

        pub fn total_requests(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpClient for MockHttp {
        async fn get(&self, url: &Url) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(url.as_str())
                .cloned()
                .unwrap_or(HttpResponse {
                    status: 404,
                    body: bytes::Bytes::new(),
                }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockHttp;
    use super::*;

    #[tokio::test]
    async fn test_static_url_resolves_without_network() {
        let http = MockHttp::default();
        let config = SourceConfig::StaticUrl {
            url: "https://example.com/wall.jpg".into(),
        };
        let url = resolve(&config, ScreenSize::FALLBACK, &http).await.unwrap();
        assert_eq!(url.as_str(), "https://example.com/wall.jpg");
        assert_eq!(http.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_static_url_malformed() {
        let http = MockHttp::default();
        let config = SourceConfig::StaticUrl {
            url: "not a url".into(),
        };
        let err = resolve(&config, ScreenSize::FALLBACK, &http).await.unwrap_err();
        assert!(matches!(err, TapetError::InvalidImageUrl(s) if s == "not a url"));
    }

    #[tokio::test]
    async fn test_picsum_resolves_without_network() {
        let http = MockHttp::default();
        let url = resolve(&SourceConfig::Picsum, ScreenSize::new(2560, 1440), &http)
            .await
            .unwrap();
        assert_eq!(url.as_str(), "https://picsum.photos/2560/1440");
        assert_eq!(http.total_requests(), 0);
    }
}
