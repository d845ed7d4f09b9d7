use async_trait::async_trait;
pub use url::Url;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: bytes::Bytes,
}

/// A single GET returning status and body. Used for both the JSON API
/// request and the image download.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(HttpResponse { status, body })
    }
}
