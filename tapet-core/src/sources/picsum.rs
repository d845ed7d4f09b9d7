use url::Url;

use crate::error::{Result, TapetError};
use crate::models::ScreenSize;

const BASE_URL: &str = "https://picsum.photos";

/// `https://picsum.photos/{width}/{height}`. The service picks a new random
/// image per request, so the same URL yields different content.
pub fn image_url(screen: ScreenSize) -> Result<Url> {
    let raw = format!("{BASE_URL}/{}/{}", screen.width, screen.height);
    Url::parse(&raw).map_err(|_| TapetError::InvalidImageUrl(raw))
}
