use serde_json::Value;
use url::Url;

use crate::error::{Result, TapetError};
use crate::http::HttpClient;
use crate::json_path;

use super::parse_image_url;

/// Fetch `api_url` and pull the image URL out of the response at `path`.
pub async fn resolve(api_url: &str, path: &str, http: &dyn HttpClient) -> Result<Url> {
    let api = parse_image_url(api_url)?;
    let resp = http.get(&api).await?;
    let body = parse_body(&resp.body)?;
    let image_url = extract_image_url(&body, path)?;
    parse_image_url(image_url)
}

/// The body must be a JSON object; arrays and scalars at the top level are rejected.
fn parse_body(data: &[u8]) -> Result<Value> {
    match serde_json::from_slice::<Value>(data) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(TapetError::InvalidJsonResponse),
    }
}

fn extract_image_url<'a>(body: &'a Value, path: &str) -> Result<&'a str> {
    let not_found = |extra: Option<&Value>| {
        let mut json = serde_json::to_string_pretty(body)
            .unwrap_or_else(|_| "Unable to stringify JSON".into());
        if let Some(found) = extra {
            json.push_str(&format!("\n\nFound value is not a string: {found}"));
        }
        TapetError::JsonPathNotFound {
            path: path.to_string(),
            json,
        }
    };

    match json_path::lookup(body, path) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(not_found(Some(other))),
        None => Err(not_found(None)),
    }
}
