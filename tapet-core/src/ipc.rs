use serde::{Deserialize, Serialize};

use crate::error::{Result, TapetError};
use crate::models::{SourceConfig, SourceKind};
use crate::paths::TapetPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    Status,
    Refresh,
    SetInterval { seconds: f64 },
    SetSource { source: SourceConfig },
    UseSavedSource { kind: SourceKind },
    SetRunAtLogin { enabled: bool },
    SetNotifyOnChange { enabled: bool },
    Reload,
    Quit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IpcResponse {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub running: bool,
    pub source: SourceConfig,
    pub interval_secs: f64,
    pub last_resolved_image_url: Option<String>,
    pub last_refresh: Option<String>,
    pub last_error: Option<String>,
    pub next_refresh: Option<String>,
    pub run_at_login: bool,
    pub notify_on_change: bool,
}

impl IpcResponse {
    pub fn ok() -> Self {
        Self::Ok { data: None }
    }

    pub fn ok_with_data(data: serde_json::Value) -> Self {
        Self::Ok { data: Some(data) }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }
}

/// Send a request to the daemon and receive a response.
pub async fn send_request(request: &IpcRequest) -> Result<IpcResponse> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixStream;

    let socket_path = TapetPaths::socket_path();
    let stream = UnixStream::connect(&socket_path)
        .await
        .map_err(|e| TapetError::Ipc(format!("failed to connect to daemon: {e}")))?;

    let (reader, mut writer) = stream.into_split();

    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.shutdown().await?;

    let mut buf_reader = BufReader::new(reader);
    let mut response_line = String::new();
    buf_reader.read_line(&mut response_line).await?;

    let response: IpcResponse = serde_json::from_str(response_line.trim())?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialize() {
        let req = IpcRequest::Refresh;
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"command":"refresh"}"#);

        let req = IpcRequest::SetSource {
            source: SourceConfig::StaticUrl {
                url: "https://x/y.jpg".into(),
            },
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""command":"set_source""#));
        assert!(json.contains(r#""kind":"static_url""#));
    }

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"command":"set_interval","seconds":900.0}"#;
        let req: IpcRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(req, IpcRequest::SetInterval { seconds } if seconds == 900.0));

        let json = r#"{"command":"use_saved_source","kind":"json_api"}"#;
        let req: IpcRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            req,
            IpcRequest::UseSavedSource {
                kind: SourceKind::JsonApi
            }
        ));

        let json = r#"{"command":"set_source","source":{"kind":"json_api","url":"https://api","path":"a.b"}}"#;
        let req: IpcRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            req,
            IpcRequest::SetSource {
                source: SourceConfig::JsonApi { .. }
            }
        ));
    }

    #[test]
    fn test_response_serialize() {
        let resp = IpcResponse::ok();
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);

        let resp = IpcResponse::error("refresh already pending");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains("refresh already pending"));
    }

    #[test]
    fn test_status_payload() {
        let status = DaemonStatus {
            running: true,
            source: SourceConfig::Picsum,
            interval_secs: 3600.0,
            last_resolved_image_url: Some("https://picsum.photos/1920/1080".into()),
            last_refresh: Some("2026-01-01T00:00:00Z".into()),
            last_error: None,
            next_refresh: Some("3599s".into()),
            run_at_login: false,
            notify_on_change: true,
        };
        let data = serde_json::to_value(&status).unwrap();
        let resp = IpcResponse::ok_with_data(data);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("picsum.photos/1920/1080"));
        assert!(json.contains(r#""kind":"picsum""#));
    }
}
