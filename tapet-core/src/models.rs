use serde::{Deserialize, Serialize};

/// Where the next wallpaper comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Random image from picsum.photos sized to the screen.
    #[default]
    Picsum,
    /// A fixed image address.
    StaticUrl { url: String },
    /// An API endpoint returning JSON, plus a dot-separated path to the image URL.
    JsonApi { url: String, path: String },
}

impl SourceConfig {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Picsum => SourceKind::Picsum,
            Self::StaticUrl { .. } => SourceKind::StaticUrl,
            Self::JsonApi { .. } => SourceKind::JsonApi,
        }
    }

    /// Name of the first required field left blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::Picsum => None,
            Self::StaticUrl { url } if url.trim().is_empty() => Some("image URL"),
            Self::JsonApi { url, .. } if url.trim().is_empty() => Some("API URL"),
            Self::JsonApi { path, .. } if path.trim().is_empty() => Some("JSON path"),
            _ => None,
        }
    }
}

/// Discriminant of [`SourceConfig`], persisted in the settings store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Picsum,
    StaticUrl,
    JsonApi,
}

impl SourceKind {
    pub const ALL: &[SourceKind] = &[Self::Picsum, Self::StaticUrl, Self::JsonApi];

    pub fn index(self) -> u8 {
        match self {
            Self::Picsum => 0,
            Self::StaticUrl => 1,
            Self::JsonApi => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Picsum => "Random (from picsum.photos)",
            Self::StaticUrl => "Static URL",
            Self::JsonApi => "JSON API",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Picsum => write!(f, "picsum"),
            Self::StaticUrl => write!(f, "static_url"),
            Self::JsonApi => write!(f, "json_api"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "picsum" | "0" => Ok(Self::Picsum),
            "static_url" | "static" | "1" => Ok(Self::StaticUrl),
            "json_api" | "json" | "2" => Ok(Self::JsonApi),
            other => Err(format!("unknown source kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const FALLBACK: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for ScreenSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("invalid width: '{w}'"))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("invalid height: '{h}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("screen size must be positive: '{s}'"));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    #[default]
    System,
    Hyprpaper,
    Swww,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Hyprpaper => write!(f, "hyprpaper"),
            Self::Swww => write!(f, "swww"),
        }
    }
}

/// How a written wallpaper file is fingerprinted for change detection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// File size followed by modification time.
    #[default]
    Attributes,
    /// SHA-256 of the file contents.
    Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_serde() {
        let src = SourceConfig::JsonApi {
            url: "https://api.example.com/images".into(),
            path: "data.url".into(),
        };
        let json = serde_json::to_string(&src).unwrap();
        assert!(json.contains(r#""kind":"json_api""#));
        assert!(json.contains(r#""path":"data.url""#));

        let parsed: SourceConfig = serde_json::from_str(r#"{"kind":"picsum"}"#).unwrap();
        assert_eq!(parsed, SourceConfig::Picsum);
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(SourceConfig::Picsum.missing_field(), None);
        let blank = SourceConfig::StaticUrl { url: "  ".into() };
        assert_eq!(blank.missing_field(), Some("image URL"));
        let no_path = SourceConfig::JsonApi {
            url: "https://api".into(),
            path: String::new(),
        };
        assert_eq!(no_path.missing_field(), Some("JSON path"));
        let complete = SourceConfig::JsonApi {
            url: "https://api".into(),
            path: "data.url".into(),
        };
        assert_eq!(complete.missing_field(), None);
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("static".parse::<SourceKind>(), Ok(SourceKind::StaticUrl));
        assert_eq!("2".parse::<SourceKind>(), Ok(SourceKind::JsonApi));
        assert!("bing".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::JsonApi.index(), 2);
    }

    #[test]
    fn test_screen_size_parse() {
        assert_eq!("2560x1440".parse::<ScreenSize>(), Ok(ScreenSize::new(2560, 1440)));
        assert_eq!(" 800 X 600 ".parse::<ScreenSize>(), Ok(ScreenSize::new(800, 600)));
        assert!("0x600".parse::<ScreenSize>().is_err());
        assert!("auto".parse::<ScreenSize>().is_err());
    }
}
