use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: f64 = 3600.0;

/// Longest accepted interval: one year.
pub const MAX_INTERVAL_SECS: f64 = 365.0 * 86400.0;

/// Refresh intervals offered in the tray menu: (label, seconds).
pub const INTERVAL_PRESETS: &[(&str, f64)] = &[
    ("30 seconds", 30.0),
    ("1 minute", 60.0),
    ("5 minutes", 300.0),
    ("15 minutes", 900.0),
    ("30 minutes", 1800.0),
    ("1 hour", 3600.0),
    ("3 hours", 10800.0),
    ("6 hours", 21600.0),
    ("12 hours", 43200.0),
    ("24 hours", 86400.0),
];

/// Parse interval string like "30m", "1h", "90s" into seconds.
pub fn parse_interval(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('s') {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60.0)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600.0)
    } else {
        // default to seconds if no suffix
        (s, 1.0)
    };

    let num: f64 = num_str.trim().parse().ok()?;
    let secs = num * multiplier;
    is_valid_interval(secs).then_some(secs)
}

pub fn is_valid_interval(secs: f64) -> bool {
    secs.is_finite() && (1.0..=MAX_INTERVAL_SECS).contains(&secs)
}

/// Convert a stored interval to a timer period, falling back to the default
/// for values a timer cannot use.
pub fn to_duration(secs: f64) -> Duration {
    let fallback = Duration::from_secs(DEFAULT_INTERVAL_SECS as u64);
    if !is_valid_interval(secs) {
        return fallback;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(fallback)
}

/// Human label for an interval: the preset name when one matches.
pub fn format_interval(secs: f64) -> String {
    if let Some((label, _)) = INTERVAL_PRESETS.iter().find(|(_, s)| *s == secs) {
        return (*label).to_string();
    }
    if secs >= 3600.0 && secs % 3600.0 == 0.0 {
        format!("{}h", secs / 3600.0)
    } else if secs >= 60.0 && secs % 60.0 == 0.0 {
        format!("{}m", secs / 60.0)
    } else {
        format!("{secs}s")
    }
}
