use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::FingerprintMode;

/// Identity signature of a written wallpaper file.
pub fn fingerprint(path: &Path, mode: FingerprintMode) -> Result<String> {
    match mode {
        FingerprintMode::Attributes => attributes_fingerprint(path),
        FingerprintMode::Content => {
            let data = std::fs::read(path)?;
            Ok(sha256_hex(&data))
        }
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .fold(String::with_capacity(64), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "{b:02x}");
            s
        })
}

/// File size and modification time in nanoseconds, concatenated.
fn attributes_fingerprint(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    let modified = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    Ok(format!("{}-{modified}", meta.len()))
}

/// A change is only reported against an existing baseline.
pub fn is_change(previous: Option<&str>, current: &str) -> bool {
    previous.is_some_and(|prev| prev != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_include_size() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.jpg");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        let fp = fingerprint(&path, FingerprintMode::Attributes).unwrap();
        assert!(fp.starts_with("1234-"));
    }

    #[test]
    fn test_content_ignores_timestamps() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.jpg");
        let b = tmp.path().join("b.jpg");
        std::fs::write(&a, b"same bytes").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        std::fs::write(&b, b"same bytes").unwrap();

        let fa = fingerprint(&a, FingerprintMode::Content).unwrap();
        let fb = fingerprint(&b, FingerprintMode::Content).unwrap();
        assert_eq!(fa, fb);
        assert_eq!(fa.len(), 64);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(fingerprint(&tmp.path().join("nope.jpg"), FingerprintMode::Attributes).is_err());
    }

    #[test]
    fn test_is_change() {
        assert!(!is_change(None, "10-1"));
        assert!(!is_change(Some("10-1"), "10-1"));
        assert!(is_change(Some("10-1"), "11-2"));
    }
}
