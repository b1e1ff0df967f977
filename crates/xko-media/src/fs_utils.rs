//! Filesystem helpers for report and manifest output.
//!
//! Outputs are written whole: the file is serialized in memory first, then
//! written in one call. An interrupted run leaves a file to regenerate.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::MediaResult;

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Serialize `value` as indented JSON and write it to `path`, creating
/// parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> MediaResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.json");
        write_json_pretty(&path, &vec![1, 2, 3]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        let back: Vec<i32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn test_ensure_dir_existing() {
        let dir = tempfile::tempdir().unwrap();
        ensure_dir(dir.path()).unwrap();
        ensure_dir(dir.path().join("nested")).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
