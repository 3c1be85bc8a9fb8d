//! Sidecar cover image (`folder.jpg`) next to a collection.
//!
//! The sidecar caches the artwork chosen for a collection.  When present
//! it is used instead of downloading again; replacing it goes through a
//! temporary file in the same directory followed by a rename, so readers
//! never see a half-written image.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

pub const COVER_FILE_NAME: &str = "folder.jpg";

pub fn cover_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

/// Cached cover bytes, if a non-empty sidecar exists.
pub fn load(dir: &Path, file_name: &str) -> Option<Vec<u8>> {
    let path = cover_path(dir, file_name);
    match fs::read(&path) {
        Ok(bytes) if !bytes.is_empty() => {
            debug!("Using cached cover {} ({} bytes)", path.display(), bytes.len());
            Some(bytes)
        }
        _ => None,
    }
}

/// Atomically replace `path` with `bytes`.
pub fn store(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    // A previous run may have left the sidecar read-only.
    if let Ok(meta) = fs::metadata(path) {
        let mut perms = meta.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            fs::set_permissions(path, perms)?;
        }
    }

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    info!("Saved cover {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Cached cover, or `fetch` it and cache the result.  `refresh` ignores
/// an existing sidecar.
pub fn load_or_fetch<F>(dir: &Path, file_name: &str, refresh: bool, fetch: F) -> Result<Vec<u8>>
where
    F: FnOnce() -> Result<Vec<u8>>,
{
    if !refresh {
        if let Some(bytes) = load(dir, file_name) {
            return Ok(bytes);
        }
    }

    let bytes = fetch()?;
    store(&cover_path(dir, file_name), &bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fetches_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = load_or_fetch(dir.path(), COVER_FILE_NAME, false, || Ok(vec![1, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(fs::read(dir.path().join(COVER_FILE_NAME)).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_prefers_cached_cover() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COVER_FILE_NAME), [9, 9]).unwrap();

        let called = Cell::new(false);
        let bytes = load_or_fetch(dir.path(), COVER_FILE_NAME, false, || {
            called.set(true);
            Ok(vec![1])
        })
        .unwrap();
        assert_eq!(bytes, vec![9, 9]);
        assert!(!called.get());
    }

    #[test]
    fn test_refresh_replaces_read_only_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COVER_FILE_NAME);
        fs::write(&path, [9, 9]).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let bytes = load_or_fetch(dir.path(), COVER_FILE_NAME, true, || Ok(vec![4, 5, 6])).unwrap();
        assert_eq!(bytes, vec![4, 5, 6]);
        assert_eq!(fs::read(&path).unwrap(), vec![4, 5, 6]);

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_failed_fetch_keeps_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_or_fetch(dir.path(), COVER_FILE_NAME, false, || {
            Err(Error::RemoteUnavailable("offline".into()))
        });
        assert!(result.is_err());
        assert!(load(dir.path(), COVER_FILE_NAME).is_none());
    }
}
