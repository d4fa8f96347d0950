//! Advisory flock(2) lock serializing updates of one properties file.
//!
//! The lock file lives in the system temp directory, named after a hash of
//! the target's canonical path, so nothing is added next to the target
//! (which is usually inside a Maven resources directory).

use crate::constants::{LOCK_HASH_LEN, LOCK_PREFIX, LOCK_SUFFIX};
use crate::error::{KeygenError, Result};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Lock file for `target`: `<tmp>/apikey-gen-<sha256(canonical path)>.lock`.
///
/// Falls back to the path as given when it cannot be canonicalized.
pub fn lock_path_for(target: &Path) -> PathBuf {
    let resolved = target
        .canonicalize()
        .unwrap_or_else(|_| target.to_path_buf());
    let digest = Sha256::digest(resolved.to_string_lossy().as_bytes());
    let hex = format!("{:064x}", digest);
    env::temp_dir().join(format!(
        "{}{}{}",
        LOCK_PREFIX,
        &hex[..LOCK_HASH_LEN],
        LOCK_SUFFIX
    ))
}

/// An exclusive file lock. Released on drop (file close releases flock).
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Acquire an exclusive lock, blocking until available.
    pub fn exclusive(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()
            .map_err(|source| lock_error(path, source))?;
        Ok(Self { _file: file })
    }

    /// Take the lock only if no other process holds it; `None` when contended.
    pub fn try_exclusive(path: &Path) -> Result<Option<Self>> {
        let file = open_lock_file(path)?;
        if let Err(err) = file.try_lock_exclusive() {
            return if is_contended(&err) {
                Ok(None)
            } else {
                Err(lock_error(path, err))
            };
        }
        Ok(Some(Self { _file: file }))
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|source| lock_error(path, source))
}

fn lock_error(path: &Path, source: io::Error) -> KeygenError {
    KeygenError::LockUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_in_temp_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("application.properties");
        fs::write(&target, "a=1\n").unwrap();

        let lock = lock_path_for(&target);
        assert_eq!(lock.parent(), Some(env::temp_dir().as_path()));
        let name = lock.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(LOCK_PREFIX));
        assert!(name.ends_with(LOCK_SUFFIX));
        assert!(!lock.starts_with(dir.path()));
    }

    #[test]
    fn test_lock_path_follows_canonical_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("application.properties");
        fs::write(&target, "a=1\n").unwrap();
        fs::write(dir.path().join("other.properties"), "a=1\n").unwrap();

        let dotted = dir.path().join(".").join("application.properties");
        assert_eq!(lock_path_for(&target), lock_path_for(&dotted));
        assert_ne!(
            lock_path_for(&target),
            lock_path_for(&dir.path().join("other.properties"))
        );
    }

    #[test]
    fn test_try_exclusive_returns_none_when_held() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("held.lock");
        let _lock = FileLock::exclusive(&lock_path).unwrap();
        assert!(FileLock::try_exclusive(&lock_path).unwrap().is_none());
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("released.lock");
        drop(FileLock::exclusive(&lock_path).unwrap());
        assert!(FileLock::try_exclusive(&lock_path).unwrap().is_some());
    }

    #[test]
    fn test_missing_directory_is_lock_error() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("missing").join("x.lock");
        let err = FileLock::exclusive(&lock_path).unwrap_err();
        assert!(matches!(err, KeygenError::LockUnavailable { .. }));
    }
}
