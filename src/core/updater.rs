//! Read-modify-write of the properties file holding the accepted API keys.
//!
//! One update goes Reading -> (key line extended | key line appended) ->
//! Writing. A failure while reading leaves the file untouched. With
//! `WriteMode::InPlace` a failure while writing may leave it truncated;
//! `WriteMode::Atomic` leaves the original in place instead.

use crate::constants;
use crate::core::file_lock::{lock_path_for, FileLock};
use crate::core::keygen::Token;
use crate::core::properties::{KeyLineChange, PropertiesDocument};
use crate::error::{KeygenError, Result};
use crate::models::config::WriteMode;
use crate::util::fs as keygen_fs;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub path: PathBuf,
    pub property: String,
    pub write_mode: WriteMode,
    pub lock: bool,
}

impl UpdateRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            property: constants::DEFAULT_PROPERTY_KEY.to_string(),
            write_mode: WriteMode::InPlace,
            lock: false,
        }
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn locked(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }
}

/// Non-fatal conditions observed during an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateWarning {
    /// The property was absent and a new line was appended.
    PropertyLineMissing { property: String },
}

impl fmt::Display for UpdateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateWarning::PropertyLineMissing { property } => {
                write!(f, "{} line not found, added a new line", property)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub path: PathBuf,
    pub change: KeyLineChange,
    /// Keys accepted by the property after the update.
    pub key_count: usize,
    pub warnings: Vec<UpdateWarning>,
}

/// Read and parse the properties file. Any ASCII-compatible encoding is accepted.
pub fn read_document(path: &Path) -> Result<PropertiesDocument> {
    let content = fs::read(path).map_err(|source| KeygenError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PropertiesDocument::parse(&content))
}

/// Append `token` to the request's property and write the file back
/// according to `request.write_mode`.
pub fn append_key(request: &UpdateRequest, token: &Token) -> Result<UpdateReport> {
    let mode = request.write_mode;
    append_key_with(request, token, |path, content| match mode {
        WriteMode::InPlace => keygen_fs::write_in_place(path, content),
        WriteMode::Atomic => keygen_fs::write_atomic(path, content),
    })
}

/// Like [`append_key`], with the final write performed by `write`.
///
/// Any error from `write` is reported as `FileUnwritable`.
pub fn append_key_with<W>(request: &UpdateRequest, token: &Token, write: W) -> Result<UpdateReport>
where
    W: FnOnce(&Path, &[u8]) -> io::Result<()>,
{
    let path = request.path.as_path();

    // Confirm the target exists before anything (including a lock file) is created.
    fs::metadata(path).map_err(|source| KeygenError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let _lock = if request.lock {
        Some(FileLock::exclusive(&lock_path_for(path))?)
    } else {
        None
    };

    tracing::debug!(path = %path.display(), "reading properties");
    let mut doc = read_document(path)?;

    let change = doc.append_token(&request.property, token.as_str());
    let mut warnings = Vec::new();
    if change.was_appended() {
        let warning = UpdateWarning::PropertyLineMissing {
            property: request.property.clone(),
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
    } else {
        tracing::debug!(line = change.index() + 1, "extended key line");
    }

    tracing::debug!(path = %path.display(), mode = ?request.write_mode, "writing properties");
    write(path, &doc.render()).map_err(|source| KeygenError::FileUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(UpdateReport {
        path: path.to_path_buf(),
        change,
        key_count: doc.key_values(&request.property).len(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keygen::testing::FixedBytes;
    use crate::core::keygen::{generate_token, Mapping};
    use tempfile::TempDir;

    fn token() -> Token {
        // bytes 23, 24, 25 -> "XYZ"
        generate_token(&mut FixedBytes::new(&[23, 24, 25]), 3, Mapping::Modulo).unwrap()
    }

    #[test]
    fn test_extends_existing_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "# keys\napi.security.keys=abc\nserver.port=8443\n").unwrap();

        let report = append_key(&UpdateRequest::new(&path), &token()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# keys\napi.security.keys=abc,XYZ\nserver.port=8443\n"
        );
        assert_eq!(report.change, KeyLineChange::Extended { index: 1 });
        assert_eq!(report.key_count, 2);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_appends_missing_line_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "server.port=8443").unwrap();

        let report = append_key(&UpdateRequest::new(&path), &token()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "server.port=8443\napi.security.keys=XYZ\n"
        );
        assert!(report.change.was_appended());
        assert_eq!(
            report.warnings,
            vec![UpdateWarning::PropertyLineMissing {
                property: "api.security.keys".into()
            }]
        );
    }

    #[test]
    fn test_custom_property() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.properties");
        fs::write(&path, "app.keys=one\napi.security.keys=two\n").unwrap();

        let request = UpdateRequest::new(&path).property("app.keys");
        append_key(&request, &token()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "app.keys=one,XYZ\napi.security.keys=two\n"
        );
    }

    #[test]
    fn test_missing_file_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");

        let request = UpdateRequest::new(&path).locked(true);
        let err = append_key(&request, &token()).unwrap_err();

        assert!(matches!(err, KeygenError::FileUnreadable { .. }));
        assert!(!err.may_have_touched_file());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_directory_target_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = append_key(&UpdateRequest::new(dir.path()), &token()).unwrap_err();
        assert!(matches!(err, KeygenError::FileUnreadable { .. }));
    }

    #[test]
    fn test_atomic_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "api.security.keys=abc\n").unwrap();

        let request = UpdateRequest::new(&path).write_mode(WriteMode::Atomic);
        append_key(&request, &token()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "api.security.keys=abc,XYZ\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_locked_update_keeps_lock_out_of_target_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "api.security.keys=abc\n").unwrap();

        append_key(&UpdateRequest::new(&path).locked(true), &token()).unwrap();

        assert!(lock_path_for(&path).exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "api.security.keys=abc,XYZ\n");
    }

    #[test]
    fn test_latin1_file_is_updated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, b"# caf\xe9\napi.security.keys=abc\n").unwrap();

        append_key(&UpdateRequest::new(&path), &token()).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, b"# caf\xe9\napi.security.keys=abc,XYZ\n");
        assert_eq!(bytes.split(|&b| b == b'\n').next(), Some(&b"# caf\xe9"[..]));
    }

    #[test]
    fn test_failed_write_is_unwritable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "api.security.keys=abc\n").unwrap();

        let err = append_key_with(&UpdateRequest::new(&path), &token(), |_, _| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        })
        .unwrap_err();

        assert!(matches!(err, KeygenError::FileUnwritable { .. }));
        assert!(err.may_have_touched_file());
    }

    #[test]
    fn test_partial_write_leaves_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "api.security.keys=abc\nserver.port=8443\n").unwrap();

        let err = append_key_with(&UpdateRequest::new(&path), &token(), |p, content| {
            fs::write(p, &content[..5])?;
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, KeygenError::FileUnwritable { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "api.s");
    }

    #[test]
    fn test_writer_receives_rendered_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "a=1\n").unwrap();

        let mut seen = Vec::new();
        let report = append_key_with(&UpdateRequest::new(&path), &token(), |p, content| {
            assert_eq!(p, path.as_path());
            seen.extend_from_slice(content);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, b"a=1\napi.security.keys=XYZ\n");
        assert!(report.change.was_appended());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a=1\n");
    }
}
