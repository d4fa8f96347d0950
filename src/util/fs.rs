use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Truncate `path` and write `content`. A failure after the open leaves the file truncated.
pub fn write_in_place(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.flush()
}

/// Write `content` to a temp file beside `path`, then rename it over `path`.
///
/// The original file's permissions are carried over to the replacement.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Whether `path` can be opened for writing, without modifying it.
pub fn is_writable(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}
