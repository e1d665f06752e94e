//! Filesystem helpers for hexroute built on `cap-std` and `camino`.
//!
//! Every helper resolves the parent directory with ambient authority and then
//! operates on the file name inside it, so callers can pass relative or
//! absolute UTF-8 paths.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::{Dir, File, OpenOptions};
use cap_std::ambient_authority;
use std::io;
use std::path::Component;

/// Open an existing file for reading.
pub fn open_read(path: &Utf8Path) -> io::Result<File> {
    File::open_ambient(path, ambient_authority())
}

/// Open a file for reading and appending, creating it and its parent
/// directories when absent.
pub fn open_append(path: &Utf8Path) -> io::Result<File> {
    ensure_parent_dir(path)?;
    let (dir, name) = dir_and_name(path)?;
    dir.open_with(
        &name,
        OpenOptions::new().read(true).append(true).create(true),
    )
}

/// Create or truncate a file for writing, creating parent directories.
pub fn create_truncate(path: &Utf8Path) -> io::Result<File> {
    ensure_parent_dir(path)?;
    let (dir, name) = dir_and_name(path)?;
    dir.create(&name)
}

/// Whether `path` names an existing regular file.
///
/// A missing file or parent directory yields `Ok(false)`; other failures
/// such as permission errors are returned.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let outcome = dir_and_name(path).and_then(|(dir, name)| dir.metadata(&name));
    match outcome {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create the parent directories of `path` if they do not exist.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn dir_and_name(path: &Utf8Path) -> io::Result<(Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `parent` into an ambient base directory and the path below it.
fn split_base(parent: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        // Windows drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("cannot split {parent} at {base}")))?
            .to_path_buf()
    };
    let dir = Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
