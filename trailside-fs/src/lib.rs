//! Capability-scoped file access for metadata files, trail catalogues, cache
//! snapshots and GeoJSON exports.
//!
//! Every operation opens the nearest ambient directory once and performs the
//! actual read or write through `cap-std`. Leading `..` segments belong to
//! that ambient directory; the rest of the path must stay beneath it.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io;

/// Read a UTF-8 text file.
///
/// # Errors
/// Propagates open and read failures, including `NotFound`.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent(path)?;
    dir.read_to_string(name)
}

/// Read a UTF-8 text file, returning `None` if it or its directory is absent.
///
/// # Errors
/// Propagates every failure other than `NotFound`.
pub fn read_if_present(path: &Utf8Path) -> io::Result<Option<String>> {
    match read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Write `contents` to `path`, creating missing parent directories.
///
/// # Errors
/// Propagates directory creation and write failures.
pub fn write_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    create_parent_dirs(path)?;
    let (dir, name) = open_parent(path)?;
    dir.write(name, contents)
}

/// Whether `path` names an existing directory.
///
/// # Errors
/// Propagates metadata failures other than `NotFound`.
pub fn is_dir(path: &Utf8Path) -> io::Result<bool> {
    let (base, relative) = split_anchor(path)?;
    let dir = Dir::open_ambient_dir(&base, ambient_authority())?;
    let target = if relative.as_str().is_empty() {
        Utf8PathBuf::from(".")
    } else {
        relative
    };
    match dir.metadata(&target) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

fn open_parent(path: &Utf8Path) -> io::Result<(Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} has no file name")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

fn create_parent_dirs(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Split `path` into the directory it is anchored at and the remainder
/// relative to it.
///
/// The anchor is a root, a drive prefix or the current directory, extended
/// through the last `..` component so the remainder only descends.
fn split_anchor(path: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let components: Vec<Utf8Component<'_>> = path.components().collect();
    let rooted = components
        .iter()
        .take_while(|component| is_root(component))
        .count();
    if components[rooted..].iter().any(is_root) {
        return Err(io::Error::other(format!("{path} has a misplaced root")));
    }
    let split = components
        .iter()
        .rposition(|component| matches!(component, Utf8Component::ParentDir))
        .map_or(rooted, |last| last + 1);
    let mut anchor: Utf8PathBuf = components[..split]
        .iter()
        .map(Utf8Component::as_str)
        .collect();
    let relative: Utf8PathBuf = components[split..]
        .iter()
        .map(Utf8Component::as_str)
        .collect();
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    Ok((anchor, relative))
}

fn is_root(component: &Utf8Component<'_>) -> bool {
    matches!(component, Utf8Component::Prefix(_) | Utf8Component::RootDir)
}
