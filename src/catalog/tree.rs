use crate::error::CatalogError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// An archive directory or entry that could not be read. Whatever it held is
/// missing from the catalog.
#[derive(Debug, Clone)]
pub struct UnreadableDir {
    pub path: PathBuf,
    pub error: String,
}

fn skip_unreadable(skipped: &mut Vec<UnreadableDir>, path: &Path, error: &dyn Display) {
    tracing::warn!(
        path = %path.display(),
        error = %error,
        "skipping unreadable archive entry"
    );
    skipped.push(UnreadableDir {
        path: path.to_path_buf(),
        error: error.to_string(),
    });
}

fn subdirectory_entry(
    dir: &Path,
    entry: io::Result<fs::DirEntry>,
    skipped: &mut Vec<UnreadableDir>,
) -> Option<(String, PathBuf)> {
    let entry = match entry {
        Ok(entry) => entry,
        Err(err) => {
            skip_unreadable(skipped, dir, &err);
            return None;
        }
    };
    let path = entry.path();
    if !path.is_dir() {
        return None;
    }
    Some((entry.file_name().to_string_lossy().into_owned(), path))
}

/// Immediate subdirectories of `dir`, sorted by name.
///
/// Entries that are not directories are skipped. Symlinks to directories
/// count as directories. A single entry that fails to read is recorded in
/// `skipped` and the rest of the listing still comes back.
pub fn list_subdirectories(
    dir: &Path,
    skipped: &mut Vec<UnreadableDir>,
) -> Result<Vec<(String, PathBuf)>, CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::ArchiveUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut out: Vec<_> = entries
        .filter_map(|entry| subdirectory_entry(dir, entry, skipped))
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

// Files of a directory come before its subdirectories, each group by name.
fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_listed_file(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || entry.file_type().is_dir() {
        return false;
    }
    // Symlinked directories are neither descended into nor listed.
    !(entry.path_is_symlink() && entry.path().is_dir())
}

/// Base names of every file anywhere under `dir`, in traversal order.
///
/// Unreadable nested directories are recorded in `skipped`; the files that
/// could be read are still returned.
pub fn collect_file_names(dir: &Path, skipped: &mut Vec<UnreadableDir>) -> Vec<String> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by(files_then_dirs)
    {
        match entry {
            Ok(entry) if is_listed_file(&entry) => {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
            Ok(_) => {}
            Err(err) => skip_unreadable(skipped, err.path().unwrap_or(dir), &err),
        }
    }
    names
}

/// Map each immediate subdirectory of `dir` to the flat list of file names
/// found anywhere beneath it.
///
/// Failing to list `dir` itself is reported as `ArchiveUnreadable`; the caller
/// decides whether that is fatal. Anything unreadable below it lands in
/// `skipped`.
pub fn flatten_one_level(
    dir: &Path,
    skipped: &mut Vec<UnreadableDir>,
) -> Result<BTreeMap<String, Vec<String>>, CatalogError> {
    let mut out = BTreeMap::new();
    for (name, path) in list_subdirectories(dir, skipped)? {
        let files = collect_file_names(&path, skipped);
        out.insert(name, files);
    }
    Ok(out)
}
