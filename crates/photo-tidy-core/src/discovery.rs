use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::DateCode;

/// Check that an action has a usable root folder
pub fn validate_root(root: &Path) -> Result<()> {
    if root.as_os_str().is_empty() {
        return Err(Error::NoFolderSelected);
    }
    if !root.is_dir() {
        return Err(Error::FolderNotFound(root.to_path_buf()));
    }
    Ok(())
}

/// Returns true if the directory has no subdirectories
pub fn is_leaf_folder(path: &Path) -> Result<bool> {
    for entry in fs::read_dir(path)? {
        if entry?.path().is_dir() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Immediate children of `root` named like a date code, sorted by name.
///
/// The second value counts child directories that were ignored.
pub fn date_folders(root: &Path) -> Result<(Vec<(PathBuf, DateCode)>, usize)> {
    let mut folders = Vec::new();
    let mut ignored = 0;

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        match path.file_name().and_then(|n| n.to_str()).and_then(DateCode::parse) {
            Some(code) => folders.push((path, code)),
            None => {
                debug!("Skipping non-date folder: {}", path.display());
                ignored += 1;
            }
        }
    }

    folders.sort_by(|a, b| a.0.cmp(&b.0));
    Ok((folders, ignored))
}

/// Leaf folders strictly below `dir`, in lexicographic depth-first order
pub fn leaf_folders_under(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut leaves = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() && is_leaf_folder(entry.path())? {
            leaves.push(entry.into_path());
        }
    }

    Ok(leaves)
}

/// Direct file entries of a directory, sorted by file name
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

// -- Tests --
