//! Canonical renaming of the files inside one leaf folder.
//!
//! Files are grouped by case-insensitive extension. Each group is put in
//! order (numerically when any name carries a number, otherwise by name)
//! and renamed to `<date>` or `<date> (NN)`, keeping the original extension.
//! A rename whose target already exists is skipped, never overwritten.

use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::list_files;
use crate::error::Result;
use crate::logging::{log_file_error, log_fs_modification};
use crate::types::RenameOutcome;

/// A single computed rename inside a leaf folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub target: PathBuf,
    /// 1-based position within the extension group
    pub rank: usize,
}

/// A run of decimal digits, ordered by numeric value at any length
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Number {
    // Field order matters for the derived ordering: shorter means smaller
    len: usize,
    digits: String,
}

impl Number {
    fn from_digits(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Self {
            len: digits.len(),
            digits: digits.to_string(),
        }
    }

    /// The value as a `u64`, if it fits
    pub fn to_u64(&self) -> Option<u64> {
        self.digits.parse().ok()
    }
}

/// First run of ASCII digits in `stem`
pub fn extract_number(stem: &str) -> Option<Number> {
    let start = stem.find(|c: char| c.is_ascii_digit())?;
    let rest = &stem[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    Some(Number::from_digits(&rest[..end]))
}

/// Lower-cased extension used as the group key, empty if there is none
pub fn extension_key(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Partition files by [`extension_key`], keeping their relative order
pub fn group_by_extension(files: Vec<PathBuf>) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        groups.entry(extension_key(&file)).or_default().push(file);
    }
    groups
}

/// Put one extension group in rank order.
///
/// If any stem contains a number, numbered files come first in ascending
/// order and the rest follow in their incoming order. Otherwise the group is
/// sorted by lower-cased file name.
pub fn order_group(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut numbered: Vec<(PathBuf, Option<Number>)> = files
        .into_iter()
        .map(|file| {
            let number = file
                .file_stem()
                .and_then(|stem| extract_number(&stem.to_string_lossy()));
            (file, number)
        })
        .collect();

    if numbered.iter().any(|(_, number)| number.is_some()) {
        numbered.sort_by(|(_, a), (_, b)| (a.is_none(), a).cmp(&(b.is_none(), b)));
        numbered.into_iter().map(|(file, _)| file).collect()
    } else {
        let mut files: Vec<PathBuf> = numbered.into_iter().map(|(file, _)| file).collect();
        files.sort_by_cached_key(|file| {
            file.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });
        files
    }
}

/// File name for the file at `rank` in a group of `group_len` files
pub fn target_name(
    date: &str,
    rank: usize,
    group_len: usize,
    extension: Option<&OsStr>,
) -> OsString {
    let mut name = if group_len == 1 {
        OsString::from(date)
    } else {
        OsString::from(format!("{} ({:02})", date, rank))
    };

    if let Some(ext) = extension {
        if !ext.is_empty() {
            name.push(".");
            name.push(ext);
        }
    }
    name
}

/// Compute every rename for a leaf folder without touching the filesystem
pub fn plan_leaf(folder: &Path, date: &str) -> Result<Vec<PlannedRename>> {
    let files = list_files(folder)?;
    let mut plan = Vec::with_capacity(files.len());

    for (_, group) in group_by_extension(files) {
        let ordered = order_group(group);
        let total = ordered.len();

        for (idx, source) in ordered.into_iter().enumerate() {
            let rank = idx + 1;
            let target = folder.join(target_name(date, rank, total, source.extension()));
            plan.push(PlannedRename {
                source,
                target,
                rank,
            });
        }
    }

    Ok(plan)
}

/// Rename the files of one leaf folder after `date`.
///
/// Renames happen one by one in rank order. A file whose target name is
/// already taken, including by a file renamed earlier in this call, is left
/// as it is. With `dry_run` the folder is not modified but the returned
/// outcomes are what a real run would produce.
pub fn rename_leaf(
    folder: &Path,
    date: &str,
    dry_run: bool,
) -> Result<Vec<(PathBuf, RenameOutcome)>> {
    let plan = plan_leaf(folder, date)?;

    // Names currently present in the folder, files and directories alike
    let mut occupied: HashSet<OsString> = HashSet::new();
    for entry in fs::read_dir(folder)? {
        occupied.insert(entry?.file_name());
    }

    let mut outcomes = Vec::with_capacity(plan.len());
    for PlannedRename { source, target, .. } in plan {
        let (Some(source_name), Some(target_name)) = (source.file_name(), target.file_name())
        else {
            continue;
        };

        if occupied.contains(target_name) || fs::symlink_metadata(&target).is_ok() {
            debug!("Target exists, skipping: {}", target.display());
            outcomes.push((source, RenameOutcome::Skipped(target)));
            continue;
        }

        let outcome = if dry_run {
            log_fs_modification("rename (dry run)", &source, Some(&target.to_string_lossy()));
            RenameOutcome::Renamed(target.clone())
        } else {
            match fs::rename(&source, &target) {
                Ok(()) => {
                    log_fs_modification("rename", &source, Some(&target.to_string_lossy()));
                    RenameOutcome::Renamed(target.clone())
                }
                Err(e) => {
                    log_file_error(&source, "rename", &e);
                    outcomes.push((source, RenameOutcome::Failed(e.to_string())));
                    continue;
                }
            }
        };

        occupied.remove(source_name);
        occupied.insert(target_name.to_os_string());
        outcomes.push((source, outcome));
    }

    Ok(outcomes)
}

// -- Tests --
