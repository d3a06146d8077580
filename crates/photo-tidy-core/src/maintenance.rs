//! Folder housekeeping: moving leaf files into a story folder and pruning
//! empty folders.

use log::{debug, info};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::discovery::{leaf_folders_under, list_files, validate_root};
use crate::error::Result;
use crate::logging::{log_file_error, log_fs_modification};
use crate::types::{PruneSummary, StoryMoveSummary};

/// Move the files of every leaf folder under `root` into a `story_dir_name` subfolder.
///
/// Leaves already named `story_dir_name` are left alone so repeated runs do
/// not nest story folders. Files whose name is already taken inside the
/// story folder stay where they are.
pub fn move_to_story(root: &Path, story_dir_name: &str, dry_run: bool) -> Result<StoryMoveSummary> {
    validate_root(root)?;

    let mut summary = StoryMoveSummary::default();

    for leaf in leaf_folders_under(root)? {
        if leaf.file_name().is_some_and(|name| name == story_dir_name) {
            debug!("Already a story folder: {}", leaf.display());
            continue;
        }

        let files = match list_files(&leaf) {
            Ok(files) => files,
            Err(e) => {
                log_file_error(&leaf, "list files", &e);
                continue;
            }
        };
        summary.leaf_folders += 1;

        let story_dir = leaf.join(story_dir_name);
        if !dry_run && !story_dir.is_dir() {
            if let Err(e) = fs::create_dir(&story_dir) {
                log_file_error(&story_dir, "create story folder", &e);
                summary.failed += files.len();
                continue;
            }
            log_fs_modification("mkdir", &story_dir, None);
        }

        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let target = story_dir.join(name);

            if fs::symlink_metadata(&target).is_ok() {
                debug!("Story target exists, skipping: {}", target.display());
                summary.skipped += 1;
            } else if dry_run {
                log_fs_modification("move (dry run)", &file, Some(&target.to_string_lossy()));
                summary.moved += 1;
            } else {
                match fs::rename(&file, &target) {
                    Ok(()) => {
                        log_fs_modification("move", &file, Some(&target.to_string_lossy()));
                        summary.moved += 1;
                    }
                    Err(e) => {
                        log_file_error(&file, "move", &e);
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    info!(
        "Story move finished: {} moved, {} skipped, {} failed in {} folders",
        summary.moved, summary.skipped, summary.failed, summary.leaf_folders
    );
    Ok(summary)
}

/// Every directory below `root` that the walk can reach.
///
/// Unreadable entries are logged and skipped; their folders are simply not
/// candidates for removal.
fn prune_candidates(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry during prune: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}

/// Remove every empty folder below `root`, deepest first.
///
/// A folder that only held folders removed earlier in the same pass counts as
/// empty. `root` itself is kept. Failed removals are ignored.
pub fn remove_empty_folders(root: &Path, dry_run: bool) -> Result<PruneSummary> {
    validate_root(root)?;

    let mut folders = prune_candidates(root);
    folders.sort_by_key(|folder| Reverse(folder.components().count()));

    let mut summary = PruneSummary::default();
    let mut removed: HashSet<PathBuf> = HashSet::new();

    for folder in folders {
        summary.inspected += 1;

        let is_empty = match fs::read_dir(&folder) {
            Ok(mut entries) => entries.all(|entry| {
                entry
                    .map(|entry| removed.contains(&entry.path()))
                    .unwrap_or(false)
            }),
            Err(e) => {
                debug!("Cannot read {}: {}", folder.display(), e);
                continue;
            }
        };
        if !is_empty {
            continue;
        }

        if dry_run {
            log_fs_modification("rmdir (dry run)", &folder, None);
        } else if let Err(e) = fs::remove_dir(&folder) {
            debug!("Could not remove {}: {}", folder.display(), e);
            continue;
        } else {
            log_fs_modification("rmdir", &folder, None);
        }

        removed.insert(folder);
        summary.removed += 1;
    }

    info!(
        "Prune finished: {} of {} folders removed",
        summary.removed, summary.inspected
    );
    Ok(summary)
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_file, dir_file_names, read};
    use tempfile::tempdir;

    #[test]
    fn test_move_to_story() {
        let dir = tempdir().unwrap();
        let leaf = dir.path().join("250101/img");
        create_file(&leaf, "a.jpg");
        create_file(&leaf, "b.jpg");

        let summary = move_to_story(dir.path(), "story", false).unwrap();

        assert_eq!(summary.moved, 2);
        assert_eq!(summary.leaf_folders, 1);
        assert!(dir_file_names(&leaf).is_empty());
        assert_eq!(dir_file_names(&leaf.join("story")), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_move_to_story_twice_does_not_nest() {
        let dir = tempdir().unwrap();
        let leaf = dir.path().join("img");
        create_file(&leaf, "a.jpg");

        move_to_story(dir.path(), "story", false).unwrap();
        let second = move_to_story(dir.path(), "story", false).unwrap();

        assert_eq!(second.moved, 0);
        assert_eq!(second.leaf_folders, 0);
        assert!(!leaf.join("story/story").exists());
        assert_eq!(read(&leaf.join("story/a.jpg")), "a.jpg");
    }

    #[test]
    fn test_move_to_story_dry_run() {
        let dir = tempdir().unwrap();
        let leaf = dir.path().join("img");
        create_file(&leaf, "a.jpg");

        let summary = move_to_story(dir.path(), "story", true).unwrap();

        assert_eq!(summary.moved, 1);
        assert!(!leaf.join("story").exists());
        assert_eq!(dir_file_names(&leaf), vec!["a.jpg"]);
    }

    #[test]
    fn test_remove_empty_folders_cascades() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        create_file(&dir.path().join("keep"), "a.jpg");

        let summary = remove_empty_folders(dir.path(), false).unwrap();

        assert_eq!(summary.removed, 2);
        assert_eq!(summary.inspected, 3);
        assert!(!dir.path().join("x").exists());
        assert!(dir.path().join("keep/a.jpg").exists());
        assert!(dir.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_empty_folders_skips_unreadable_folder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/empty")).unwrap();
        let locked = dir.path().join("locked");
        create_file(&locked, "keep.jpg");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = remove_empty_folders(dir.path(), false);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let summary = result.unwrap();
        assert_eq!(summary.removed, 2);
        assert!(!dir.path().join("a").exists());
        assert!(locked.join("keep.jpg").exists());
    }

    #[test]
    fn test_remove_empty_folders_dry_run() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y/z")).unwrap();

        let summary = remove_empty_folders(dir.path(), true).unwrap();

        assert_eq!(summary.removed, 3);
        assert!(dir.path().join("x/y/z").exists());
    }
}
