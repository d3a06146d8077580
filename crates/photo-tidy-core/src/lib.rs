//! Core functionality for tidying date-partitioned photo folders.
//!
//! The folder layout is `root / YYMMDD / ... / leaf`, where a leaf is a folder
//! without subfolders. This library provides:
//! - Canonical renaming of the files in every leaf after its date folder
//! - A pausable background worker with progress reporting
//! - Moving leaf files into a story subfolder
//! - Pruning of empty folders

// -- External Dependencies --
use log::info;

// -- Standard Library --
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use context::{ProgressUpdate, RunContext};
pub use error::{Error, Result};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod context;
pub mod discovery;
pub mod logging;
pub mod maintenance;
pub mod rename;
pub mod types;

// -- Test Modules --
#[cfg(test)]
pub mod test_utils;

/// Main entry point for the tidying actions
#[derive(Debug, Clone)]
pub struct Organizer {
    config: Config,
}

/// Handle to a rename running on its own thread
pub struct RenameWorker {
    handle: JoinHandle<Result<RenameSummary>>,
}

impl RenameWorker {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its summary
    pub fn join(self) -> Result<RenameSummary> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)?
    }
}

impl Organizer {
    /// Create a new Organizer with the provided configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Leaf folders of every date folder under `root`, in processing order.
    ///
    /// The second value counts root children skipped for not being date codes.
    pub fn collect_leaf_folders(&self, root: &Path) -> Result<(Vec<LeafFolder>, usize)> {
        discovery::validate_root(root)?;

        let (date_folders, ignored) = discovery::date_folders(root)?;
        let mut leaves = Vec::new();

        for (folder, code) in date_folders {
            let date = code.canonical(&self.config.century_prefix);
            for path in discovery::leaf_folders_under(&folder)? {
                leaves.push(LeafFolder {
                    path,
                    date: date.clone(),
                });
            }
        }

        Ok((leaves, ignored))
    }

    /// Rename the files of every leaf folder under the date folders of `root`.
    ///
    /// Leaves are handled one at a time. Between leaves the worker waits
    /// while `ctx` is paused, and progress is published after each leaf.
    pub fn rename_tree(&self, root: &Path, ctx: &RunContext) -> Result<RenameSummary> {
        info!("Collecting leaf folders under {}", root.display());
        let (leaves, ignored) = self.collect_leaf_folders(root)?;
        info!("Found {} leaf folders", leaves.len());

        ctx.start(leaves.len());

        let mut summary = RenameSummary {
            skipped_date_folders: ignored,
            ..Default::default()
        };

        for leaf in &leaves {
            ctx.wait_while_paused();

            match rename::rename_leaf(&leaf.path, &leaf.date, self.config.dry_run) {
                Ok(outcomes) => {
                    for (_, outcome) in &outcomes {
                        summary.record(outcome);
                    }
                }
                Err(e) => {
                    logging::log_file_error(&leaf.path, "rename leaf folder", &e);
                    summary.failed_folders += 1;
                }
            }

            summary.leaf_folders += 1;
            ctx.leaf_done();
        }

        let progress = ctx.progress();
        info!(
            "Rename finished in {:.1}s: {} renamed, {} skipped, {} failed across {} folders ({} unreadable)",
            progress.elapsed.as_secs_f64(),
            summary.renamed,
            summary.skipped,
            summary.failed,
            summary.leaf_folders,
            summary.failed_folders
        );
        Ok(summary)
    }

    /// Run [`Organizer::rename_tree`] on a background thread
    pub fn spawn_rename(
        &self,
        root: impl Into<PathBuf>,
        ctx: Arc<RunContext>,
    ) -> Result<RenameWorker> {
        let root = root.into();
        let organizer = self.clone();

        let handle = std::thread::Builder::new()
            .name("rename-worker".to_string())
            .spawn(move || organizer.rename_tree(&root, &ctx))?;

        Ok(RenameWorker { handle })
    }

    /// Move every leaf folder's files into its story subfolder
    pub fn move_to_story(&self, root: &Path) -> Result<StoryMoveSummary> {
        maintenance::move_to_story(root, &self.config.story_dir_name, self.config.dry_run)
    }

    /// Remove empty folders below `root`
    pub fn remove_empty_folders(&self, root: &Path) -> Result<PruneSummary> {
        maintenance::remove_empty_folders(root, self.config.dry_run)
    }
}
