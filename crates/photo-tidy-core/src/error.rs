use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the photo-tidy library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// An action was started without a folder to work on
    #[error("No folder selected")]
    NoFolderSelected,

    /// Root folder missing or not a directory
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The background rename worker panicked
    #[error("Rename worker panicked")]
    WorkerPanicked,
}
