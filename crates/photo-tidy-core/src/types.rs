use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A `YYMMDD` folder name found directly under the chosen root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateCode {
    yy: [u8; 2],
    mm: [u8; 2],
    dd: [u8; 2],
}

impl DateCode {
    /// Parse a folder name made of exactly six ASCII digits.
    ///
    /// Only the shape is checked, not the calendar: `991399` parses.
    pub fn parse(name: &str) -> Option<Self> {
        let bytes = name.as_bytes();
        if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }

        Some(Self {
            yy: [bytes[0], bytes[1]],
            mm: [bytes[2], bytes[3]],
            dd: [bytes[4], bytes[5]],
        })
    }

    /// Canonical `CCYY-MM-DD` date string
    pub fn canonical(&self, century_prefix: &str) -> String {
        format!(
            "{}{}{}-{}{}-{}{}",
            century_prefix,
            self.yy[0] as char,
            self.yy[1] as char,
            self.mm[0] as char,
            self.mm[1] as char,
            self.dd[0] as char,
            self.dd[1] as char,
        )
    }
}

impl fmt::Display for DateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.yy.iter().chain(&self.mm).chain(&self.dd) {
            write!(f, "{}", *b as char)?;
        }
        Ok(())
    }
}

/// A folder with no subfolders, paired with the date its files are named after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafFolder {
    pub path: PathBuf,
    pub date: String,
}

/// What happened to a single file during an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameOutcome {
    /// Moved to its target name
    Renamed(PathBuf),

    /// Something already exists at the target; the file was left alone
    Skipped(PathBuf),

    /// The filesystem refused the operation
    Failed(String),
}

/// Aggregate counts of a rename run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameSummary {
    pub leaf_folders: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Leaf folders that could not be read at all
    pub failed_folders: usize,
    /// Root children ignored because their name is not a date code
    pub skipped_date_folders: usize,
}

impl RenameSummary {
    pub(crate) fn record(&mut self, outcome: &RenameOutcome) {
        match outcome {
            RenameOutcome::Renamed(_) => self.renamed += 1,
            RenameOutcome::Skipped(_) => self.skipped += 1,
            RenameOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Aggregate counts of a story move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMoveSummary {
    pub leaf_folders: usize,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Aggregate counts of an empty-folder prune
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSummary {
    pub inspected: usize,
    pub removed: usize,
}
