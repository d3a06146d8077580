#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Create a file whose content is its own name, so renames can be traced
pub fn create_file(dir: &Path, name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(name);
    fs::write(&file_path, name).unwrap();
    file_path
}

/// File names of the given paths, in order
pub fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Sorted names of the files (not folders) directly inside `dir`
pub fn dir_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
