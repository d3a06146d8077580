#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Create a file whose content is its own name
pub fn create_file(dir: &Path, name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(name);
    fs::write(&file_path, name).unwrap();
    file_path
}

/// Sorted names of the files directly inside `dir`
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

/// Build a small photo tree:
///
/// ```text
/// root/
///   250101/img/{b.jpg, a.jpg}
///   250101/trip/day1/{photo10.png, photo2.png, photo1.png}
///   250101/trip/day2/x.mov
///   250102/{c.jpg}        (no subfolders, so not processed)
///   abcdef/inner/{keep.jpg}
/// ```
pub fn create_photo_tree(root: &Path) {
    create_file(&root.join("250101/img"), "b.jpg");
    create_file(&root.join("250101/img"), "a.jpg");
    for name in ["photo10.png", "photo2.png", "photo1.png"] {
        create_file(&root.join("250101/trip/day1"), name);
    }
    create_file(&root.join("250101/trip/day2"), "x.mov");
    create_file(&root.join("250102"), "c.jpg");
    create_file(&root.join("abcdef/inner"), "keep.jpg");
}
