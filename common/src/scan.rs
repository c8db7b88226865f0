use std::collections::HashSet;
use std::path::Path;

use tracing::{instrument, warn};

use crate::error::{Error, Result};
use crate::path::RelPath;

/// Folders and files found below one root by a single walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub folders: HashSet<RelPath>,
    pub files: HashSet<RelPath>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

enum EntryKind {
    Folder,
    File,
    Skip(&'static str),
}

fn classify(path: &Path, file_type: std::fs::FileType) -> Result<EntryKind> {
    if file_type.is_dir() {
        return Ok(EntryKind::Folder);
    }
    if file_type.is_file() {
        return Ok(EntryKind::File);
    }
    if !file_type.is_symlink() {
        return Ok(EntryKind::Skip("not a regular file or directory"));
    }
    // copies follow links, so a link counts as whatever it points at
    match std::fs::metadata(path) {
        Ok(target) if target.is_file() => Ok(EntryKind::File),
        Ok(target) if target.is_dir() => Ok(EntryKind::Skip("symlink to a directory")),
        Ok(_) => Ok(EntryKind::Skip("symlink to a special file")),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Ok(EntryKind::Skip("dangling symlink"))
        }
        Err(error) => Err(Error::io("reading metadata of", path, error)),
    }
}

/// Walks `root` and records every folder and file below it, `root` itself excluded.
///
/// The walk uses an explicit stack so depth is only bounded by memory. Any unreadable
/// directory aborts the scan: a partial listing would turn into bogus copies or deletions.
#[instrument]
pub fn scan(root: &Path) -> Result<ScanResult> {
    let mut result = ScanResult::default();
    let mut pending: Vec<RelPath> = vec![RelPath::default()];
    while let Some(dir) = pending.pop() {
        let dir_path = dir.join_to(root);
        let entries = std::fs::read_dir(&dir_path)
            .map_err(|error| Error::io("reading directory", &dir_path, error))?;
        for entry in entries {
            let entry = entry.map_err(|error| Error::io("traversing directory", &dir_path, error))?;
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|error| Error::io("reading file type of", &entry_path, error))?;
            let rel = dir.child(&entry.file_name());
            match classify(&entry_path, file_type)? {
                EntryKind::Folder => {
                    result.folders.insert(rel.clone());
                    pending.push(rel);
                }
                EntryKind::File => {
                    result.files.insert(rel);
                }
                EntryKind::Skip(reason) => {
                    warn!("skipping {:?}: {}", &entry_path, reason);
                }
            }
        }
    }
    Ok(result)
}
