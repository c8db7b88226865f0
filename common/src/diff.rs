use std::collections::HashSet;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::error::{Error, Result};
use crate::path::RelPath;
use crate::plan::FilePair;

fn subtract(lhs: &HashSet<RelPath>, rhs: &HashSet<RelPath>) -> HashSet<RelPath> {
    lhs.difference(rhs).cloned().collect()
}

/// Returns `(to_create, to_delete)`: folders only in source, folders only in destination.
pub fn folders(
    source: &HashSet<RelPath>,
    dest: &HashSet<RelPath>,
) -> (HashSet<RelPath>, HashSet<RelPath>) {
    (subtract(source, dest), subtract(dest, source))
}

/// Returns `(to_copy, to_delete)`: files only in source, files only in destination.
pub fn files(
    source: &HashSet<RelPath>,
    dest: &HashSet<RelPath>,
) -> (HashSet<RelPath>, HashSet<RelPath>) {
    (subtract(source, dest), subtract(dest, source))
}

pub fn file_mtime(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Files present on both sides whose source copy is strictly newer than the destination copy.
///
/// Equal timestamps are not a modification. A failed stat (e.g. the file vanished after the scan)
/// aborts the whole computation. Pairs come back ordered by relative path.
pub fn modified<F>(
    source: &HashSet<RelPath>,
    dest: &HashSet<RelPath>,
    source_root: &Path,
    dest_root: &Path,
    mtime: F,
) -> Result<Vec<FilePair>>
where
    F: Fn(&Path) -> std::io::Result<SystemTime>,
{
    let mut common: Vec<&RelPath> = source.intersection(dest).collect();
    common.sort();
    let mut pairs = Vec::new();
    for rel in common {
        let src = rel.join_to(source_root);
        let dst = rel.join_to(dest_root);
        let src_mtime = mtime(&src).map_err(|error| Error::io("reading mtime of", &src, error))?;
        let dst_mtime = mtime(&dst).map_err(|error| Error::io("reading mtime of", &dst, error))?;
        if src_mtime > dst_mtime {
            debug!("modified: {:?} is newer than {:?}", &src, &dst);
            pairs.push(FilePair { src, dst });
        }
    }
    Ok(pairs)
}
