use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::path::RelPath;
use crate::session::Session;

/// Shallowest first; ties go by path so the preview is stable.
fn creation_order(folders: &HashSet<RelPath>) -> Vec<&RelPath> {
    let mut ordered: Vec<&RelPath> = folders.iter().collect();
    ordered.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.cmp(b)));
    ordered
}

/// Deepest first, the exact reverse of [`creation_order`].
fn deletion_order(folders: &HashSet<RelPath>) -> Vec<&RelPath> {
    let mut ordered = creation_order(folders);
    ordered.reverse();
    ordered
}

fn copy_folder_times(source: &Path, dest: &Path) {
    // overwritten again as soon as files are copied into `dest`
    let res = std::fs::metadata(source).and_then(|metadata| {
        let atime = filetime::FileTime::from_last_access_time(&metadata);
        let mtime = filetime::FileTime::from_last_modification_time(&metadata);
        filetime::set_file_times(dest, atime, mtime)
    });
    if let Err(error) = res {
        warn!("cannot copy timestamps from {:?} to {:?}: {}", source, dest, error);
    }
}

/// Creates missing destination folders, parents before children.
///
/// Each new folder gets the source folder's timestamps on a best-effort basis. Returns the
/// destination paths created (or that would be created in dry-run), in creation order.
pub fn create(
    session: &mut Session,
    to_create: &HashSet<RelPath>,
    source_root: &Path,
    dest_root: &Path,
) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(to_create.len());
    for rel in creation_order(to_create) {
        let dest = rel.join_to(dest_root);
        if session.dry_run {
            session.say(format_args!("Would create folder: {}", dest.display()))?;
        } else {
            session.say(format_args!("Creating folder: {}", dest.display()))?;
            std::fs::create_dir(&dest).map_err(|error| Error::io("creating folder", &dest, error))?;
            copy_folder_times(&rel.join_to(source_root), &dest);
            debug!("created folder {:?}", &dest);
        }
        created.push(dest);
    }
    Ok(created)
}

/// Removes destination folders, children before parents.
///
/// Folders must already be empty; a non-empty folder is an error rather than a recursive delete.
pub fn remove(
    session: &mut Session,
    to_delete: &HashSet<RelPath>,
    dest_root: &Path,
) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::with_capacity(to_delete.len());
    for rel in deletion_order(to_delete) {
        let dest = rel.join_to(dest_root);
        if session.dry_run {
            session.say(format_args!("Would delete folder: {}", dest.display()))?;
        } else {
            session.say(format_args!("Deleting folder: {}", dest.display()))?;
            std::fs::remove_dir(&dest).map_err(|error| Error::io("removing folder", &dest, error))?;
            debug!("removed folder {:?}", &dest);
        }
        removed.push(dest);
    }
    Ok(removed)
}

/// Creates then removes folders; returns the created folder paths.
///
/// A standalone pass over both directions. A full sync removes folders only from the prune
/// phase, once destination-only files are gone.
pub fn apply(
    session: &mut Session,
    to_create: &HashSet<RelPath>,
    to_delete: &HashSet<RelPath>,
    source_root: &Path,
    dest_root: &Path,
) -> Result<Vec<PathBuf>> {
    let created = create(session, to_create, source_root, dest_root)?;
    remove(session, to_delete, dest_root)?;
    Ok(created)
}
