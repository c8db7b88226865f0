use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::path::RelPath;
use crate::plan::FilePair;
use crate::progress::Eta;
use crate::session::Session;
use crate::summary::Summary;
use crate::Outcome;

/// Copies content and permission bits, then access and modification times; returns bytes copied.
#[instrument]
pub fn copy_preserving(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = std::fs::copy(src, dst).map_err(|error| Error::io("copying", src, error))?;
    let metadata = std::fs::metadata(src).map_err(|error| Error::io("reading metadata of", src, error))?;
    let atime = filetime::FileTime::from_last_access_time(&metadata);
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dst, atime, mtime)
        .map_err(|error| Error::io("setting timestamps of", dst, error))?;
    Ok(bytes)
}

fn check_interrupt(session: &Session, in_progress: &Path, previous: Option<&PathBuf>) -> Result<()> {
    if session.interrupt.is_requested() {
        return Err(Error::Cancelled {
            in_progress: in_progress.to_path_buf(),
            previous: previous.cloned(),
        });
    }
    Ok(())
}

/// A Ctrl+C that lands while the final copy runs has no next file to stop in front of, so it is
/// reported against that final copy.
fn check_interrupt_after(
    session: &Session,
    last: Option<&PathBuf>,
    earlier: Option<&PathBuf>,
) -> Result<()> {
    match last {
        Some(last) => check_interrupt(session, last, earlier),
        None => Ok(()),
    }
}

fn copy_or_abort(src: &Path, dst: &Path, previous: Option<&PathBuf>) -> Result<u64> {
    copy_preserving(src, dst).map_err(|error| match error {
        Error::Io { source, .. } => Error::CopyAborted {
            path: src.to_path_buf(),
            previous: previous.cloned(),
            source,
        },
        other => other,
    })
}

fn copy_all(
    session: &Session,
    ordered: &[&RelPath],
    source_root: &Path,
    dest_root: &Path,
    start: Instant,
    summary: &mut Summary,
) -> Result<()> {
    let total = ordered.len();
    let mut earlier: Option<PathBuf> = None;
    let mut previous: Option<PathBuf> = None;
    for (idx, rel) in ordered.iter().enumerate() {
        let src = rel.join_to(source_root);
        let dst = rel.join_to(dest_root);
        check_interrupt(session, &dst, previous.as_ref())?;
        debug!("copy: {:?} -> {:?}", &src, &dst);
        summary.bytes_copied += copy_or_abort(&src, &dst, previous.as_ref())?;
        summary.files_copied += 1;
        session
            .progress
            .update(&Eta::after(idx + 1, total, start.elapsed()));
        earlier = previous.replace(dst);
    }
    check_interrupt_after(session, previous.as_ref(), earlier.as_ref())
}

/// Copies files that exist only in the source, one at a time.
///
/// Nothing is asked when there is nothing to copy. The interrupt source is polled before each
/// file and once more after the last one; on interrupt the error names the file that was next (or
/// running) and the last one completed before it, and everything copied so far stays in place. A
/// failed copy stops the phase the same way, naming the last file that made it.
pub fn copy_new(
    session: &mut Session,
    to_copy: &HashSet<RelPath>,
    source_root: &Path,
    dest_root: &Path,
) -> Result<Outcome> {
    if to_copy.is_empty() {
        session.say(format_args!("No new files to copy."))?;
        return Ok(Outcome::NothingToDo);
    }
    let total = to_copy.len();
    session.say(format_args!("There are {} files to copy.", total))?;
    if !session.decider.copy_new_files(total) {
        return Ok(Outcome::Declined);
    }
    let mut ordered: Vec<&RelPath> = to_copy.iter().collect();
    ordered.sort();
    let mut summary = Summary::default();
    if session.dry_run {
        for rel in ordered {
            session.say(format_args!(
                "Would copy file: {} -> {}",
                rel.join_to(source_root).display(),
                rel.join_to(dest_root).display()
            ))?;
            summary.files_copied += 1;
        }
        return Ok(Outcome::Completed(summary));
    }
    let start = Instant::now();
    session.progress.start(total);
    let res = copy_all(session, &ordered, source_root, dest_root, start, &mut summary);
    session.progress.finish();
    res?;
    session.say(format_args!(
        "Copied {} files in {}.",
        summary.files_copied,
        humantime::format_duration(std::time::Duration::from_secs(start.elapsed().as_secs()))
    ))?;
    Ok(Outcome::Completed(summary))
}

/// Copies source files that are newer than their destination counterpart.
///
/// Every pair is listed before the confirmation; copies are reported one by one, no ETA.
pub fn copy_modified(session: &mut Session, pairs: &[FilePair]) -> Result<Outcome> {
    for pair in pairs {
        session.say(format_args!(
            "Modified file: {} -> {}",
            pair.src.display(),
            pair.dst.display()
        ))?;
    }
    if pairs.is_empty() {
        session.say(format_args!("No modified files found."))?;
        return Ok(Outcome::NothingToDo);
    }
    session.say(format_args!("There are {} modified files.", pairs.len()))?;
    if !session.decider.copy_modified_files(pairs) {
        return Ok(Outcome::Declined);
    }
    let mut summary = Summary::default();
    let mut earlier: Option<PathBuf> = None;
    let mut previous: Option<PathBuf> = None;
    for pair in pairs {
        if session.dry_run {
            session.say(format_args!(
                "Would copy file: {} -> {}",
                pair.src.display(),
                pair.dst.display()
            ))?;
        } else {
            check_interrupt(session, &pair.dst, previous.as_ref())?;
            session.say(format_args!(
                "Copy file: {} -> {}",
                pair.src.display(),
                pair.dst.display()
            ))?;
            summary.bytes_copied += copy_or_abort(&pair.src, &pair.dst, previous.as_ref())?;
            earlier = previous.replace(pair.dst.clone());
        }
        summary.files_updated += 1;
    }
    check_interrupt_after(session, previous.as_ref(), earlier.as_ref())?;
    Ok(Outcome::Completed(summary))
}
