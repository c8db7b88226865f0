//! Engine behind `lsync`, a one-way directory synchronization tool.
//!
//! A sync mirrors a source tree into a destination tree in four sequential phases, each of which
//! rescans both trees first:
//!
//! 1. [`folders::create`] - missing folders, parents before children
//! 2. [`files::copy_new`] - files missing from the destination
//! 3. [`files::copy_modified`] - optional, files whose source copy is newer
//! 4. [`prune::run`] - optional, destination-only files and then folders
//!
//! Phases never prompt or exit on their own: confirmations go through a [`prompt::Decider`],
//! operator interrupts come in through an [`interrupt::Interrupt`] and all status lines are
//! written to the [`Session`] output.

use std::path::Path;

use tracing::info;

pub mod config;
pub mod diff;
pub mod error;
pub mod files;
pub mod folders;
pub mod interrupt;
pub mod logging;
pub mod path;
pub mod plan;
pub mod progress;
pub mod prompt;
pub mod prune;
pub mod scan;
pub mod session;
pub mod summary;

#[cfg(test)]
mod testutils;

pub use config::{ConfigFile, OutputConfig, SyncSettings};
pub use error::{Error, Result};
pub use path::{RelPath, clean_path};
pub use plan::{FilePair, Plan};
pub use progress::ProgressType;
pub use scan::{ScanResult, scan};
pub use session::Session;
pub use summary::Summary;

/// How a confirm-then-act phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NothingToDo,
    /// The operator said no; only this phase is skipped.
    Declined,
    Completed(Summary),
}

impl Outcome {
    pub fn summary(&self) -> Summary {
        match self {
            Self::Completed(summary) => *summary,
            Self::NothingToDo | Self::Declined => Summary::default(),
        }
    }
}

/// Caller-side precondition: `path` must be an existing directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// An interrupt that arrived outside a copy loop still stops the run before `phase` starts.
fn check_phase(session: &Session, phase: &'static str) -> Result<()> {
    if session.interrupt.is_requested() {
        return Err(Error::Interrupted { phase });
    }
    Ok(())
}

/// Runs every enabled phase in order and returns the combined summary.
///
/// A declined phase does not stop the following ones. Errors, including cancellation, abort the
/// run immediately; the interrupt source is checked again between phases.
pub fn sync(
    session: &mut Session,
    source_root: &Path,
    dest_root: &Path,
    settings: &SyncSettings,
) -> Result<Summary> {
    session.dry_run = settings.dry_run;
    info!("sync {:?} -> {:?} with {:?}", source_root, dest_root, settings);

    check_phase(session, "creating folders")?;
    let plan = Plan::between(&scan(source_root)?, &scan(dest_root)?);
    let created = folders::create(session, &plan.folders_to_create, source_root, dest_root)?;
    let mut summary = Summary {
        folders_created: created.len(),
        ..Default::default()
    };

    check_phase(session, "copying new files")?;
    let plan = Plan::between(&scan(source_root)?, &scan(dest_root)?);
    summary = summary
        + files::copy_new(session, &plan.files_to_copy, source_root, dest_root)?.summary();

    if settings.modified {
        check_phase(session, "copying modified files")?;
        let source = scan(source_root)?;
        let dest = scan(dest_root)?;
        let pairs = diff::modified(
            &source.files,
            &dest.files,
            source_root,
            dest_root,
            diff::file_mtime,
        )?;
        summary = summary + files::copy_modified(session, &pairs)?.summary();
    }

    if settings.delete {
        check_phase(session, "deleting files")?;
        summary = summary + prune::run(session, source_root, dest_root)?.summary();
    }
    Ok(summary)
}
