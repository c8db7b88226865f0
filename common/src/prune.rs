use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::path::RelPath;
use crate::plan::Plan;
use crate::prompt::PruneChoice;
use crate::scan::scan;
use crate::session::Session;
use crate::summary::Summary;
use crate::{folders, Outcome};

/// Deletes destination files that no longer exist in the source.
///
/// Fail-fast: the first file that cannot be removed stops the phase, the rest stay untouched and
/// the error names the last file that was removed, so a partial prune never goes unnoticed.
pub fn delete_files(
    session: &mut Session,
    to_delete: &HashSet<RelPath>,
    dest_root: &Path,
) -> Result<Outcome> {
    session.say(format_args!("There are {} files to delete.", to_delete.len()))?;
    if to_delete.is_empty() {
        return Ok(Outcome::NothingToDo);
    }
    let mut ordered: Vec<&RelPath> = to_delete.iter().collect();
    ordered.sort();
    let paths: Vec<PathBuf> = ordered.iter().map(|rel| rel.join_to(dest_root)).collect();
    match session.decider.delete_files(paths.len()) {
        PruneChoice::Delete => {}
        PruneChoice::Decline => return Ok(Outcome::Declined),
        PruneChoice::List => {
            for path in &paths {
                session.say(format_args!("Will delete file: {}", path.display()))?;
            }
            if !session.decider.delete_listed_files(&paths) {
                return Ok(Outcome::Declined);
            }
        }
    }
    let mut summary = Summary::default();
    let mut last_removed: Option<PathBuf> = None;
    for path in paths {
        if session.dry_run {
            session.say(format_args!("Would delete file: {}", path.display()))?;
        } else {
            session.say(format_args!("Deleting file: {}", path.display()))?;
            if let Err(source) = std::fs::remove_file(&path) {
                return Err(Error::PruneAborted {
                    path,
                    last_removed,
                    source,
                });
            }
            debug!("removed file {:?}", &path);
            last_removed = Some(path);
        }
        summary.files_removed += 1;
    }
    Ok(Outcome::Completed(summary))
}

/// Full prune phase: destination-only files, then destination-only folders deepest first.
///
/// Both sides are rescanned before each step. Folders are left alone when the file deletion was
/// declined, since they would still hold the files the operator chose to keep.
pub fn run(session: &mut Session, source_root: &Path, dest_root: &Path) -> Result<Outcome> {
    let plan = Plan::between(&scan(source_root)?, &scan(dest_root)?);
    let files_outcome = delete_files(session, &plan.files_to_delete, dest_root)?;
    if files_outcome == Outcome::Declined {
        return Ok(Outcome::Declined);
    }
    let folders_to_delete = if session.dry_run {
        plan.folders_to_delete
    } else {
        Plan::between(&scan(source_root)?, &scan(dest_root)?).folders_to_delete
    };
    let removed = folders::remove(session, &folders_to_delete, dest_root)?;
    let mut summary = files_outcome.summary();
    summary.folders_removed += removed.len();
    if summary.actions() == 0 {
        return Ok(Outcome::NothingToDo);
    }
    Ok(Outcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::FilePair;
    use crate::prompt::{AssumeYes, Decider};
    use crate::testutils::{rels, write_file};
    use anyhow::Result;
    use std::os::unix::fs::PermissionsExt;

    /// Replays a scripted prune conversation and records what was asked.
    struct Script {
        choice: PruneChoice,
        second: bool,
        listed: Vec<PathBuf>,
        asked: usize,
    }

    impl Script {
        fn new(choice: PruneChoice, second: bool) -> Self {
            Self {
                choice,
                second,
                listed: vec![],
                asked: 0,
            }
        }
    }

    impl Decider for Script {
        fn copy_new_files(&mut self, _count: usize) -> bool {
            unreachable!("prune never copies")
        }
        fn copy_modified_files(&mut self, _pairs: &[FilePair]) -> bool {
            unreachable!("prune never copies")
        }
        fn delete_files(&mut self, _count: usize) -> PruneChoice {
            self.asked += 1;
            self.choice
        }
        fn delete_listed_files(&mut self, paths: &[PathBuf]) -> bool {
            self.asked += 1;
            self.listed = paths.to_vec();
            self.second
        }
    }

    fn dest_with(files: &[&str]) -> Result<tempfile::TempDir> {
        let tmp = tempfile::tempdir()?;
        for file in files {
            write_file(&tmp.path().join(file), file)?;
        }
        Ok(tmp)
    }

    #[test]
    fn empty_set_reports_zero_without_prompt() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let mut decider = Script::new(PruneChoice::Delete, true);
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        assert_eq!(delete_files(&mut session, &HashSet::new(), tmp.path())?, Outcome::NothingToDo);
        assert_eq!(decider.asked, 0);
        assert!(String::from_utf8(out)?.contains("There are 0 files to delete."));
        Ok(())
    }

    #[test]
    fn decline_leaves_everything() -> Result<()> {
        let dst = dest_with(&["z", "w"])?;
        let mut decider = Script::new(PruneChoice::Decline, true);
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        let outcome = delete_files(&mut session, &rels(&["z", "w"]), dst.path())?;
        assert_eq!(outcome, Outcome::Declined);
        assert!(dst.path().join("z").exists() && dst.path().join("w").exists());
        Ok(())
    }

    #[test]
    fn list_then_decline_lists_every_candidate() -> Result<()> {
        let dst = dest_with(&["z", "w"])?;
        let mut decider = Script::new(PruneChoice::List, false);
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        let outcome = delete_files(&mut session, &rels(&["z", "w"]), dst.path())?;
        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(decider.asked, 2);
        assert_eq!(decider.listed.len(), 2);
        assert_eq!(String::from_utf8(out)?.matches("Will delete file:").count(), 2);
        assert!(dst.path().join("z").exists());
        Ok(())
    }

    #[test]
    fn list_then_confirm_deletes() -> Result<()> {
        let dst = dest_with(&["z", "keep"])?;
        let mut decider = Script::new(PruneChoice::List, true);
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        let outcome = delete_files(&mut session, &rels(&["z"]), dst.path())?;
        assert!(matches!(outcome, Outcome::Completed(s) if s.files_removed == 1));
        assert!(!dst.path().join("z").exists());
        assert!(dst.path().join("keep").exists());
        Ok(())
    }

    #[test]
    fn dry_run_deletes_nothing() -> Result<()> {
        let dst = dest_with(&["z"])?;
        let mut decider = AssumeYes;
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out).dry_run(true);
        let outcome = delete_files(&mut session, &rels(&["z"]), dst.path())?;
        assert!(matches!(outcome, Outcome::Completed(s) if s.files_removed == 1));
        assert!(dst.path().join("z").exists());
        assert!(String::from_utf8(out)?.contains("Would delete file:"));
        Ok(())
    }

    #[test]
    fn first_failure_aborts_remaining_deletions() -> Result<()> {
        let dst = dest_with(&["a", "locked/b", "m"])?;
        // removing an entry needs write permission on its directory
        std::fs::set_permissions(dst.path().join("locked"), std::fs::Permissions::from_mode(0o500))?;
        if std::fs::remove_file(dst.path().join("locked/b")).is_ok() {
            // running as root, permissions are not enforced
            return Ok(());
        }
        let mut decider = AssumeYes;
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        let res = delete_files(&mut session, &rels(&["a", "locked/b", "m"]), dst.path());
        std::fs::set_permissions(dst.path().join("locked"), std::fs::Permissions::from_mode(0o700))?;
        match res {
            Err(Error::PruneAborted {
                path, last_removed, ..
            }) => {
                assert_eq!(path, dst.path().join("locked/b"));
                assert_eq!(last_removed, Some(dst.path().join("a")));
            }
            other => panic!("expected PruneAborted, got {:?}", other),
        }
        assert!(!dst.path().join("a").exists());
        assert!(dst.path().join("m").exists(), "deletions after the failure must not run");
        Ok(())
    }

    #[test]
    fn run_removes_files_before_their_folders() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_file(&src.join("keep/x"), "x")?;
        write_file(&dst.join("keep/x"), "x")?;
        write_file(&dst.join("gone/deeper/y"), "y")?;
        write_file(&dst.join("gone/z"), "z")?;
        let mut decider = AssumeYes;
        let mut out = Vec::new();
        let mut session = Session::new(&mut decider, &mut out);
        let outcome = run(&mut session, &src, &dst)?;
        let Outcome::Completed(summary) = outcome else {
            panic!("expected completed prune, got {:?}", outcome);
        };
        assert_eq!(summary.files_removed, 2);
        assert_eq!(summary.folders_removed, 2);
        assert!(!dst.join("gone").exists());
        assert!(dst.join("keep/x").exists());
        Ok(())
    }

    #[test]
    fn run_dry_run_matches_real_run_counts() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir(&src)?;
        write_file(&dst.join("gone/deeper/y"), "y")?;
        let mut decider = AssumeYes;
        let mut out = Vec::new();
        let dry = run(&mut Session::new(&mut decider, &mut out).dry_run(true), &src, &dst)?;
        assert!(dst.join("gone/deeper/y").exists());
        let real = run(&mut Session::new(&mut decider, &mut out), &src, &dst)?;
        assert_eq!(dry, real);
        assert!(!dst.join("gone").exists());
        Ok(())
    }
}
