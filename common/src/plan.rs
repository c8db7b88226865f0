use std::collections::HashSet;
use std::path::PathBuf;

use crate::diff;
use crate::path::RelPath;
use crate::scan::ScanResult;

/// Absolute source and destination locations of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub src: PathBuf,
    pub dst: PathBuf,
}

/// Structural difference between a source scan and a destination scan.
///
/// Built fresh for every phase and consumed by it; modified files need a stat of both
/// sides so they are computed separately, see [`diff::modified`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Plan {
    pub folders_to_create: HashSet<RelPath>,
    pub folders_to_delete: HashSet<RelPath>,
    pub files_to_copy: HashSet<RelPath>,
    pub files_to_delete: HashSet<RelPath>,
}

impl Plan {
    pub fn between(source: &ScanResult, dest: &ScanResult) -> Self {
        let (folders_to_create, folders_to_delete) = diff::folders(&source.folders, &dest.folders);
        let (files_to_copy, files_to_delete) = diff::files(&source.files, &dest.files);
        Self {
            folders_to_create,
            folders_to_delete,
            files_to_copy,
            files_to_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders_to_create.is_empty()
            && self.folders_to_delete.is_empty()
            && self.files_to_copy.is_empty()
            && self.files_to_delete.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn relpath_strategy() -> impl Strategy<Value = RelPath> {
        prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(RelPath::new)
    }

    fn scan_strategy() -> impl Strategy<Value = ScanResult> {
        (
            prop::collection::hash_set(relpath_strategy(), 0..20),
            prop::collection::hash_set(relpath_strategy(), 0..20),
        )
            .prop_map(|(folders, files)| ScanResult { folders, files })
    }

    proptest! {
        #[test]
        fn identical_trees_have_empty_plan(scan in scan_strategy()) {
            prop_assert!(Plan::between(&scan, &scan.clone()).is_empty());
        }

        #[test]
        fn plan_partitions_both_sides(source in scan_strategy(), dest in scan_strategy()) {
            let plan = Plan::between(&source, &dest);
            for rel in &plan.files_to_copy {
                prop_assert!(source.files.contains(rel) && !dest.files.contains(rel));
            }
            for rel in &plan.files_to_delete {
                prop_assert!(dest.files.contains(rel) && !source.files.contains(rel));
            }
            for rel in &plan.folders_to_create {
                prop_assert!(source.folders.contains(rel) && !dest.folders.contains(rel));
            }
            for rel in &plan.folders_to_delete {
                prop_assert!(dest.folders.contains(rel) && !source.folders.contains(rel));
            }
            let shared = source.files.intersection(&dest.files).count();
            prop_assert_eq!(plan.files_to_copy.len() + shared, source.files.len());
            prop_assert_eq!(plan.files_to_delete.len() + shared, dest.files.len());
        }

        #[test]
        fn applying_the_plan_converges(source in scan_strategy(), dest in scan_strategy()) {
            let plan = Plan::between(&source, &dest);
            let mut synced = dest.clone();
            synced.folders.extend(plan.folders_to_create.iter().cloned());
            synced.files.extend(plan.files_to_copy.iter().cloned());
            let again = Plan::between(&source, &synced);
            prop_assert!(again.folders_to_create.is_empty());
            prop_assert!(again.files_to_copy.is_empty());
            prop_assert_eq!(again.files_to_delete, plan.files_to_delete);
        }
    }
}
