//! Confirmation boundary between the engine and whoever drives it.

use std::path::PathBuf;

use crate::plan::FilePair;

/// Answer to the three-way prune question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneChoice {
    Delete,
    Decline,
    /// Show every candidate first, then ask again.
    List,
}

/// Decisions the engine asks for before mutating the destination.
///
/// The engine never reads from a terminal itself; front ends implement this trait with an
/// interactive prompt, a fixed policy or a test stub.
pub trait Decider {
    fn copy_new_files(&mut self, count: usize) -> bool;
    fn copy_modified_files(&mut self, pairs: &[FilePair]) -> bool;
    fn delete_files(&mut self, count: usize) -> PruneChoice;
    /// Second confirmation after the candidates were listed.
    fn delete_listed_files(&mut self, paths: &[PathBuf]) -> bool;
}

/// Says yes to everything, for batch runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Decider for AssumeYes {
    fn copy_new_files(&mut self, _count: usize) -> bool {
        true
    }

    fn copy_modified_files(&mut self, _pairs: &[FilePair]) -> bool {
        true
    }

    fn delete_files(&mut self, _count: usize) -> PruneChoice {
        PruneChoice::Delete
    }

    fn delete_listed_files(&mut self, _paths: &[PathBuf]) -> bool {
        true
    }
}
