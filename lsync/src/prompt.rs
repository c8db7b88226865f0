use std::io::{BufRead, Write};
use std::path::PathBuf;

use common::interrupt::SigintFlag;
use common::prompt::{Decider, PruneChoice};
use common::FilePair;

/// Asks on the terminal; anything but the listed answers (including EOF) means "no".
pub struct TerminalDecider<R, W> {
    input: R,
    output: W,
    sigint: Option<&'static SigintFlag>,
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            sigint: None,
        }
    }

    /// Ctrl+C while waiting for an answer ends the process instead of being deferred.
    pub fn with_sigint(mut self, sigint: &'static SigintFlag) -> Self {
        self.sigint = Some(sigint);
        self
    }

    fn answer(&mut self, question: &str) -> String {
        if write!(self.output, "{}", question)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return String::new();
        }
        if let Some(sigint) = self.sigint {
            sigint.set_armed(false);
        }
        let mut line = String::new();
        let res = self.input.read_line(&mut line);
        if let Some(sigint) = self.sigint {
            sigint.set_armed(true);
        }
        match res {
            Ok(_) => line.trim().to_lowercase(),
            Err(error) => {
                tracing::warn!("failed reading answer: {}", error);
                String::new()
            }
        }
    }

    pub fn ask_yes_no(&mut self, question: &str) -> bool {
        self.answer(&format!("{} (y/N): ", question)) == "y"
    }
}

impl<R: BufRead, W: Write> Decider for TerminalDecider<R, W> {
    fn copy_new_files(&mut self, _count: usize) -> bool {
        self.ask_yes_no("Do you want to copy the new files?")
    }

    fn copy_modified_files(&mut self, _pairs: &[FilePair]) -> bool {
        self.ask_yes_no("Do you want to copy the changes?")
    }

    fn delete_files(&mut self, _count: usize) -> PruneChoice {
        match self
            .answer("Do you want to delete the files? (y)es (N)o Show (L)ist of files (y/N/l): ")
            .as_str()
        {
            "y" => PruneChoice::Delete,
            "l" => PruneChoice::List,
            _ => PruneChoice::Decline,
        }
    }

    fn delete_listed_files(&mut self, _paths: &[PathBuf]) -> bool {
        self.ask_yes_no("Do you want to continue?")
    }
}
