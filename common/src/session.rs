use std::io::Write;

use crate::error::{Error, Result};
use crate::interrupt::{Interrupt, Never};
use crate::progress::{NoProgress, ProgressSink};
use crate::prompt::Decider;

/// Everything a sync phase talks to besides the filesystem.
pub struct Session<'a> {
    pub dry_run: bool,
    pub decider: &'a mut dyn Decider,
    pub interrupt: &'a dyn Interrupt,
    pub progress: &'a dyn ProgressSink,
    pub out: &'a mut dyn Write,
}

impl<'a> Session<'a> {
    pub fn new(decider: &'a mut dyn Decider, out: &'a mut dyn Write) -> Self {
        Self {
            dry_run: false,
            decider,
            interrupt: &Never,
            progress: &NoProgress,
            out,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_interrupt(mut self, interrupt: &'a dyn Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Writes one status line to the session output.
    pub fn say(&mut self, line: std::fmt::Arguments) -> Result<()> {
        writeln!(self.out, "{}", line).map_err(Error::Output)?;
        self.out.flush().map_err(Error::Output)
    }
}
