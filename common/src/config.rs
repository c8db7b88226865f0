//! Configuration types for sync runs and output settings

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lsync.toml";

/// What a sync run does besides creating folders and copying new files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSettings {
    /// Report actions without touching the destination
    pub dry_run: bool,
    /// Also copy files whose source mtime is newer
    pub modified: bool,
    /// Delete destination entries missing from the source
    pub delete: bool,
}

/// Output and logging configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress error output
    pub quiet: bool,
    /// Verbosity level: 0=ERROR, 1=INFO, 2=DEBUG, 3=TRACE
    pub verbose: u8,
    /// Print summary statistics at the end
    pub print_summary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSection {
    pub dry_run: bool,
    pub modified: bool,
    pub delete: bool,
    pub assume_yes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub progress: bool,
    pub summary: bool,
    pub verbose: u8,
}

/// Contents of an `lsync.toml` file, every key optional.
///
/// ```toml
/// [sync]
/// modified = true
/// delete = true
///
/// [output]
/// progress = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub sync: SyncSection,
    pub output: OutputSection,
}

impl ConfigFile {
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|error| Error::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| Error::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        Self::parse(path, &text)
    }

    /// An explicitly requested file must exist; the default file is only read when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Command line flags can only switch settings on, never off.
    pub fn sync_settings(&self, dry_run: bool, modified: bool, delete: bool) -> SyncSettings {
        SyncSettings {
            dry_run: dry_run || self.sync.dry_run,
            modified: modified || self.sync.modified,
            delete: delete || self.sync.delete,
        }
    }
}
