use std::path::PathBuf;

/// Failures surfaced by the sync engine.
///
/// Declined confirmations are not errors, see [`crate::Outcome::Declined`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path:?} does not exist or is not a directory")]
    NotFound { path: PathBuf },

    #[error("failed {action} {path:?}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user cancelled operation while copying {in_progress:?} (previous file was {previous:?})")]
    Cancelled {
        in_progress: PathBuf,
        previous: Option<PathBuf>,
    },

    #[error("user cancelled operation before {phase}")]
    Interrupted { phase: &'static str },

    #[error("failed copying {path:?}, remaining copies skipped (previous file was {previous:?})")]
    CopyAborted {
        path: PathBuf,
        previous: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed removing {path:?}, remaining deletions skipped (last removed: {last_removed:?})")]
    PruneAborted {
        path: PathBuf,
        last_removed: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing status output")]
    Output(#[source] std::io::Error),

    #[error("invalid config file {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
