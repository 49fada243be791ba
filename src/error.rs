use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShotError>;

#[derive(Debug, Error)]
pub enum ShotError {
    /// A required path or name was never supplied.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("footage folder is empty: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy footage for shot {shot}: {failure}")]
    Copy { shot: String, failure: CopyFailure },

    #[error("invalid script name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("executable not found: {}", .0.display())]
    ToolNotFound(PathBuf),

    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CopyFailure {
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("source is missing: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShotError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShotError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
