use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("process inspection is not supported on this platform")]
    Unsupported,
    #[error("no process with pid {0}")]
    NoSuchProcess(u32),
    #[error("could not determine executable path for pid {0}")]
    NoExecutablePath(u32),
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InspectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
