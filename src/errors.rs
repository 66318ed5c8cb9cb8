//! Typed error definitions for trashcan.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("refusing to trash dot entry: {0}")]
    DotEntry(PathBuf),

    #[error("no trash directory was able to accept: {0}")]
    NoUsableTrashDir(PathBuf),

    #[error("could not allocate a unique name for '{name}' in {dir} after {attempts} attempts")]
    NameExhausted {
        dir: PathBuf,
        name: String,
        attempts: u32,
    },

    #[error("malformed trash record {path}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("could not resolve the volume of {path}: {source}")]
    VolumeResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
