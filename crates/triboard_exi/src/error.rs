use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BaseboardError>;

#[derive(Debug, Error)]
pub enum BaseboardError {
    #[error("failed to open backup store {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("backup store i/o error: {0}")]
    Io(#[from] io::Error),

    /// A transaction was clocked past the end of a command that has no more
    /// bytes to give. The position has still advanced.
    #[error("command {opcode:#04x} has no response byte at position {position}")]
    UnexpectedContinuation { opcode: u8, position: u32 },

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snapshot version {found} is not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },
}
