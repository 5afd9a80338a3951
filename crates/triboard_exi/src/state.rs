use serde::{Deserialize, Serialize};

use crate::transaction::HEADER_LEN;
use crate::{BaseboardError, Result};

/// Savestate of an [`AmBaseboard`](crate::AmBaseboard).
///
/// Field order is the serialization order. The first three fields are the
/// transaction; the rest is device state that has to survive a restore for
/// a backup read or a pending interrupt to resume where it left off.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseboardState {
    pub version: u32,
    pub position: u32,
    pub have_irq: bool,
    pub command: [u8; HEADER_LEN],
    pub backup_offset: u16,
    pub irq_timer: u32,
    pub irq_status: u8,
    /// Store cursor, which drifts from `backup_offset` as bytes are read
    /// and written.
    pub backup_cursor: u64,
}

impl BaseboardState {
    pub const VERSION: u32 = 1;

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let state: Self = serde_json::from_slice(bytes)?;
        if state.version != Self::VERSION {
            return Err(BaseboardError::SnapshotVersion {
                found: state.version,
                expected: Self::VERSION,
            });
        }
        Ok(state)
    }
}
