//! Emulation of the arcade baseboard that sits on the serial expansion bus.
//!
//! The device answers a small command protocol: identification, a backup
//! store (battery-backed memory holding game settings and records) addressed
//! through a 16-bit offset, and an interrupt line that firmware arms and
//! acknowledges with control commands. Everything is driven one byte at a time
//! through [`triboard_common::ExiDevice`].

mod backup;
mod baseboard;
mod checksum;
mod command;
mod config;
mod error;
mod irq;
mod state;
mod transaction;

pub use backup::BackupStore;
pub use baseboard::AmBaseboard;
pub use checksum::{checksum, frame};
pub use command::Command;
pub use config::BaseboardConfig;
pub use error::{BaseboardError, Result};
pub use irq::{IrqLatch, IRQ_DECAY_POLLS, IRQ_STATUS_PENDING};
pub use state::BaseboardState;
pub use transaction::{Transaction, HEADER_LEN};

/// Bytes clocked out after an `00 00` header, repeating.
pub const IDENTIFICATION: [u8; 4] = [0x06, 0x04, 0x10, 0x00];

/// Acknowledge for the backup commands.
pub const ACK_BACKUP: u8 = 0x01;
/// Acknowledge for every other command, including unrecognized ones.
pub const ACK_CONTROL: u8 = 0x04;
