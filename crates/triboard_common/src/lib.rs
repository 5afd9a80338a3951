//! Contracts between a baseboard device and the expansion bus that drives it.

mod channel;
mod device;

pub use channel::ExiChannel;
pub use device::{ExiDevice, InterruptSink, NullInterruptSink, Snapshot};
