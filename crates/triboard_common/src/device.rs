/// A device attached to one chip-select line of the expansion bus.
///
/// The bus is full duplex: every clocked byte sent to the device produces
/// exactly one byte back. There is no framing other than chip-select, so the
/// device tracks its own position within a transaction.
pub trait ExiDevice {
    type Error;

    /// Chip-select edge. Asserting it starts a new transaction.
    fn set_cs(&mut self, asserted: bool);

    /// Whether something answers on this slot.
    fn is_present(&self) -> bool {
        true
    }

    /// Exchange one byte with the device.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Polled by the interrupt controller. May mutate device state, since
    /// some devices drop their interrupt line after being observed.
    fn is_interrupt_set(&mut self) -> bool;
}

/// Receives a notification whenever a device changes its interrupt state, so
/// the aggregated interrupt status can be recomputed.
pub trait InterruptSink {
    fn update_interrupts(&mut self);
}

impl<F: FnMut()> InterruptSink for F {
    fn update_interrupts(&mut self) {
        (*self)()
    }
}

/// Sink for devices that are not wired to an interrupt controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInterruptSink;

impl InterruptSink for NullInterruptSink {
    fn update_interrupts(&mut self) {}
}

/// Save/restore of device state for savestates.
pub trait Snapshot {
    type State;
    type Error;

    fn save_state(&mut self) -> Result<Self::State, Self::Error>;
    fn load_state(&mut self, state: &Self::State) -> Result<(), Self::Error>;
}
