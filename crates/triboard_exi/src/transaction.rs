/// Length of the command header: three command bytes and a checksum.
pub const HEADER_LEN: usize = 4;

/// State that lives for one chip-select assertion.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transaction {
    /// Bytes exchanged since chip-select.
    pub(crate) position: u32,
    /// Header bytes. `command[i]` is only meaningful once `position > i`.
    pub(crate) command: [u8; HEADER_LEN],
}

impl Transaction {
    pub(crate) fn restart(&mut self) {
        self.position = 0;
    }

    /// Latch `byte` into the header if the header is still being received.
    pub(crate) fn latch(&mut self, byte: u8) {
        if let Some(slot) = self.command.get_mut(self.position as usize) {
            *slot = byte;
        }
    }

    pub(crate) fn advance(&mut self) {
        self.position = self.position.saturating_add(1);
    }

    /// `00 00` is not a command: it asks the device to clock out its ID.
    pub(crate) fn is_identification(&self) -> bool {
        self.position >= 2 && self.command[0] == 0 && self.command[1] == 0
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn command(&self) -> [u8; HEADER_LEN] {
        self.command
    }
}
