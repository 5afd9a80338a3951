/// Commands understood by the baseboard, keyed by the first header byte.
///
/// Only the backup commands are fully understood. The 0x8x and 0xFF commands
/// are what the firmware uses to talk to the interrupt and network
/// controllers; they are acknowledged so that software keeps running.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `01 hi lo`: set the backup offset and seek the store there.
    SetOffset,
    /// `02 vv xx`: write `vv` at the store cursor.
    BackupWrite,
    /// `03 xx xx`: read one byte from the store cursor per continuation byte.
    BackupRead,
    Unknown05,
    /// Interrupt status read. The status arrives on the second continuation byte.
    IsrRead,
    Unknown83,
    /// Interrupt mask read, two zero bytes.
    ImrRead,
    ImrWrite,
    /// Network controller write. Also arms and clears the interrupt.
    LanCtlWrite,
    Unrecognized(u8),
}

impl Command {
    pub fn from_opcode(opcode: u8) -> Self {
        match opcode {
            0x01 => Command::SetOffset,
            0x02 => Command::BackupWrite,
            0x03 => Command::BackupRead,
            0x05 => Command::Unknown05,
            0x82 => Command::IsrRead,
            0x83 => Command::Unknown83,
            0x86 => Command::ImrRead,
            0x87 => Command::ImrWrite,
            0xFF => Command::LanCtlWrite,
            other => Command::Unrecognized(other),
        }
    }

    pub fn opcode(self) -> u8 {
        match self {
            Command::SetOffset => 0x01,
            Command::BackupWrite => 0x02,
            Command::BackupRead => 0x03,
            Command::Unknown05 => 0x05,
            Command::IsrRead => 0x82,
            Command::Unknown83 => 0x83,
            Command::ImrRead => 0x86,
            Command::ImrWrite => 0x87,
            Command::LanCtlWrite => 0xFF,
            Command::Unrecognized(opcode) => opcode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_decodes_back_to_itself() {
        for opcode in 0..=u8::MAX {
            assert_eq!(Command::from_opcode(opcode).opcode(), opcode);
        }
    }

    #[test]
    fn known_opcodes_are_not_unrecognized() {
        for opcode in [0x01, 0x02, 0x03, 0x05, 0x82, 0x83, 0x86, 0x87, 0xFF] {
            assert!(!matches!(
                Command::from_opcode(opcode),
                Command::Unrecognized(_)
            ));
        }
        assert_eq!(Command::from_opcode(0x99), Command::Unrecognized(0x99));
    }
}
