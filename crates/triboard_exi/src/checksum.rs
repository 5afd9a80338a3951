//! Command checksum.
//!
//! The three command bytes form the top 24 bits of a 32-bit word, which is
//! reduced bit by bit against a sliding polynomial. What is left in the low
//! byte is the checksum the host sends as the fourth command byte.

const POLYNOMIAL: u32 = 0x8D80_0000;

pub fn checksum(command: [u8; 3]) -> u8 {
    let mut word = u32::from_be_bytes([command[0], command[1], command[2], 0]);
    let mut check = POLYNOMIAL;
    let mut bit = 0x8000_0000u32;
    while bit >= 0x100 {
        if word & bit != 0 {
            word ^= check;
        }
        check >>= 1;
        bit >>= 1;
    }
    word as u8
}

/// Append the checksum to a command, producing the 4-byte header a host
/// clocks out at the start of a transaction.
pub fn frame(command: [u8; 3]) -> [u8; 4] {
    [command[0], command[1], command[2], checksum(command)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hardware_transcripts() {
        assert_eq!(checksum([0x01, 0x00, 0x00]), 0xB3);
        assert_eq!(checksum([0xFF, 0x02, 0x01]), 0x63);
        assert_eq!(checksum([0x86, 0x00, 0x00]), 0xF5);
        assert_eq!(checksum([0x87, 0x80, 0x5C]), 0x17);
    }

    #[test]
    fn zero_command_has_zero_checksum() {
        assert_eq!(checksum([0, 0, 0]), 0);
    }

    #[test]
    fn frame_appends_checksum() {
        assert_eq!(frame([0x03, 0x00, 0x00]), [0x03, 0x00, 0x00, 0xCE]);
        assert_eq!(frame([0x01, 0x12, 0x34]), [0x01, 0x12, 0x34, 0x12]);
    }
}
