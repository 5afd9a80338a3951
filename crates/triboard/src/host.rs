use anyhow::{bail, Result};
use triboard_common::{ExiChannel, ExiDevice};
use triboard_exi::{frame, ACK_BACKUP, ACK_CONTROL, HEADER_LEN};

/// What firmware would do on the other end of the bus: typed helpers that
/// turn backup and interrupt operations into framed transactions.
pub struct Host<D> {
    channel: ExiChannel<D>,
}

impl<D> Host<D>
where
    D: ExiDevice,
    D::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(device: D) -> Self {
        Self {
            channel: ExiChannel::new(device),
        }
    }

    pub fn into_device(self) -> D {
        self.channel.into_inner()
    }

    pub fn device(&self) -> &D {
        self.channel.device()
    }

    /// Send `command` followed by `extra` clock bytes, check the acknowledge
    /// byte and return whatever came after it.
    fn command(&mut self, command: [u8; 3], ack: u8, extra: usize) -> Result<Vec<u8>> {
        let mut out = frame(command).to_vec();
        out.resize(HEADER_LEN + 1 + extra, 0x00);
        let response = self.channel.transfer(&out)?;
        if response[HEADER_LEN] != ack {
            bail!(
                "command {:02x} answered {:02x}, expected {:02x}",
                command[0],
                response[HEADER_LEN],
                ack
            );
        }
        Ok(response[HEADER_LEN + 1..].to_vec())
    }

    pub fn identify(&mut self) -> Result<[u8; 4]> {
        let response = self.channel.transfer(&[0x00; 6])?;
        Ok([response[2], response[3], response[4], response[5]])
    }

    pub fn set_offset(&mut self, offset: u16) -> Result<()> {
        let [hi, lo] = offset.to_be_bytes();
        self.command([0x01, hi, lo], ACK_BACKUP, 0)?;
        Ok(())
    }

    /// Write at the store cursor, which then moves on by one.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.command([0x02, value, 0x00], ACK_BACKUP, 0)?;
        Ok(())
    }

    /// Read `len` bytes from the store cursor in a single transaction.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.command([0x03, 0x00, 0x00], ACK_BACKUP, len)
    }

    pub fn write_at(&mut self, offset: u16, bytes: &[u8]) -> Result<()> {
        self.set_offset(offset)?;
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn read_at(&mut self, offset: u16, len: usize) -> Result<Vec<u8>> {
        self.set_offset(offset)?;
        self.read_bytes(len)
    }

    pub fn raise_interrupt(&mut self) -> Result<()> {
        self.command([0xFF, 0x00, 0x00], ACK_CONTROL, 0)?;
        Ok(())
    }

    pub fn clear_interrupt_status(&mut self) -> Result<()> {
        self.command([0xFF, 0x02, 0x01], ACK_CONTROL, 0)?;
        Ok(())
    }

    /// Read the interrupt status register. This acknowledges the interrupt.
    pub fn interrupt_status(&mut self) -> Result<u8> {
        let response = self.command([0x82, 0x00, 0x00], ACK_CONTROL, 2)?;
        Ok(response[1])
    }

    pub fn poll_interrupt(&mut self) -> bool {
        self.channel.poll_interrupt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use triboard_exi::{AmBaseboard, BackupStore, IDENTIFICATION, IRQ_STATUS_PENDING};

    fn host(blob: &[u8]) -> Host<AmBaseboard<Cursor<Vec<u8>>>> {
        Host::new(AmBaseboard::new(BackupStore::from_storage(Cursor::new(
            blob.to_vec(),
        ))))
    }

    #[test]
    fn identifies_the_board() {
        assert_eq!(host(&[]).identify().unwrap(), IDENTIFICATION);
    }

    #[test]
    fn write_then_read_back() {
        let mut h = host(&[]);
        h.write_at(0x0200, b"RANK").unwrap();
        assert_eq!(h.read_at(0x0200, 4).unwrap(), b"RANK".to_vec());
        assert_eq!(h.read_at(0x0201, 2).unwrap(), b"AN".to_vec());
        assert_eq!(h.device().backup_offset(), 0x0201);
    }

    #[test]
    fn interrupt_round_trip() {
        let mut h = host(&[]);
        h.raise_interrupt().unwrap();
        assert!(h.poll_interrupt());
        assert_eq!(h.interrupt_status().unwrap(), IRQ_STATUS_PENDING);
        assert!(!h.poll_interrupt());

        h.clear_interrupt_status().unwrap();
        assert_eq!(h.interrupt_status().unwrap(), 0);
    }
}
