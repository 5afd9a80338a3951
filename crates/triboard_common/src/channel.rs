use crate::ExiDevice;

/// Minimal expansion bus controller for a single device.
///
/// Each [`ExiChannel::transfer`] is one transaction: chip-select is asserted,
/// the bytes are clocked out in order, and chip-select is released again even
/// if the device reports an error halfway through.
pub struct ExiChannel<D> {
    device: D,
}

impl<D: ExiDevice> ExiChannel<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn transfer(&mut self, out: &[u8]) -> Result<Vec<u8>, D::Error> {
        self.device.set_cs(true);
        let result = self.clock_bytes(out);
        self.device.set_cs(false);
        result
    }

    fn clock_bytes(&mut self, out: &[u8]) -> Result<Vec<u8>, D::Error> {
        let mut response = Vec::with_capacity(out.len());
        for &byte in out {
            let received = self.device.transfer_byte(byte)?;
            log::trace!("exi > {:02x} < {:02x}", byte, received);
            response.push(received);
        }
        Ok(response)
    }

    pub fn poll_interrupt(&mut self) -> bool {
        self.device.is_interrupt_set()
    }

    pub fn is_present(&self) -> bool {
        self.device.is_present()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterruptSink;

    /// Echoes the byte it receives, XORed with the transaction position.
    #[derive(Default)]
    struct EchoDevice {
        position: u8,
        selected: bool,
        cs_edges: Vec<bool>,
        fail_at: Option<u8>,
    }

    impl ExiDevice for EchoDevice {
        type Error = u8;

        fn set_cs(&mut self, asserted: bool) {
            self.selected = asserted;
            self.cs_edges.push(asserted);
            if asserted {
                self.position = 0;
            }
        }

        fn transfer_byte(&mut self, byte: u8) -> Result<u8, u8> {
            assert!(self.selected);
            if self.fail_at == Some(self.position) {
                return Err(self.position);
            }
            let out = byte ^ self.position;
            self.position += 1;
            Ok(out)
        }

        fn is_interrupt_set(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn transfer_frames_bytes_with_chip_select() {
        let mut channel = ExiChannel::new(EchoDevice::default());
        let response = channel.transfer(&[0x10, 0x10, 0x10]).unwrap();
        assert_eq!(response, vec![0x10, 0x11, 0x12]);
        assert_eq!(channel.device().cs_edges, vec![true, false]);

        // Position restarts with the next transaction.
        let response = channel.transfer(&[0x00]).unwrap();
        assert_eq!(response, vec![0x00]);
        assert!(channel.is_present());
    }

    #[test]
    fn transfer_releases_chip_select_on_error() {
        let mut channel = ExiChannel::new(EchoDevice {
            fail_at: Some(1),
            ..Default::default()
        });
        assert_eq!(channel.transfer(&[0, 0, 0]), Err(1));
        assert!(!channel.device().selected);
    }

    #[test]
    fn closures_are_interrupt_sinks() {
        let mut count = 0;
        {
            let mut sink = || count += 1;
            sink.update_interrupts();
            sink.update_interrupts();
        }
        assert_eq!(count, 2);
    }
}
