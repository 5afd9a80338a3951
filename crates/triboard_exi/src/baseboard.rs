use std::fs::File;
use std::io::{Read, Seek, Write};

use triboard_common::{ExiDevice, InterruptSink, NullInterruptSink, Snapshot};

use crate::backup::BackupStore;
use crate::checksum::checksum;
use crate::command::Command;
use crate::config::BaseboardConfig;
use crate::irq::IrqLatch;
use crate::state::BaseboardState;
use crate::transaction::Transaction;
use crate::{BaseboardError, Result, ACK_BACKUP, ACK_CONTROL, IDENTIFICATION};

/// Response while the header is still being clocked in.
const IDLE: u8 = 0xFF;

/// The baseboard as seen from the expansion bus.
///
/// Transaction state (position and header) is reset by chip-select. The
/// backup offset and interrupt latch belong to the device and carry over
/// from one transaction to the next.
pub struct AmBaseboard<S: Read + Write + Seek = File> {
    transaction: Transaction,
    backup_offset: u16,
    irq: IrqLatch,
    store: BackupStore<S>,
    interrupts: Box<dyn InterruptSink>,
}

impl AmBaseboard<File> {
    /// Open (or create) the session's backup store and attach a device to it.
    pub fn open(config: &BaseboardConfig) -> Result<Self> {
        let store = BackupStore::open(config.backup_path())?;
        Ok(Self::new(store))
    }
}

impl<S: Read + Write + Seek> AmBaseboard<S> {
    pub fn new(store: BackupStore<S>) -> Self {
        Self {
            transaction: Transaction::default(),
            backup_offset: 0,
            irq: IrqLatch::default(),
            store,
            interrupts: Box::new(NullInterruptSink),
        }
    }

    /// Notify `sink` whenever the firmware changes the interrupt state.
    pub fn with_interrupt_sink(mut self, sink: impl InterruptSink + 'static) -> Self {
        self.interrupts = Box::new(sink);
        self
    }

    pub fn position(&self) -> u32 {
        self.transaction.position()
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn backup_offset(&self) -> u16 {
        self.backup_offset
    }

    pub fn irq(&self) -> &IrqLatch {
        &self.irq
    }

    pub fn store(&self) -> &BackupStore<S> {
        &self.store
    }

    /// Tear the device down, flushing the backup store.
    pub fn close(self) -> Result<S> {
        self.store.close()
    }

    fn respond(&mut self, byte: u8) -> Result<u8> {
        let position = self.transaction.position;
        self.transaction.latch(byte);

        if self.transaction.is_identification() {
            let index = (position as usize - 2) % IDENTIFICATION.len();
            return Ok(IDENTIFICATION[index]);
        }

        match position {
            0..=2 => Ok(IDLE),
            3 => {
                self.verify_checksum();
                Ok(IDLE)
            }
            4 => self.dispatch(),
            _ => self.continuation(position, byte),
        }
    }

    /// Firmware is lenient here: a bad checksum is only worth a log line.
    fn verify_checksum(&self) {
        let [a, b, c, sent] = self.transaction.command;
        let expected = checksum([a, b, c]);
        if sent != expected {
            log::debug!(
                "baseboard checksum mismatch: sent {:02x}, expected {:02x}",
                sent,
                expected
            );
        }
    }

    fn dispatch(&mut self) -> Result<u8> {
        let [opcode, arg0, arg1, _] = self.transaction.command;
        match Command::from_opcode(opcode) {
            Command::SetOffset => {
                self.backup_offset = u16::from_be_bytes([arg0, arg1]);
                log::debug!("baseboard backup offset {:04x}", self.backup_offset);
                self.store.seek(self.backup_offset)?;
                Ok(ACK_BACKUP)
            }
            Command::BackupWrite => {
                log::debug!(
                    "baseboard backup write {:04x} <- {:02x}",
                    self.backup_offset,
                    arg0
                );
                self.store.write_byte(arg0)?;
                self.store.flush()?;
                Ok(ACK_BACKUP)
            }
            Command::BackupRead => {
                log::debug!("baseboard backup read {:04x}", self.backup_offset);
                Ok(ACK_BACKUP)
            }
            Command::Unknown05 => Ok(ACK_CONTROL),
            Command::IsrRead | Command::Unknown83 | Command::ImrRead | Command::ImrWrite => {
                log::warn!("baseboard command {:02x}: {:02x} {:02x}", opcode, arg0, arg1);
                Ok(ACK_CONTROL)
            }
            Command::LanCtlWrite => {
                log::warn!("baseboard command {:02x}: {:02x} {:02x}", opcode, arg0, arg1);
                match (arg0, arg1) {
                    (0x00, 0x00) => self.irq.arm(),
                    (0x02, 0x01) => self.irq.clear_status(),
                    _ => {}
                }
                self.interrupts.update_interrupts();
                Ok(ACK_CONTROL)
            }
            Command::Unrecognized(_) => {
                log::error!(
                    "baseboard unrecognized command {:02x} {:02x} {:02x}",
                    opcode,
                    arg0,
                    arg1
                );
                Ok(ACK_CONTROL)
            }
        }
    }

    fn continuation(&mut self, position: u32, byte: u8) -> Result<u8> {
        let command = Command::from_opcode(self.transaction.command[0]);
        match command {
            // Past the end of the store the read fails and the bus hands back
            // whatever the host clocked in.
            Command::BackupRead => Ok(self.store.read_byte()?.unwrap_or(byte)),
            Command::IsrRead if position == 6 => Ok(self.irq.acknowledge()),
            Command::IsrRead | Command::ImrRead => Ok(0x00),
            _ => {
                log::error!(
                    "baseboard command {:02x} clocked past its end (position {})",
                    command.opcode(),
                    position
                );
                Err(BaseboardError::UnexpectedContinuation {
                    opcode: command.opcode(),
                    position,
                })
            }
        }
    }
}

impl<S: Read + Write + Seek> ExiDevice for AmBaseboard<S> {
    type Error = BaseboardError;

    fn set_cs(&mut self, asserted: bool) {
        log::debug!("baseboard chip select {}", asserted);
        if asserted {
            self.transaction.restart();
        }
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8> {
        log::debug!("baseboard > {:02x}", byte);
        let response = self.respond(byte);
        if let Ok(out) = response {
            log::debug!("baseboard < {:02x}", out);
        }
        self.transaction.advance();
        response
    }

    fn is_interrupt_set(&mut self) -> bool {
        let set = self.irq.poll();
        if set {
            log::debug!("baseboard irq asserted");
        }
        set
    }
}

impl<S: Read + Write + Seek> Snapshot for AmBaseboard<S> {
    type State = BaseboardState;
    type Error = BaseboardError;

    fn save_state(&mut self) -> Result<BaseboardState> {
        Ok(BaseboardState {
            version: BaseboardState::VERSION,
            position: self.transaction.position,
            have_irq: self.irq.have_irq,
            command: self.transaction.command,
            backup_offset: self.backup_offset,
            irq_timer: self.irq.timer,
            irq_status: self.irq.status,
            backup_cursor: self.store.cursor()?,
        })
    }

    fn load_state(&mut self, state: &BaseboardState) -> Result<()> {
        if state.version != BaseboardState::VERSION {
            return Err(BaseboardError::SnapshotVersion {
                found: state.version,
                expected: BaseboardState::VERSION,
            });
        }
        self.store.set_cursor(state.backup_cursor)?;
        self.transaction = Transaction {
            position: state.position,
            command: state.command,
        };
        self.backup_offset = state.backup_offset;
        self.irq = IrqLatch {
            have_irq: state.have_irq,
            timer: state.irq_timer,
            status: state.irq_status,
        };
        Ok(())
    }
}
