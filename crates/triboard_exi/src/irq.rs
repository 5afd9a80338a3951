/// Polls after which an armed interrupt drops on its own.
pub const IRQ_DECAY_POLLS: u32 = 4;

/// Status reported once the interrupt fires.
pub const IRQ_STATUS_PENDING: u8 = 0x02;

/// Interrupt line and status register.
///
/// The line is level-like from the host's point of view but decays: after
/// `IRQ_DECAY_POLLS` polls have observed it, the next one finds it clear.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IrqLatch {
    pub(crate) have_irq: bool,
    pub(crate) timer: u32,
    pub(crate) status: u8,
}

impl IrqLatch {
    pub(crate) fn arm(&mut self) {
        self.have_irq = true;
        self.timer = 0;
        self.status = IRQ_STATUS_PENDING;
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = 0;
    }

    /// Status read. Reading it acknowledges the interrupt.
    pub(crate) fn acknowledge(&mut self) -> u8 {
        self.have_irq = false;
        self.status
    }

    /// Report the line as it is before this poll decays it.
    pub(crate) fn poll(&mut self) -> bool {
        if !self.have_irq {
            return false;
        }
        self.timer = self.timer.saturating_add(1);
        if self.timer > IRQ_DECAY_POLLS {
            self.have_irq = false;
        }
        true
    }

    pub fn is_set(&self) -> bool {
        self.have_irq
    }

    pub fn status(&self) -> u8 {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_line_decays_after_polls() {
        let mut irq = IrqLatch::default();
        assert!(!irq.poll());

        irq.arm();
        assert_eq!(irq.status(), IRQ_STATUS_PENDING);
        for _ in 0..IRQ_DECAY_POLLS {
            assert!(irq.poll());
        }
        // Fifth poll still sees the line, then it is gone.
        assert!(irq.poll());
        assert!(!irq.is_set());
        assert!(!irq.poll());
    }

    #[test]
    fn rearming_restarts_decay() {
        let mut irq = IrqLatch::default();
        irq.arm();
        irq.poll();
        irq.poll();
        irq.arm();
        assert_eq!(irq.timer, 0);
        for _ in 0..=IRQ_DECAY_POLLS {
            assert!(irq.poll());
        }
        assert!(!irq.poll());
    }

    #[test]
    fn acknowledge_returns_status_and_drops_line() {
        let mut irq = IrqLatch::default();
        irq.arm();
        assert_eq!(irq.acknowledge(), IRQ_STATUS_PENDING);
        assert!(!irq.is_set());

        irq.arm();
        irq.clear_status();
        assert!(irq.is_set());
        assert_eq!(irq.acknowledge(), 0);
    }
}
