/// Identifies who is accessing the bus (for CPU/DMA arbitration).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusMaster {
    Cpu,
    /// The VIC-II, stealing cycles for sprite/character DMA.
    VicDma,
}

/// Generic bus interface supporting halt/arbitration (RDY/BA).
pub trait Bus {
    type Address: Copy + Into<u64>;
    type Data;

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// True if `master` must pause before its next bus cycle (RDY low for the
    /// CPU, held BA for DMA-capable chips).
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Generic interrupt query.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

#[derive(Default, Clone, Copy, Debug)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
}
