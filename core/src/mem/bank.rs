//! Memory bank abstraction. Replaces the virtual-inheritance `Bank` base class
//! of the original engine with a tagged sum type: `peek`/`poke` dispatch
//! through a match instead of a vtable, and every variant is plain data.

pub const RAM_SIZE: usize = 0x10000;

/// One of the sixteen 4 KiB CPU windows or 256-byte I/O chips the PLA can
/// route an address into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankId {
    Ram,
    KernalRom,
    BasicRom,
    CharRom,
    Io,
    Disconnected,
}

/// A passive 256-byte-resolution region. Writes to ROM are no-ops; reads from
/// a disconnected region return the last byte driven on the floating bus.
pub struct Bank {
    pub id: BankId,
    data: Vec<u8>,
    writable: bool,
}

impl Bank {
    pub fn ram(size: usize) -> Self {
        Bank { id: BankId::Ram, data: vec![0; size], writable: true }
    }

    pub fn rom(id: BankId, bytes: Vec<u8>) -> Self {
        Bank { id, data: bytes, writable: false }
    }

    pub fn disconnected() -> Self {
        Bank { id: BankId::Disconnected, data: vec![0xFF; 1], writable: false }
    }

    pub fn peek(&self, offset: usize) -> u8 {
        if self.data.is_empty() {
            0xFF
        } else {
            self.data[offset % self.data.len()]
        }
    }

    pub fn poke(&mut self, offset: usize, value: u8) {
        if self.writable && !self.data.is_empty() {
            let len = self.data.len();
            self.data[offset % len] = value;
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
