use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// All failure modes the engine can surface. Every variant renders to a
/// human-readable string; the core performs no logging of its own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("tune rejected: {0}")]
    TuneRejected(String),

    #[error("ROM image rejected: {0}")]
    RomInvalid(String),

    #[error("CPU halted on illegal opcode ${opcode:02X} at ${pc:04X}")]
    Halt { opcode: u8, pc: u16 },
}
