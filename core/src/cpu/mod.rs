pub mod mos6510;
pub mod state;

use crate::core::bus::InterruptState;
use crate::core::component::BusMasterComponent;
use state::CpuStateTrait;

/// Behavior common to the CPUs this engine can host. Currently only the
/// 6510, but kept as a trait so the scheduler doesn't need to know the
/// concrete type.
pub trait Cpu: BusMasterComponent + CpuStateTrait {
    fn reset(&mut self);
    fn trigger_irq(&mut self);
    fn clear_irq(&mut self);
    fn trigger_nmi(&mut self);
    /// Latches a RST edge; recognized on the next Fetch-state poll, same as
    /// `trigger_nmi`, rather than mutating registers synchronously. Lets a
    /// caller assert a reset line from outside the CPU's own tick without
    /// racing an instruction already in flight.
    fn trigger_rst(&mut self);
    fn set_rdy(&mut self, ready: bool);
    fn is_sleeping(&self) -> bool;
}
