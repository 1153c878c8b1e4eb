//! Relocatable driver stub: a small block of 6510 code, written into a
//! free memory page, that calls a tune's init routine once and then its
//! play routine once per frame from a CIA timer or raster IRQ.
//!
//! Mirrors the on-load sequence real players use: pick a free page,
//! assemble the stub there, hook the IRQ vector, prime the stack, and let
//! the CPU fall into `init` before the first IRQ fires.

use crate::tune::{ClockSpeed, Tune};

/// Default free-page search window when a tune doesn't name its own
/// relocation range: just above the BASIC/Kernal work area most tunes
/// leave untouched at $02A7.
const DEFAULT_RELOC_PAGE: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqSource {
    /// CIA 1 timer A underflow, the usual PSID playback clock.
    CiaTimer,
    /// VIC-II raster compare, used by tunes that want screen-synced calls.
    Raster,
}

pub struct DriverStub {
    pub base_address: u16,
    pub irq_source: IrqSource,
    pub init_address: u16,
    pub play_address: u16,
    /// Assembled stub bytes, ready to be copied to `base_address`.
    pub code: Vec<u8>,
    /// Offset within `code` of the play-call entry point (what the IRQ
    /// vector should point to after the one-time init has run).
    pub play_entry_offset: u16,
    /// Offset of a tight `JMP *` spin loop the CPU parks in between IRQs.
    pub idle_offset: u16,
    /// Offset of a JAM/KIL byte used as a stack-sentinel return address:
    /// when `init` is called directly (PC set past the stub) with this
    /// address pushed as its return address, `init`'s closing RTS lands
    /// here and halts the CPU, which the caller reads as "init is done".
    pub trap_offset: u16,
}

impl DriverStub {
    /// Builds the stub for `tune`, choosing a relocation page either from
    /// the tune's own hint (RSID) or the default free area (PSID).
    pub fn build(tune: &dyn Tune, irq_source: IrqSource) -> DriverStub {
        let page = if tune.relocation_pages() > 0 {
            tune.relocation_start_page()
        } else {
            DEFAULT_RELOC_PAGE
        };
        let base_address = (page as u16) << 8;

        let init = tune.init_address();
        let play = tune.play_address();

        // Layout: [0] JSR play ; [3] RTI ; [4] idle: JMP idle ; [7] trap:
        // JAM. `init` is entered directly by setting the CPU's PC rather
        // than through the stub (the caller primes the stack with
        // `trap_address()` as init's return address first), so the stub
        // itself only ever needs to carry the play/idle/trap path; the IRQ
        // vector is hooked to offset 0 so every timer/raster interrupt
        // re-enters the play call.
        let mut code = Vec::with_capacity(10);
        let play_entry_offset = code.len() as u16;
        code.push(0x20); // JSR
        code.push((play & 0xFF) as u8);
        code.push((play >> 8) as u8);
        code.push(0x40); // RTI

        let idle_offset = code.len() as u16;
        let idle_address = base_address + idle_offset;
        code.push(0x4C); // JMP
        code.push((idle_address & 0xFF) as u8);
        code.push((idle_address >> 8) as u8);

        let trap_offset = code.len() as u16;
        code.push(0x02); // JAM/KIL

        DriverStub {
            base_address,
            irq_source,
            init_address: init,
            play_address: play,
            code,
            play_entry_offset,
            idle_offset,
            trap_offset,
        }
    }

    pub fn play_vector(&self) -> u16 {
        self.base_address + self.play_entry_offset
    }

    pub fn idle_address(&self) -> u16 {
        self.base_address + self.idle_offset
    }

    pub fn trap_address(&self) -> u16 {
        self.base_address + self.trap_offset
    }

    /// Writes the stub into `mem` at `base_address`.
    pub fn install(&self, mem: &mut [u8]) {
        let start = self.base_address as usize;
        let end = start + self.code.len();
        if end <= mem.len() {
            mem[start..end].copy_from_slice(&self.code);
        }
    }

    /// Hooks the hardware IRQ vector at $FFFE/$FFFF to point straight at
    /// the play-call entry (bypassing the Kernal's own IRQ chain, which a
    /// standalone player doesn't need).
    pub fn install_irq_vector(&self, mem: &mut [u8]) {
        let vector = self.play_vector();
        mem[0xFFFE] = (vector & 0xFF) as u8;
        mem[0xFFFF] = (vector >> 8) as u8;
    }

    /// Picks a CIA timer A latch value that calls `play` at the tune's
    /// requested rate, given the host's effective system clock.
    pub fn cia_timer_latch(clock_speed: ClockSpeed, cycles_per_second: u32, calls_per_second: u32) -> u16 {
        let _ = clock_speed;
        let calls = calls_per_second.max(1);
        let period = cycles_per_second / calls;
        period.min(0xFFFF) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tune::Compatibility;

    struct FakeTune {
        data: Vec<u8>,
    }

    impl Tune for FakeTune {
        fn load_address(&self) -> u16 {
            0x1000
        }
        fn init_address(&self) -> u16 {
            0x1000
        }
        fn play_address(&self) -> u16 {
            0x1003
        }
        fn song_count(&self) -> u32 {
            1
        }
        fn current_song(&self) -> u32 {
            0
        }
        fn set_current_song(&mut self, _song: u32) {}
        fn song_speed(&self, _song: u32) -> u32 {
            50
        }
        fn clock_speed(&self) -> ClockSpeed {
            ClockSpeed::Pal
        }
        fn compatibility(&self) -> Compatibility {
            Compatibility::C64
        }
        fn sid_model(&self, _chip_index: usize) -> Option<crate::config::SidModel> {
            None
        }
        fn second_sid_address(&self) -> Option<u16> {
            None
        }
        fn third_sid_address(&self) -> Option<u16> {
            None
        }
        fn relocation_start_page(&self) -> u8 {
            0
        }
        fn relocation_pages(&self) -> u8 {
            0
        }
        fn data(&self) -> &[u8] {
            &self.data
        }
    }

    #[test]
    fn stub_uses_default_page_when_tune_has_no_relocation_hint() {
        let tune = FakeTune { data: vec![] };
        let stub = DriverStub::build(&tune, IrqSource::CiaTimer);
        assert_eq!(stub.base_address, 0x0200);
    }

    #[test]
    fn play_vector_is_the_stub_s_entry_point() {
        let tune = FakeTune { data: vec![] };
        let stub = DriverStub::build(&tune, IrqSource::CiaTimer);
        assert_eq!(stub.play_vector(), stub.base_address);
    }

    #[test]
    fn idle_and_trap_offsets_follow_the_shortened_play_rti_prologue() {
        let tune = FakeTune { data: vec![] };
        let stub = DriverStub::build(&tune, IrqSource::CiaTimer);
        assert_eq!(stub.play_entry_offset, 0);
        assert_eq!(stub.idle_offset, 4);
        assert_eq!(stub.trap_offset, 7);
    }

    #[test]
    fn cia_latch_targets_requested_call_rate() {
        let latch = DriverStub::cia_timer_latch(ClockSpeed::Pal, 985_248, 50);
        assert_eq!(latch, 19704);
    }
}
