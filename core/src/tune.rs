//! The interface a loaded tune presents to the engine. Parsing PSID/RSID
//! files themselves is out of scope here; this crate only consumes the
//! already-decoded fields.

use crate::config::SidModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSpeed {
    Unknown,
    Pal,
    Ntsc,
    Either,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compatibility {
    C64,
    Psid,
    R64,
    Basic,
}

/// A tune ready to be placed into C64 memory and driven by the relocator.
pub trait Tune {
    fn load_address(&self) -> u16;
    fn init_address(&self) -> u16;
    fn play_address(&self) -> u16;

    fn song_count(&self) -> u32;
    fn current_song(&self) -> u32;
    fn set_current_song(&mut self, song: u32);

    /// Vertical blank interval divisor hint per subtune (CIA-driven vs
    /// raster-driven playback), expressed in Hz; 0 means "use default".
    fn song_speed(&self, song: u32) -> u32;

    fn clock_speed(&self) -> ClockSpeed;
    fn compatibility(&self) -> Compatibility;

    fn sid_model(&self, chip_index: usize) -> Option<SidModel>;
    fn second_sid_address(&self) -> Option<u16>;
    fn third_sid_address(&self) -> Option<u16>;

    /// Non-zero only for musically relocatable (RSID) tunes: the page the
    /// driver stub may use, and how many contiguous pages are free.
    fn relocation_start_page(&self) -> u8;
    fn relocation_pages(&self) -> u8;

    fn data(&self) -> &[u8];

    /// Copies `data()` into the addresses starting at `load_address()`.
    fn place_in_memory(&self, mem: &mut [u8]) {
        let start = self.load_address() as usize;
        let bytes = self.data();
        let end = (start + bytes.len()).min(mem.len());
        let copy_len = end.saturating_sub(start);
        if copy_len > 0 {
            mem[start..start + copy_len].copy_from_slice(&bytes[..copy_len]);
        }
    }
}
