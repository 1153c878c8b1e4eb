//! Oscillator: 24-bit phase accumulator driving the 4 waveform generators
//! (triangle, sawtooth, pulse, noise) plus ring modulation and hard sync.

/// Which waveform-select bits are currently asserted, passed down to the
/// oscillator so it can apply the combined-waveform effects on the shift
/// register at the point the LFSR actually clocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaveSelect {
    pub triangle: bool,
    pub sawtooth: bool,
    pub pulse: bool,
    pub noise: bool,
}

impl WaveSelect {
    fn selected_count(&self) -> u32 {
        self.triangle as u32 + self.sawtooth as u32 + self.pulse as u32 + self.noise as u32
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Waveform {
    pub accumulator: u32,
    pub shift_register: u32,
    /// Cycles since the LFSR last clocked. The real shift register is built
    /// from dynamic logic: left alone (oscillator frequency at or near 0, or
    /// the test bit held) for long enough, it decays towards all-1s rather
    /// than holding its last value forever.
    lfsr_idle: u32,
}

const ACC_MASK: u32 = 0x00FF_FFFF;
/// Cycles of no LFSR clocking before the shift register is considered to
/// have decayed to its all-1s rest state. Not a measured figure -- real
/// decay is gradual and process-dependent -- but "on the order of a second
/// of silence" is the documented ballpark, which this approximates.
const LFSR_IDLE_DECAY_CYCLES: u32 = 1_000_000;

impl Waveform {
    pub fn new() -> Self {
        Waveform {
            accumulator: 0,
            shift_register: 0x7FFFFF,
            lfsr_idle: 0,
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.shift_register = 0x7FFFFF;
        self.lfsr_idle = 0;
    }

    /// Advances the accumulator by `frequency` (the 16-bit FREQ register
    /// value) for one cycle, honoring hard sync from `sync_source`'s MSB
    /// transition and clocking the noise LFSR on every accumulator bit-19
    /// rising edge. `select`/`pulse_width`/`ring_mod`/`ring_source_msb`
    /// describe the voice's current waveform selection, needed to apply the
    /// combined-waveform write-back to the shift register right as it
    /// clocks (see `corrupt_from_combined`).
    pub fn clock(
        &mut self,
        frequency: u16,
        test: bool,
        sync_enabled: bool,
        sync_source_msb_rising: bool,
        select: WaveSelect,
        pulse_width: u16,
        ring_mod: bool,
        ring_source_msb: bool,
    ) {
        if test {
            self.accumulator = 0;
            return;
        }
        let prev_bit19 = self.accumulator & (1 << 19) != 0;
        if sync_enabled && sync_source_msb_rising {
            self.accumulator = 0;
        } else {
            self.accumulator = (self.accumulator + frequency as u32) & ACC_MASK;
        }
        let bit19 = self.accumulator & (1 << 19) != 0;
        if bit19 && !prev_bit19 {
            self.clock_lfsr();
            self.lfsr_idle = 0;
            if select.noise && select.selected_count() > 1 {
                self.corrupt_from_combined(select, pulse_width, test, ring_mod, ring_source_msb);
            }
        } else {
            self.lfsr_idle += 1;
            if self.lfsr_idle >= LFSR_IDLE_DECAY_CYCLES {
                self.shift_register = 0x7FFFFF;
                self.lfsr_idle = 0;
            }
        }
    }

    fn clock_lfsr(&mut self) {
        let bit22 = (self.shift_register >> 22) & 1;
        let bit17 = (self.shift_register >> 17) & 1;
        let feedback = bit22 ^ bit17;
        self.shift_register = ((self.shift_register << 1) | feedback) & 0x7FFFFF;
    }

    /// Maps a noise output bit (4..=11) to the shift-register bit it reads
    /// from, per `noise()`'s wiring below.
    fn noise_source_bit(output_bit: u32) -> Option<u32> {
        match output_bit {
            11 => Some(20),
            10 => Some(18),
            9 => Some(14),
            8 => Some(11),
            7 => Some(9),
            6 => Some(5),
            5 => Some(2),
            4 => Some(0),
            _ => None,
        }
    }

    /// On real hardware, combining the noise waveform with another waveform
    /// pulls the shared DAC bits down through paths that feed back into the
    /// shift register, permanently clearing whichever noise bits the
    /// combination forces to 0. Sustained use of a noise+X combination is
    /// the documented cause of SID noise "locking up" to a fixed value.
    fn corrupt_from_combined(&mut self, select: WaveSelect, pulse_width: u16, test: bool, ring_mod: bool, ring_source_msb: bool) {
        let noise_val = self.noise();
        let mut combined = noise_val;
        if select.triangle {
            combined &= smear(self.triangle(ring_mod, ring_source_msb));
        }
        if select.sawtooth {
            combined &= smear(self.sawtooth());
        }
        if select.pulse {
            combined &= smear(self.pulse(pulse_width, test));
        }
        let forced_zero = noise_val & !combined;
        for output_bit in 4..=11u32 {
            if forced_zero & (1 << output_bit) != 0 {
                if let Some(source_bit) = Self::noise_source_bit(output_bit) {
                    self.shift_register &= !(1 << source_bit);
                }
            }
        }
    }

    pub fn msb_rising(&self, prev_accumulator: u32) -> bool {
        (self.accumulator & 0x0080_0000 != 0) && (prev_accumulator & 0x0080_0000 == 0)
    }

    pub fn triangle(&self, ring_mod: bool, ring_source_msb: bool) -> u16 {
        let msb = self.accumulator & 0x0080_0000 != 0;
        let inverted = msb ^ (ring_mod && ring_source_msb);
        let top = (self.accumulator >> 11) & 0x0FFF;
        let tri = if inverted { top ^ 0x0FFF } else { top };
        (tri << 1) as u16 & 0x0FFF
    }

    pub fn sawtooth(&self) -> u16 {
        ((self.accumulator >> 12) & 0x0FFF) as u16
    }

    pub fn pulse(&self, pulse_width: u16, test: bool) -> u16 {
        if test {
            return 0x0FFF;
        }
        let phase = (self.accumulator >> 12) & 0x0FFF;
        if phase >= pulse_width as u32 {
            0x0FFF
        } else {
            0x0000
        }
    }

    pub fn noise(&self) -> u16 {
        let sr = self.shift_register;
        (((sr >> 20) & 1) << 11
            | ((sr >> 18) & 1) << 10
            | ((sr >> 14) & 1) << 9
            | ((sr >> 11) & 1) << 8
            | ((sr >> 9) & 1) << 7
            | ((sr >> 5) & 1) << 6
            | ((sr >> 2) & 1) << 5
            | ((sr >> 0) & 1) << 4) as u16
    }

    /// Combined waveform output. Real chips don't add or simply AND the
    /// independently-computed waveforms: neighbouring bits of the shared DAC
    /// interact, and a bit only survives in the combination if it and the
    /// bit above it both agree across every selected waveform. `smear`
    /// applies that bit-and-its-neighbour rule per waveform before the
    /// generators are ANDed together, which reproduces the characteristic
    /// "combined waveforms are dimmer than any single one, biased low" shape
    /// without a flat AND of full-resolution values.
    pub fn combined(&self, triangle: bool, sawtooth: bool, pulse: bool, noise: bool, pulse_width: u16, test: bool, ring_mod: bool, ring_source_msb: bool) -> u16 {
        let mut result = 0x0FFFu16;
        let mut any = false;
        if triangle {
            result &= smear(self.triangle(ring_mod, ring_source_msb));
            any = true;
        }
        if sawtooth {
            result &= smear(self.sawtooth());
            any = true;
        }
        if pulse {
            result &= smear(self.pulse(pulse_width, test));
            any = true;
        }
        if noise {
            result &= smear(self.noise());
            any = true;
        }
        if any { result } else { 0 }
    }
}

/// ANDs each bit of a 12-bit DAC value with the bit above it (bit 11 has no
/// bit above, so it always clears). Models the digital crosstalk between
/// adjacent DAC lines that the real combined-waveform outputs exhibit.
fn smear(value: u16) -> u16 {
    (value & (value >> 1)) & 0x0FFF
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(triangle: bool, sawtooth: bool, pulse: bool, noise: bool) -> WaveSelect {
        WaveSelect { triangle, sawtooth, pulse, noise }
    }

    #[test]
    fn single_waveform_combined_call_is_untouched_by_smearing_logic() {
        // combined() is only ever invoked by Voice for 2+ selected waveforms,
        // but confirm the smear of a full-scale sawtooth ramp only ever
        // clears the top bit (1's run length drops by one per smear).
        let mut wf = Waveform::new();
        wf.accumulator = 0x0FFF << 12; // sawtooth() == 0x0FFF
        assert_eq!(smear(wf.sawtooth()), 0x07FF);
    }

    #[test]
    fn combined_triangle_sawtooth_is_never_brighter_than_either_alone() {
        let mut wf = Waveform::new();
        wf.accumulator = 0x0055_5500;
        let tri = wf.triangle(false, false);
        let saw = wf.sawtooth();
        let combined = wf.combined(true, true, false, false, 0, false, false, false);
        assert!(combined <= tri);
        assert!(combined <= saw);
    }

    #[test]
    fn sustained_noise_pulse_combination_corrupts_the_shift_register() {
        let mut wf = Waveform::new();
        let select = select(false, false, true, true);
        let initial_sr = wf.shift_register;
        for _ in 0..(2_000_000) {
            wf.clock(0x1000, false, false, false, select, 0x0800, false, false);
        }
        assert_ne!(wf.shift_register, initial_sr);
    }

    #[test]
    fn long_silence_decays_shift_register_to_all_ones() {
        let mut wf = Waveform::new();
        wf.shift_register = 0x000001;
        let select = select(false, false, false, false);
        for _ in 0..(LFSR_IDLE_DECAY_CYCLES + 1) {
            wf.clock(0, false, false, false, select, 0, false, false);
        }
        assert_eq!(wf.shift_register, 0x7FFFFF);
    }
}
