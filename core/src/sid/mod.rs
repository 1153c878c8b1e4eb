//! A single SID chip: 3 voices feeding a shared analog filter and output
//! stage, mapped onto the 29-register ($D400-$D41C, mirrored every 32
//! bytes) I/O window.

mod envelope;
mod filter;
mod tables;
mod voice;

pub use filter::Filter;
pub use voice::Voice;

use crate::config::SidModel;

pub struct Sid {
    model: SidModel,
    pub voices: [Voice; 3],
    pub filter: Filter,
    /// Last value written to any register, returned by read-back of the
    /// (mostly write-only) registers $00-$18 the way real silicon does.
    bus_value: u8,
    /// OSC3 (voice 3 waveform output) and ENV3 (voice 3 envelope level)
    /// are the only genuinely readable registers, at $1B/$1C.
    digi_boost: bool,
    /// Per-voice mute, a host-side convenience the real chip has no
    /// equivalent of (used by players for solo/mute UI).
    mute: [bool; 3],
    /// Host override that bypasses the analog filter stage entirely,
    /// independent of the chip's own FILT bits.
    filter_enabled: bool,
}

impl Sid {
    pub fn new(model: SidModel, digi_boost: bool) -> Self {
        Sid {
            model,
            voices: [Voice::new(), Voice::new(), Voice::new()],
            filter: Filter::new(model == SidModel::Mos8580),
            bus_value: 0,
            digi_boost,
            mute: [false; 3],
            filter_enabled: true,
        }
    }

    pub fn set_voice_muted(&mut self, voice: usize, muted: bool) {
        if let Some(m) = self.mute.get_mut(voice) {
            *m = muted;
        }
    }

    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
    }

    pub fn reset(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.reset();
        }
        self.filter.reset();
        self.bus_value = 0;
    }

    pub fn model(&self) -> SidModel {
        self.model
    }

    /// Advances every voice and the filter state by one cycle. Does not
    /// produce a sample; call `output()` separately (the resampler decides
    /// when to actually read one).
    pub fn clock(&mut self) {
        let acc = [
            self.voices[0].accumulator(),
            self.voices[1].accumulator(),
            self.voices[2].accumulator(),
        ];
        let prev = [
            self.voices[0].prev_accumulator(),
            self.voices[1].prev_accumulator(),
            self.voices[2].prev_accumulator(),
        ];
        let ring_msb = [acc[2] & 0x0080_0000 != 0, acc[0] & 0x0080_0000 != 0, acc[1] & 0x0080_0000 != 0];
        // Each voice syncs/ring-modulates from the *previous* voice (0 <- 2).
        self.voices[0].clock(acc[2], prev[2], ring_msb[0]);
        self.voices[1].clock(acc[0], prev[0], ring_msb[1]);
        self.voices[2].clock(acc[1], prev[1], ring_msb[2]);
    }

    /// Produces one output sample in roughly [-1.0, 1.0].
    pub fn output(&self) -> f64 {
        let ring_msb = [
            self.voices[2].accumulator() & 0x0080_0000 != 0,
            self.voices[0].accumulator() & 0x0080_0000 != 0,
            self.voices[1].accumulator() & 0x0080_0000 != 0,
        ];

        let voice_out: [f64; 3] = [
            if self.mute[0] { 0.0 } else { self.voices[0].output(ring_msb[0]) },
            if self.mute[1] { 0.0 } else { self.voices[1].output(ring_msb[1]) },
            if self.mute[2] { 0.0 } else { self.voices[2].output(ring_msb[2]) },
        ];

        if !self.filter_enabled {
            let norm = 1.0 / 2048.0;
            return voice_out.iter().sum::<f64>() * norm;
        }

        let mut filtered = 0.0;
        let mut unfiltered = 0.0;
        for (i, sample) in voice_out.iter().enumerate() {
            // Voice 3 can be disconnected from the mixer entirely when its
            // filter bit is off and voice3_off is set (used to silence a
            // control-only oscillator channel).
            if i == 2 && self.filter.voice3_disconnected() && !self.filter.filters_voice(2) {
                continue;
            }
            if self.filter.filters_voice(i) {
                filtered += sample;
            } else {
                unfiltered += sample;
            }
        }

        let norm = 1.0 / 2048.0;
        self.filter.process(filtered * norm, unfiltered * norm)
    }

    pub fn osc3(&self) -> u8 {
        (self.voices[2].waveform_output(false) >> 4) as u8
    }

    pub fn env3(&self) -> u8 {
        self.voices[2].envelope.level()
    }

    pub fn read(&mut self, reg: u8) -> u8 {
        match reg {
            0x1B => self.osc3(),
            0x1C => self.env3(),
            _ => self.bus_value,
        }
    }

    pub fn write(&mut self, reg: u8, value: u8) {
        self.bus_value = value;
        match reg {
            0x00 => self.voices[0].write_freq_lo(value),
            0x01 => self.voices[0].write_freq_hi(value),
            0x02 => self.voices[0].write_pw_lo(value),
            0x03 => self.voices[0].write_pw_hi(value),
            0x04 => self.voices[0].write_control(value),
            0x05 => self.voices[0].write_attack_decay(value),
            0x06 => self.voices[0].write_sustain_release(value),
            0x07 => self.voices[1].write_freq_lo(value),
            0x08 => self.voices[1].write_freq_hi(value),
            0x09 => self.voices[1].write_pw_lo(value),
            0x0A => self.voices[1].write_pw_hi(value),
            0x0B => self.voices[1].write_control(value),
            0x0C => self.voices[1].write_attack_decay(value),
            0x0D => self.voices[1].write_sustain_release(value),
            0x0E => self.voices[2].write_freq_lo(value),
            0x0F => self.voices[2].write_freq_hi(value),
            0x10 => self.voices[2].write_pw_lo(value),
            0x11 => self.voices[2].write_pw_hi(value),
            0x12 => self.voices[2].write_control(value),
            0x13 => self.voices[2].write_attack_decay(value),
            0x14 => self.voices[2].write_sustain_release(value),
            0x15 => self.filter.write_fc_lo(value),
            0x16 => self.filter.write_fc_hi(value),
            0x17 => self.filter.write_res_filt(value),
            0x18 => self.filter.write_mode_vol(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_voice_reaches_full_envelope_on_fast_attack() {
        let mut sid = Sid::new(SidModel::Mos6581, false);
        sid.write(0x05, 0x00); // attack=0 (fastest), decay=0
        sid.write(0x06, 0xF0); // sustain=15, release=0
        sid.write(0x04, 0x11); // gate on, triangle
        for _ in 0..(9 * 256 + 10) {
            sid.clock();
        }
        assert_eq!(sid.voices[0].envelope.level(), 0xFF);
    }

    #[test]
    fn ungated_voice_decays_to_zero() {
        let mut sid = Sid::new(SidModel::Mos6581, false);
        sid.write(0x04, 0x01); // gate on
        sid.write(0x06, 0x09); // release=9 (short)
        for _ in 0..20000 {
            sid.clock();
        }
        sid.write(0x04, 0x00); // gate off -> release
        for _ in 0..40000 {
            sid.clock();
        }
        assert_eq!(sid.voices[0].envelope.level(), 0);
    }
}
