//! A single SID voice: oscillator + envelope + waveform DAC, register
//! window at offsets 0-6 relative to the chip's base (FREQ_LO/HI,
//! PW_LO/HI, CONTROL, AD, SR).

use super::envelope::Envelope;
use super::waveform::{WaveSelect, Waveform};

#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceRegs {
    pub frequency: u16,
    pub pulse_width: u16,
    pub control: u8,
}

const CTRL_GATE: u8 = 0x01;
const CTRL_SYNC: u8 = 0x02;
const CTRL_RING_MOD: u8 = 0x04;
const CTRL_TEST: u8 = 0x08;
const CTRL_TRIANGLE: u8 = 0x10;
const CTRL_SAWTOOTH: u8 = 0x20;
const CTRL_PULSE: u8 = 0x40;
const CTRL_NOISE: u8 = 0x80;

pub struct Voice {
    pub regs: VoiceRegs,
    pub waveform: Waveform,
    pub envelope: Envelope,
    prev_accumulator: u32,
}

impl Voice {
    pub fn new() -> Self {
        Voice {
            regs: VoiceRegs::default(),
            waveform: Waveform::new(),
            envelope: Envelope::new(),
            prev_accumulator: 0,
        }
    }

    pub fn reset(&mut self) {
        self.regs = VoiceRegs::default();
        self.waveform.reset();
        self.envelope.reset();
        self.prev_accumulator = 0;
    }

    pub fn write_freq_lo(&mut self, value: u8) {
        self.regs.frequency = (self.regs.frequency & 0xFF00) | value as u16;
    }
    pub fn write_freq_hi(&mut self, value: u8) {
        self.regs.frequency = (self.regs.frequency & 0x00FF) | ((value as u16) << 8);
    }
    pub fn write_pw_lo(&mut self, value: u8) {
        self.regs.pulse_width = (self.regs.pulse_width & 0x0F00) | value as u16;
    }
    pub fn write_pw_hi(&mut self, value: u8) {
        self.regs.pulse_width = (self.regs.pulse_width & 0x00FF) | ((value as u16 & 0x0F) << 8);
    }
    pub fn write_control(&mut self, value: u8) {
        self.regs.control = value;
        self.envelope.write_gate(value & CTRL_GATE != 0);
    }
    pub fn write_attack_decay(&mut self, value: u8) {
        self.envelope.write_attack_decay(value);
    }
    pub fn write_sustain_release(&mut self, value: u8) {
        self.envelope.write_sustain_release(value);
    }

    pub fn test(&self) -> bool {
        self.regs.control & CTRL_TEST != 0
    }

    /// Advances the oscillator one cycle given the sync/ring-mod source
    /// voice's current and previous accumulator state, and clocks the
    /// envelope.
    pub fn clock(&mut self, sync_source_accumulator: u32, sync_source_prev_accumulator: u32, ring_source_msb: bool) {
        self.prev_accumulator = self.waveform.accumulator;
        let ctrl = self.regs.control;
        let sync_enabled = ctrl & CTRL_SYNC != 0;
        let ring_mod = ctrl & CTRL_RING_MOD != 0;
        let source_msb_rising = (sync_source_accumulator & 0x0080_0000 != 0)
            && (sync_source_prev_accumulator & 0x0080_0000 == 0);
        let select = WaveSelect {
            triangle: ctrl & CTRL_TRIANGLE != 0,
            sawtooth: ctrl & CTRL_SAWTOOTH != 0,
            pulse: ctrl & CTRL_PULSE != 0,
            noise: ctrl & CTRL_NOISE != 0,
        };
        self.waveform.clock(
            self.regs.frequency,
            self.test(),
            sync_enabled,
            source_msb_rising,
            select,
            self.regs.pulse_width,
            ring_mod,
            ring_source_msb,
        );
        self.envelope.clock();
    }

    pub fn accumulator(&self) -> u32 {
        self.waveform.accumulator
    }
    pub fn prev_accumulator(&self) -> u32 {
        self.prev_accumulator
    }

    /// 12-bit waveform DAC output before envelope scaling.
    pub fn waveform_output(&self, ring_source_msb: bool) -> u16 {
        let ctrl = self.regs.control;
        let triangle = ctrl & CTRL_TRIANGLE != 0;
        let sawtooth = ctrl & CTRL_SAWTOOTH != 0;
        let pulse = ctrl & CTRL_PULSE != 0;
        let noise = ctrl & CTRL_NOISE != 0;
        let ring_mod = ctrl & CTRL_RING_MOD != 0;

        let selected_count = [triangle, sawtooth, pulse, noise].iter().filter(|&&b| b).count();
        if selected_count <= 1 {
            if triangle {
                self.waveform.triangle(ring_mod, ring_source_msb)
            } else if sawtooth {
                self.waveform.sawtooth()
            } else if pulse {
                self.waveform.pulse(self.regs.pulse_width, self.test())
            } else if noise {
                self.waveform.noise()
            } else {
                0
            }
        } else {
            self.waveform.combined(
                triangle,
                sawtooth,
                pulse,
                noise,
                self.regs.pulse_width,
                self.test(),
                ring_mod,
                ring_source_msb,
            )
        }
    }

    /// Final per-voice output: 12-bit waveform DAC value scaled by the
    /// 8-bit envelope level, as a signed sample centered at zero.
    pub fn output(&self, ring_source_msb: bool) -> f64 {
        let wave = self.waveform_output(ring_source_msb) as f64;
        let env = self.envelope.level() as f64 / 255.0;
        (wave - 2048.0) * env
    }
}
