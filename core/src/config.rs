//! User-facing configuration consumed by the Player façade.

use crate::error::{EngineError, EngineResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum C64Model {
    Pal,
    Ntsc,
    OldNtsc,
    DreanPal,
    PalN,
}

impl C64Model {
    pub fn cycles_per_second(self) -> u32 {
        match self {
            C64Model::Pal | C64Model::DreanPal | C64Model::PalN => 985_248,
            C64Model::Ntsc => 1_022_727,
            C64Model::OldNtsc => 1_022_727,
        }
    }

    pub fn power_freq_hz(self) -> f64 {
        match self {
            C64Model::Pal | C64Model::DreanPal | C64Model::PalN => 50.0,
            C64Model::Ntsc | C64Model::OldNtsc => 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidModel {
    Mos6581,
    Mos8580,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CiaModel {
    Mos6526,
    Mos6526W4485,
    Mos8521,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Mono,
    Stereo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingMethod {
    Fast,
    Resample,
}

#[derive(Clone, Debug)]
pub struct SidConfig {
    pub default_c64_model: C64Model,
    pub force_c64_model: bool,
    pub default_sid_model: SidModel,
    pub force_sid_model: bool,
    pub digi_boost: bool,
    pub cia_model: CiaModel,
    pub playback: Playback,
    pub frequency: u32,
    pub second_sid_address: Option<u16>,
    pub third_sid_address: Option<u16>,
    pub sampling_method: SamplingMethod,
    pub fast_sampling: bool,
    pub power_on_delay: Option<u16>,
    pub sid_emulation: bool,
}

impl Default for SidConfig {
    fn default() -> Self {
        SidConfig {
            default_c64_model: C64Model::Pal,
            force_c64_model: false,
            default_sid_model: SidModel::Mos6581,
            force_sid_model: false,
            digi_boost: false,
            cia_model: CiaModel::Mos6526,
            playback: Playback::Mono,
            frequency: 44100,
            second_sid_address: None,
            third_sid_address: None,
            sampling_method: SamplingMethod::Resample,
            fast_sampling: false,
            power_on_delay: None,
            sid_emulation: true,
        }
    }
}

impl SidConfig {
    /// Rejects combinations that cannot be realized in hardware (e.g. a
    /// sampling rate below the Nyquist limit for a usable audio band).
    pub fn validate(&self) -> EngineResult<()> {
        if self.frequency < 8000 || self.frequency > 192_000 {
            return Err(EngineError::ConfigInvalid(format!(
                "frequency {} Hz out of supported range 8000-192000",
                self.frequency
            )));
        }
        if let Some(delay) = self.power_on_delay {
            if delay > 0x1FFF {
                return Err(EngineError::ConfigInvalid(format!(
                    "power_on_delay {} exceeds maximum of 8191 cycles",
                    delay
                )));
            }
        }
        Ok(())
    }
}
