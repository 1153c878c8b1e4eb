//! Ties every chip together into a single steppable system: the façade a
//! host calls to load a tune, advance playback, and pull out audio.

use rand::Rng;

use crate::cia::Cia;
use crate::config::{C64Model, CiaModel, SidConfig, SidModel};
use crate::core::bus::InterruptState;
use crate::core::component::BusMasterComponent;
use crate::core::{Bus, BusMaster};
use crate::cpu::mos6510::{self, Mos6510};
use crate::cpu::Cpu;
use crate::driver::{DriverStub, IrqSource};
use crate::error::{EngineError, EngineResult};
use crate::mem::mmu::IoHandler;
use crate::mem::{Bank, Mmu};
use crate::mem::bank::BankId;
use crate::mixer::Mixer;
use crate::resampler::{FastResampler, SincResampler};
use crate::rom::{self, RomKind};
use crate::sid::Sid;
use crate::tune::Tune;
use crate::vic::{ChipModel, Vic};

/// Soft IRQ vector the stock Kernal's hardware handler chains through;
/// used to hook playback when a real Kernal image is installed instead of
/// pointing $FFFE/$FFFF straight at the driver.
const KERNAL_IRQ_SOFT_VECTOR: u16 = 0x0314;

fn vic_model_for(c64: C64Model) -> ChipModel {
    match c64 {
        C64Model::Pal | C64Model::DreanPal | C64Model::PalN => ChipModel::Mos6569,
        C64Model::Ntsc => ChipModel::Mos6567R8,
        C64Model::OldNtsc => ChipModel::Mos6567R56A,
    }
}

enum Resampler {
    Sinc(SincResampler),
    Fast(FastResampler),
}

impl Resampler {
    fn new(fast: bool, clock_freq: f64, sample_freq: f64) -> Self {
        if fast {
            Resampler::Fast(FastResampler::new(clock_freq, sample_freq))
        } else {
            Resampler::Sinc(SincResampler::new(clock_freq, sample_freq))
        }
    }

    fn input(&mut self, sample: f64) -> Option<f64> {
        match self {
            Resampler::Sinc(r) => r.input(sample),
            Resampler::Fast(r) => r.input(sample),
        }
    }
}

/// Bridges I/O-page accesses to whichever chip backs that 256-byte window.
/// Holds the chips as loans rather than owning them so `Player` can still
/// borrow `mmu` independently in the same tick.
struct IoBridge<'a> {
    cia1: &'a mut Cia,
    cia2: &'a mut Cia,
    vic: &'a mut Vic,
    sids: &'a mut Vec<Sid>,
    color_ram: &'a mut [u8; 1024],
    second_sid_address: Option<u16>,
    third_sid_address: Option<u16>,
}

impl<'a> IoBridge<'a> {
    fn extra_sid_index(&self, addr: u16) -> Option<usize> {
        if Some(addr & 0xFFE0) == self.second_sid_address.map(|a| a & 0xFFE0) && self.sids.len() > 1 {
            Some(1)
        } else if Some(addr & 0xFFE0) == self.third_sid_address.map(|a| a & 0xFFE0) && self.sids.len() > 2 {
            Some(2)
        } else {
            None
        }
    }
}

impl<'a> IoHandler for IoBridge<'a> {
    fn io_read(&mut self, addr: u16) -> u8 {
        if let Some(i) = self.extra_sid_index(addr) {
            return self.sids[i].read((addr & 0x1F) as u8);
        }
        match addr & 0xFC00 {
            0xD000 => self.vic.read((addr & 0x3F) as u8),
            0xD400 => self.sids[0].read((addr & 0x1F) as u8),
            0xD800 => self.color_ram[(addr - 0xD800) as usize & 0x3FF] & 0x0F,
            0xDC00 => self.cia1.read((addr & 0x0F) as u8),
            0xDD00 => self.cia2.read((addr & 0x0F) as u8),
            _ => 0xFF,
        }
    }

    fn io_write(&mut self, addr: u16, value: u8) {
        if let Some(i) = self.extra_sid_index(addr) {
            self.sids[i].write((addr & 0x1F) as u8, value);
            return;
        }
        match addr & 0xFC00 {
            0xD000 => self.vic.write((addr & 0x3F) as u8, value),
            0xD400 => self.sids[0].write((addr & 0x1F) as u8, value),
            0xD800 => self.color_ram[(addr - 0xD800) as usize & 0x3FF] = value & 0x0F,
            0xDC00 => self.cia1.write((addr & 0x0F) as u8, value),
            0xDD00 => self.cia2.write((addr & 0x0F) as u8, value),
            _ => {}
        }
    }
}

struct SystemBus<'a> {
    mmu: &'a mut Mmu,
    io: IoBridge<'a>,
}

impl<'a> Bus for SystemBus<'a> {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.mmu.read(addr, &mut self.io)
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.mmu.write(addr, data, &mut self.io);
    }

    fn is_halted_for(&self, master: BusMaster) -> bool {
        matches!(master, BusMaster::Cpu) && self.io.vic.ba_low()
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState {
            irq: self.io.cia1.irq_asserted() || self.io.vic.irq_asserted(),
            nmi: self.io.cia2.irq_asserted(),
        }
    }
}

/// Owns every component of one emulated C64 plus 1-3 SIDs, and steps them
/// in lockstep one system cycle at a time.
pub struct Player {
    config: SidConfig,
    mmu: Mmu,
    cpu: Mos6510,
    cia1: Cia,
    cia2: Cia,
    vic: Vic,
    sids: Vec<Sid>,
    color_ram: Box<[u8; 1024]>,
    resamplers: Vec<Resampler>,
    mixer: Mixer,

    cycles_per_second: u32,
    mains_period_cycles: u32,
    mains_accum: u32,
    cycle: u64,

    second_sid_address: Option<u16>,
    third_sid_address: Option<u16>,

    driver: Option<DriverStub>,
    power_on_remaining: u32,
    init_pending: bool,
    playing: bool,
}

impl Player {
    pub fn new(config: SidConfig) -> EngineResult<Self> {
        config.validate()?;
        let sid_count = 1 + config.second_sid_address.is_some() as usize + config.third_sid_address.is_some() as usize;
        let cycles_per_second = config.default_c64_model.cycles_per_second();
        let power_freq = config.default_c64_model.power_freq_hz();

        let sids = (0..sid_count).map(|_| Sid::new(config.default_sid_model, config.digi_boost)).collect();
        let resamplers = (0..sid_count)
            .map(|_| Resampler::new(config.sampling_method == crate::config::SamplingMethod::Fast || config.fast_sampling, cycles_per_second as f64, config.frequency as f64))
            .collect();

        Ok(Player {
            cia1: Cia::new(config.cia_model, (power_freq / 10.0).round() as u32),
            cia2: Cia::new(config.cia_model, (power_freq / 10.0).round() as u32),
            vic: Vic::new(vic_model_for(config.default_c64_model)),
            mmu: Mmu::new(),
            cpu: Mos6510::new(),
            sids,
            color_ram: Box::new([0; 1024]),
            resamplers,
            mixer: Mixer::new(sid_count, config.playback == crate::config::Playback::Stereo),
            cycles_per_second,
            mains_period_cycles: (cycles_per_second as f64 / power_freq).round() as u32,
            mains_accum: 0,
            cycle: 0,
            second_sid_address: config.second_sid_address,
            third_sid_address: config.third_sid_address,
            driver: None,
            power_on_remaining: 0,
            init_pending: false,
            playing: false,
            config,
        })
    }

    /// Re-applies configuration, rebuilding whatever depends on it (SID
    /// count, sample rate, CIA tick divisor). Stops playback.
    pub fn configure(&mut self, config: SidConfig) -> EngineResult<()> {
        config.validate()?;
        *self = Player::new(config)?;
        Ok(())
    }

    pub fn set_kernal(&mut self, data: Vec<u8>) -> EngineResult<()> {
        let load = rom::load(RomKind::Kernal, data).map_err(EngineError::RomInvalid)?;
        self.mmu.kernal = Some(Bank::rom(BankId::KernalRom, load.data));
        Ok(())
    }

    pub fn set_basic(&mut self, data: Vec<u8>) -> EngineResult<()> {
        let load = rom::load(RomKind::Basic, data).map_err(EngineError::RomInvalid)?;
        self.mmu.basic = Some(Bank::rom(BankId::BasicRom, load.data));
        Ok(())
    }

    pub fn set_chargen(&mut self, data: Vec<u8>) -> EngineResult<()> {
        let load = rom::load(RomKind::Character, data).map_err(EngineError::RomInvalid)?;
        self.mmu.charrom = Some(Bank::rom(BankId::CharRom, load.data));
        Ok(())
    }

    /// Loads a tune and arms playback: places its data in memory, relocates
    /// the driver stub, and primes the CPU to enter `init`. Playback
    /// actually starts once `play()` has advanced past the power-on delay.
    pub fn load(&mut self, tune: &dyn Tune, song: u32) -> EngineResult<()> {
        self.cpu.reset();
        self.cia1.reset();
        self.cia2.reset();
        self.vic.reset();
        for sid in self.sids.iter_mut() {
            sid.reset();
        }
        self.mmu.reset();
        self.mixer = Mixer::new(self.sids.len(), self.config.playback == crate::config::Playback::Stereo);

        let second = self.second_sid_address.or_else(|| tune.second_sid_address());
        let third = self.third_sid_address.or_else(|| tune.third_sid_address());
        self.second_sid_address = second;
        self.third_sid_address = third;

        {
            let ram = self.mmu.ram.as_mut_slice();
            ram.iter_mut().for_each(|b| *b = 0);
            tune.place_in_memory(ram);
        }

        let irq_source = if tune.song_speed(song) == 0 { IrqSource::Raster } else { IrqSource::CiaTimer };
        let driver = DriverStub::build(tune, irq_source);
        {
            let ram = self.mmu.ram.as_mut_slice();
            driver.install(ram);
        }

        if self.mmu.kernal.is_some() {
            self.mmu.poke_raw(KERNAL_IRQ_SOFT_VECTOR, (driver.play_vector() & 0xFF) as u8);
            self.mmu.poke_raw(KERNAL_IRQ_SOFT_VECTOR + 1, (driver.play_vector() >> 8) as u8);
        } else {
            let ram = self.mmu.ram.as_mut_slice();
            driver.install_irq_vector(ram);
        }

        // Stack sentinel: push the trap address (minus one, per JSR/RTS
        // convention) so `init`'s closing RTS lands on a JAM byte instead
        // of underflowing the stack.
        let mut sp: u8 = 0xFD;
        let return_addr = driver.trap_address().wrapping_sub(1);
        self.mmu.poke_raw(0x0100 + sp as u16, (return_addr >> 8) as u8);
        sp = sp.wrapping_sub(1);
        self.mmu.poke_raw(0x0100 + sp as u16, (return_addr & 0xFF) as u8);
        sp = sp.wrapping_sub(1);

        self.cpu.sp = sp;
        self.cpu.a = song.min(tune.song_count().saturating_sub(1)) as u8;
        self.cpu.x = 0;
        self.cpu.y = 0;
        self.cpu.pc = tune.init_address();

        let latch = DriverStub::cia_timer_latch(tune.clock_speed(), self.cycles_per_second, tune.song_speed(song).max(1));
        self.cia1.write(0x04, (latch & 0xFF) as u8);
        self.cia1.write(0x05, (latch >> 8) as u8);
        self.cia1.write(0x0D, 0x81); // unmask timer A IRQ
        self.cia1.write(0x0E, 0x01); // start timer A, phi2 input

        self.power_on_remaining = self.config.power_on_delay.unwrap_or_else(|| rand::thread_rng().gen_range(0..=0x1FFFu16)) as u32;
        self.init_pending = true;
        self.driver = Some(driver);
        self.playing = true;
        self.cycle = 0;
        self.mains_accum = 0;
        for r in self.resamplers.iter_mut() {
            match r {
                Resampler::Sinc(s) => s.reset(),
                Resampler::Fast(f) => f.reset(),
            }
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn mute(&mut self, sid: usize, voice: usize, enabled: bool) {
        if let Some(s) = self.sids.get_mut(sid) {
            s.set_voice_muted(voice, enabled);
        }
    }

    pub fn set_filter_enabled(&mut self, sid: usize, enabled: bool) {
        if let Some(s) = self.sids.get_mut(sid) {
            s.set_filter_enabled(enabled);
        }
    }

    pub fn time_ms(&self) -> u64 {
        (self.cycle * 1000) / self.cycles_per_second as u64
    }

    /// Total system cycles advanced by `play()` since the last `load()`.
    pub fn cycles_elapsed(&self) -> u64 {
        self.cycle
    }

    /// Reads back a single SID register the way real silicon would: $1B
    /// and $1C are the genuine OSC3/ENV3 readbacks, everything else
    /// echoes the last byte written to any register on that chip.
    pub fn read_sid_register(&mut self, sid: usize, reg: u8) -> u8 {
        self.sids.get_mut(sid).map(|s| s.read(reg)).unwrap_or(0)
    }

    /// Snapshot of a chip's readable/observable state: per-voice envelope
    /// level followed by OSC3/ENV3. Real SID registers are write-only, so
    /// this is a host-convenience view rather than a register mirror.
    pub fn sid_status(&self, sid: usize, out: &mut [u8; 32]) {
        out.fill(0);
        let Some(s) = self.sids.get(sid) else { return };
        for (i, voice) in s.voices.iter().enumerate() {
            out[i] = voice.envelope.level();
        }
        out[3] = s.osc3();
        out[4] = s.env3();
    }

    /// Advances playback by `cycles` system cycles, appending produced
    /// stereo frames to `out`. Returns the number of frames produced.
    pub fn play(&mut self, cycles: u32, out: &mut Vec<(f32, f32)>) -> EngineResult<u32> {
        if !self.playing {
            return Ok(0);
        }
        let mut produced = 0;
        for _ in 0..cycles {
            if let Some((_, pc)) = self.cpu.halted {
                if self.init_pending && self.driver.as_ref().map(|d| d.trap_address()) == Some(pc) {
                    self.cpu.halted = None;
                    self.cpu.state = mos6510::ExecState::Fetch;
                    if let Some(idle) = self.driver.as_ref().map(|d| d.idle_address()) {
                        self.cpu.pc = idle;
                    }
                    self.init_pending = false;
                } else {
                    return Err(EngineError::Halt { opcode: self.cpu.halted.unwrap().0, pc });
                }
            }

            if self.power_on_remaining > 0 {
                self.power_on_remaining -= 1;
            } else {
                self.step_cycle();
            }

            self.cycle += 1;
            self.mains_accum += 1;
            if self.mains_accum >= self.mains_period_cycles {
                self.mains_accum = 0;
                // TOD alarm matches feed the same ICR bits CIA1/CIA2 already
                // report through `check_interrupts` on the next bus poll, so
                // no direct CPU signal is needed here.
                self.cia1.tick_tod();
                self.cia2.tick_tod();
            }

            for sid in self.sids.iter_mut() {
                sid.clock();
            }

            let mut chip_samples = Vec::with_capacity(self.sids.len());
            let mut have_all = true;
            for (sid, resampler) in self.sids.iter().zip(self.resamplers.iter_mut()) {
                match resampler.input(sid.output()) {
                    Some(sample) => chip_samples.push(sample),
                    None => have_all = false,
                }
            }
            if have_all && chip_samples.len() == self.sids.len() {
                if let Some((l, r)) = self.mixer.mix(&chip_samples) {
                    out.push((l as f32, r as f32));
                    produced += 1;
                }
            }
        }
        Ok(produced)
    }

    fn step_cycle(&mut self) {
        let ba_low = self.vic.ba_low();
        self.cpu.set_rdy(!ba_low);

        {
            let mut bus = SystemBus {
                mmu: &mut self.mmu,
                io: IoBridge {
                    cia1: &mut self.cia1,
                    cia2: &mut self.cia2,
                    vic: &mut self.vic,
                    sids: &mut self.sids,
                    color_ram: &mut *self.color_ram,
                    second_sid_address: self.second_sid_address,
                    third_sid_address: self.third_sid_address,
                },
            };
            self.cpu.tick_with_bus(&mut bus, BusMaster::Cpu);
        }

        self.mmu.tick(self.cycle);

        // CIA1/CIA2/VIC interrupt lines are read live off each chip by
        // `SystemBus::check_interrupts` every time the CPU polls at a Fetch
        // boundary, so their `tick`/`tick_tod` return values only matter for
        // tests; the system loop just needs the side effects.
        self.cia1.tick(true);
        self.cia2.tick(true);
        self.vic.tick();
    }
}
