use reson64_core::config::{C64Model, SidConfig};
use reson64_core::player::Player;
use reson64_core::tune::{ClockSpeed, Compatibility, Tune};

struct FakeTune {
    load: u16,
    init: u16,
    play: u16,
    data: Vec<u8>,
    second_sid: Option<u16>,
    third_sid: Option<u16>,
}

impl FakeTune {
    fn new(load: u16, init: u16, play: u16, data: Vec<u8>) -> Self {
        FakeTune { load, init, play, data, second_sid: None, third_sid: None }
    }
}

impl Tune for FakeTune {
    fn load_address(&self) -> u16 {
        self.load
    }
    fn init_address(&self) -> u16 {
        self.init
    }
    fn play_address(&self) -> u16 {
        self.play
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
    fn sid_model(&self, _chip_index: usize) -> Option<reson64_core::config::SidModel> {
        None
    }
    fn second_sid_address(&self) -> Option<u16> {
        self.second_sid
    }
    fn third_sid_address(&self) -> Option<u16> {
        self.third_sid
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

fn deterministic_config() -> SidConfig {
    let mut config = SidConfig::default();
    config.default_c64_model = C64Model::Pal;
    config.power_on_delay = Some(0);
    config
}

#[test]
fn player_with_no_tune_loaded_emits_nothing_but_silence() {
    let config = deterministic_config();
    let mut player = Player::new(config).unwrap();
    let mut out = Vec::new();
    // Nothing was ever loaded, so `play` is a no-op by contract.
    let produced = player.play(1024, &mut out).unwrap();
    assert_eq!(produced, 0);
    assert!(out.is_empty());
}

#[test]
fn lda_sta_rts_loop_is_readable_back_through_sid_register_18() {
    // LDA #$0F ; STA $D418 ; RTS, re-entered every driver call.
    let code = vec![0xA9, 0x0F, 0x8D, 0x18, 0xD4, 0x60];
    let tune = FakeTune::new(0x1000, 0x1000, 0x1000, code);
    let mut player = Player::new(deterministic_config()).unwrap();
    player.load(&tune, 0).unwrap();

    let mut out = Vec::new();
    player.play(20, &mut out).unwrap();

    assert_eq!(player.read_sid_register(0, 0x18), 0x0F);
}

fn push_lda_sta(code: &mut Vec<u8>, value: u8, addr: u16) {
    code.push(0xA9); // LDA #value
    code.push(value);
    code.push(0x8D); // STA addr
    code.push((addr & 0xFF) as u8);
    code.push((addr >> 8) as u8);
}

/// Builds an init routine that gates a loud, sustained triangle on voice 1
/// of every SID base in `bases`, then RTS.
fn gate_voice_one_on_every_chip(bases: &[u16]) -> Vec<u8> {
    let mut code = Vec::new();
    for &base in bases {
        push_lda_sta(&mut code, 0x00, base); // freq lo
        push_lda_sta(&mut code, 0x10, base + 1); // freq hi
        push_lda_sta(&mut code, 0x00, base + 5); // attack=0, decay=0
        push_lda_sta(&mut code, 0xF0, base + 6); // sustain=15, release=0
        push_lda_sta(&mut code, 0x11, base + 4); // triangle + gate
    }
    code.push(0x60); // RTS
    code
}

fn rms(frames: &[(f32, f32)]) -> f64 {
    if frames.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frames.iter().map(|&(l, r)| (l as f64 * l as f64 + r as f64 * r as f64) / 2.0).sum();
    (sum_sq / frames.len() as f64).sqrt()
}

#[test]
fn muting_one_of_three_sids_reduces_observed_rms() {
    let bases = [0xD400u16, 0xD420, 0xD440];
    let code = gate_voice_one_on_every_chip(&bases);
    let init = 0x1000;
    let play = init + code.len() as u16; // a bare RTS past init, never retriggers the gate
    let mut full_code = code;
    full_code.push(0x60);
    let tune = FakeTune::new(init, init, play, full_code);

    let mut config = deterministic_config();
    config.second_sid_address = Some(bases[1]);
    config.third_sid_address = Some(bases[2]);
    let mut player = Player::new(config).unwrap();
    player.load(&tune, 0).unwrap();

    let mut unmuted = Vec::new();
    player.play(4000, &mut unmuted).unwrap();

    player.mute(1, 0, true);
    let mut muted = Vec::new();
    player.play(4000, &mut muted).unwrap();

    let rms_before = rms(&unmuted);
    let rms_after = rms(&muted);
    assert!(rms_before > 0.0, "three gated voices must produce audible output");
    assert!(rms_after < rms_before, "muting a SID must reduce observed loudness");
}

#[test]
fn zero_tune_runs_the_requested_cycle_count_exactly_once_loaded() {
    // A minimal RSID-style tune: init does nothing, play does nothing.
    // `play()` must still advance exactly the requested number of system
    // cycles and keep producing silence once loaded.
    let code = vec![0x60]; // RTS
    let tune = FakeTune::new(0x1000, 0x1000, 0x1000, code);
    let mut player = Player::new(deterministic_config()).unwrap();
    player.load(&tune, 0).unwrap();

    let mut out = Vec::new();
    player.play(1024, &mut out).unwrap();
    assert_eq!(player.cycles_elapsed(), 1024);
    assert!(out.iter().all(|&(l, r)| l == 0.0 && r == 0.0));
}
