use std::cell::Cell;

use knob_invaders::board::KnobPanel;
use knob_invaders::input::*;

/// A knob register the test can rewrite between samples.
struct FakePanel {
    register: Cell<u32>,
}

impl FakePanel {
    fn new(red: u8, green: u8, blue: u8) -> Self {
        let panel = Self {
            register: Cell::new(0),
        };
        panel.set(red, green, blue, 0);
        panel
    }

    fn set(&self, red: u8, green: u8, blue: u8, buttons: u32) {
        self.register.set(
            buttons | (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue),
        );
    }
}

impl KnobPanel for FakePanel {
    fn read_knobs(&self) -> u32 {
        self.register.get()
    }
}

// ── rotation_delta ────────────────────────────────────────────────────────────

#[test]
fn small_turns_are_direct() {
    assert_eq!(rotation_delta(10, 13), 3);
    assert_eq!(rotation_delta(13, 10), -3);
    assert_eq!(rotation_delta(77, 77), 0);
    assert_eq!(rotation_delta(0, 127), 127);
}

#[test]
fn turns_across_the_wrap() {
    assert_eq!(rotation_delta(250, 4), 10);
    assert_eq!(rotation_delta(4, 250), -10);
    assert_eq!(rotation_delta(255, 0), 1);
    assert_eq!(rotation_delta(0, 255), -1);
}

#[test]
fn half_turn_goes_the_short_way() {
    assert_eq!(rotation_delta(0, 128), -128);
    assert_eq!(rotation_delta(128, 0), 128);
}

// ── register decoding ─────────────────────────────────────────────────────────

#[test]
fn counters_and_buttons_decode() {
    let register = 0x05_11_22_33;
    assert_eq!(KnobId::Red.counter(register), 0x11);
    assert_eq!(KnobId::Green.counter(register), 0x22);
    assert_eq!(KnobId::Blue.counter(register), 0x33);
    assert_ne!(register & KnobId::Red.button_mask(), 0);
    assert_eq!(register & KnobId::Green.button_mask(), 0);
    assert_ne!(register & KnobId::Blue.button_mask(), 0);
}

// ── KnobSampler ───────────────────────────────────────────────────────────────

#[test]
fn first_sample_is_zero() {
    let panel = FakePanel::new(200, 17, 3);
    let mut sampler = KnobSampler::new(&panel);
    for knob in KnobId::ALL {
        assert_eq!(sampler.sample_rotation(&panel, knob), 0);
    }
}

#[test]
fn samples_are_relative_per_knob() {
    let panel = FakePanel::new(250, 0, 5);
    let mut sampler = KnobSampler::new(&panel);

    panel.set(2, 0, 1, 0);
    assert_eq!(sampler.sample_rotation(&panel, KnobId::Red), 8);
    assert_eq!(sampler.sample_rotation(&panel, KnobId::Blue), -4);
    // unchanged since the last read
    assert_eq!(sampler.sample_rotation(&panel, KnobId::Red), 0);
}

#[test]
fn players_map_to_red_and_blue() {
    let panel = FakePanel::new(0, 0, 0);
    let mut sampler = KnobSampler::new(&panel);

    panel.set(3, 50, 254, KnobId::Blue.button_mask() | KnobId::Green.button_mask());
    let input = sampler.sample_players(&panel, 2);

    assert_eq!(input.players[0].rotation, 3);
    assert!(!input.players[0].fire);
    assert_eq!(input.players[1].rotation, -2);
    assert!(input.players[1].fire);
}

#[test]
fn single_player_leaves_second_input_idle() {
    let panel = FakePanel::new(0, 0, 0);
    let mut sampler = KnobSampler::new(&panel);

    panel.set(1, 0, 9, KnobId::Red.button_mask() | KnobId::Blue.button_mask());
    let input = sampler.sample_players(&panel, 1);

    assert_eq!(input.players[0].rotation, 1);
    assert!(input.players[0].fire);
    assert_eq!(input.players[1].rotation, 0);
    assert!(!input.players[1].fire);
}
