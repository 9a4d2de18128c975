//! Knob sampling: relative rotation and button state from the knob register.
//!
//! Register layout: red counter in bits 16..24, green in 8..16, blue in 0..8;
//! buttons at bit 26 (red), 25 (green) and 24 (blue).

use crate::board::KnobPanel;
use crate::compute::{PlayerInput, TickInput};
use crate::entities::MAX_PLAYERS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnobId {
    Red,
    Green,
    Blue,
}

impl KnobId {
    pub const ALL: [KnobId; 3] = [KnobId::Red, KnobId::Green, KnobId::Blue];

    fn index(self) -> usize {
        match self {
            KnobId::Red => 0,
            KnobId::Green => 1,
            KnobId::Blue => 2,
        }
    }

    fn counter_shift(self) -> u32 {
        match self {
            KnobId::Red => 16,
            KnobId::Green => 8,
            KnobId::Blue => 0,
        }
    }

    pub fn button_mask(self) -> u32 {
        match self {
            KnobId::Red => 1 << 26,
            KnobId::Green => 1 << 25,
            KnobId::Blue => 1 << 24,
        }
    }

    /// The 8-bit rotation counter of this knob in a raw register value.
    pub fn counter(self, register: u32) -> u8 {
        ((register >> self.counter_shift()) & 0xFF) as u8
    }
}

/// Knob used by each player: rotate to move, push to fire.
pub const PLAYER_KNOBS: [KnobId; MAX_PLAYERS] = [KnobId::Red, KnobId::Blue];

/// Signed change between two readings of a wrapping 8-bit counter.  Any
/// move of 128 or more detents is taken as the short way round the wrap.
pub fn rotation_delta(previous: u8, current: u8) -> i32 {
    let (prev, cur) = (previous as i32, current as i32);
    if cur > prev {
        if cur - prev < 128 {
            cur - prev
        } else {
            (cur - 256) - prev
        }
    } else if cur < prev {
        if prev - cur < 128 {
            cur - prev
        } else {
            (cur + 256) - prev
        }
    } else {
        0
    }
}

/// Remembers the last raw counter per knob so each sample yields a delta.
#[derive(Clone, Debug)]
pub struct KnobSampler {
    previous: [u8; 3],
}

impl KnobSampler {
    /// Prime with the current register so the first sample reads zero.
    pub fn new(panel: &impl KnobPanel) -> Self {
        let register = panel.read_knobs();
        Self {
            previous: KnobId::ALL.map(|k| k.counter(register)),
        }
    }

    pub fn sample_rotation(&mut self, panel: &impl KnobPanel, knob: KnobId) -> i32 {
        let current = knob.counter(panel.read_knobs());
        let slot = &mut self.previous[knob.index()];
        let delta = rotation_delta(*slot, current);
        *slot = current;
        delta
    }

    pub fn is_pressed(panel: &impl KnobPanel, knob: KnobId) -> bool {
        panel.read_knobs() & knob.button_mask() != 0
    }

    /// Read every player's knob for one tick.
    pub fn sample_players(&mut self, panel: &impl KnobPanel, players: usize) -> TickInput {
        let mut input = TickInput::default();
        for (player, knob) in PLAYER_KNOBS.iter().enumerate().take(players) {
            input.players[player] = PlayerInput {
                rotation: self.sample_rotation(panel, *knob),
                fire: Self::is_pressed(panel, *knob),
            };
        }
        input
    }
}
