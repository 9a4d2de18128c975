//! One game from setup to game over: load sprites, then repeat
//! sample → simulate → render → present until the game ends, then settle
//! the high score.

use std::io;

use rand::Rng;

use crate::board::{Clock, DisplaySink, KnobPanel, LedStrip};
use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::error::GameError;
use crate::framebuffer::PixelBuffer;
use crate::highscore::HighScoreStore;
use crate::input::KnobSampler;
use crate::render::render;
use crate::sprite::{SpriteLoader, SpriteSet};

/// Everything a board must provide to host a game.
pub trait Board: KnobPanel + DisplaySink + LedStrip + Clock {}

impl<T: KnobPanel + DisplaySink + LedStrip + Clock> Board for T {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub level: u32,
    /// Final score per player.
    pub scores: Vec<u32>,
    /// High score on file before this game.
    pub previous_high: u32,
    pub new_high_score: bool,
}

pub struct Session {
    state: GameState,
    frame: PixelBuffer,
    sampler: KnobSampler,
}

impl Session {
    /// Validate the config and load every sprite.  Fails without starting
    /// anything if a required sprite is missing or corrupt.
    pub fn start(
        config: &GameConfig,
        loader: &impl SpriteLoader,
        panel: &impl KnobPanel,
        now_ms: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let sprites = SpriteSet::load(loader, config.players)?;
        let state = init_state(config, sprites, now_ms);
        let frame = PixelBuffer::new(state.width as u32, state.height as u32);
        log::info!(
            "starting {}-player game, {}x{} formation",
            state.ships.len(),
            config.formation.rows,
            config.formation.cols
        );
        Ok(Self {
            state,
            frame,
            sampler: KnobSampler::new(panel),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The most recently composed frame.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Run one tick and present the result.
    pub fn step<B: Board>(&mut self, board: &mut B, rng: &mut impl Rng) -> io::Result<GameStatus> {
        let now_ms = board.now_ms();
        let input = self.sampler.sample_players(&*board, self.state.ships.len());
        tick(&mut self.state, &input, now_ms, rng, board);
        render(&self.state, &mut self.frame);
        board.present(&self.frame)?;
        Ok(self.state.status)
    }

    /// End the game: LEDs off, high score compared and saved if beaten.
    pub fn finish(self, store: &HighScoreStore, leds: &mut impl LedStrip) -> SessionSummary {
        leds.all_off();
        let previous_high = store.read();
        let best = self.state.best_score();
        let new_high_score = best > previous_high && store.write(best);
        if new_high_score {
            log::info!("new high score {best} (was {previous_high})");
        }
        SessionSummary {
            level: self.state.level,
            scores: self.state.ships.iter().map(|s| s.score).collect(),
            previous_high,
            new_high_score,
        }
    }
}

/// Play one game to the end on `board`.
pub fn play<B: Board>(
    config: &GameConfig,
    loader: &impl SpriteLoader,
    board: &mut B,
    rng: &mut impl Rng,
    store: &HighScoreStore,
) -> Result<SessionSummary, GameError> {
    let mut session = Session::start(config, loader, &*board, board.now_ms())?;
    while session.step(board, rng)? == GameStatus::Playing {}
    Ok(session.finish(store, board))
}
