use std::cell::Cell;
use std::io;

use knob_invaders::board::{Clock, DisplaySink, KnobPanel, LedStrip};
use knob_invaders::config::GameConfig;
use knob_invaders::entities::GameStatus;
use knob_invaders::error::{ConfigError, GameError, SpriteError};
use knob_invaders::framebuffer::PixelBuffer;
use knob_invaders::highscore::HighScoreStore;
use knob_invaders::input::KnobId;
use knob_invaders::render::render_frame;
use knob_invaders::session::{play, Session};
use knob_invaders::sprite::{BuiltinSprites, Sprite, SpriteLoader, MYSTERY};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Scripted board: the clock jumps `step_ms` on every read and the knob
/// register never changes.
struct FakeBoard {
    now: Cell<u64>,
    step_ms: u64,
    register: u32,
    frames: usize,
    last_frame: Option<PixelBuffer>,
    flashes: Vec<u16>,
    leds_off: usize,
}

impl FakeBoard {
    fn new(step_ms: u64, register: u32) -> Self {
        Self {
            now: Cell::new(0),
            step_ms,
            register,
            frames: 0,
            last_frame: None,
            flashes: Vec::new(),
            leds_off: 0,
        }
    }
}

impl KnobPanel for FakeBoard {
    fn read_knobs(&self) -> u32 {
        self.register
    }
}

impl DisplaySink for FakeBoard {
    fn present(&mut self, frame: &PixelBuffer) -> io::Result<()> {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

impl LedStrip for FakeBoard {
    fn flash(&mut self, color: u16) {
        self.flashes.push(color);
    }

    fn all_off(&mut self) {
        self.leds_off += 1;
    }
}

impl Clock for FakeBoard {
    fn now_ms(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_ms);
        t
    }
}

struct NoMystery;

impl SpriteLoader for NoMystery {
    fn load(&self, name: &str) -> Result<Sprite, SpriteError> {
        if name == MYSTERY {
            return Err(SpriteError::Empty);
        }
        BuiltinSprites.load(name)
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn idle_game_runs_to_game_over() {
    let config = GameConfig::default();
    let mut board = FakeBoard::new(500, 0);
    let mut rng = seeded_rng();
    let mut session = Session::start(&config, &BuiltinSprites, &board, 0).unwrap();

    let mut ticks = 0;
    while session.step(&mut board, &mut rng).unwrap() == GameStatus::Playing {
        ticks += 1;
        assert!(ticks < 10_000, "game never ended");
    }

    assert!(session.state().is_over());
    assert_eq!(board.frames, ticks + 1);
    // the final presented frame is the game-over frame
    assert_eq!(board.last_frame.as_ref(), Some(&render_frame(session.state())));
    assert_eq!(session.frame(), board.last_frame.as_ref().unwrap());
}

#[test]
fn play_settles_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    let config = GameConfig::default();
    let mut board = FakeBoard::new(500, KnobId::Red.button_mask());
    let mut rng = seeded_rng();

    let summary = play(&config, &BuiltinSprites, &mut board, &mut rng, &store).unwrap();

    assert_eq!(summary.scores.len(), 1);
    assert!(summary.scores[0] > 0);
    assert_eq!(summary.previous_high, 0);
    assert!(summary.new_high_score);
    assert_eq!(store.read(), summary.scores[0]);
    assert!(!board.flashes.is_empty());
    assert_eq!(board.leds_off, 1);
}

#[test]
fn lower_score_keeps_stored_high() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    assert!(store.write(1_000_000));
    let config = GameConfig::default();
    let mut board = FakeBoard::new(500, KnobId::Red.button_mask());
    let mut rng = seeded_rng();

    let summary = play(&config, &BuiltinSprites, &mut board, &mut rng, &store).unwrap();

    assert_eq!(summary.previous_high, 1_000_000);
    assert!(!summary.new_high_score);
    assert_eq!(store.read(), 1_000_000);
}

#[test]
fn two_player_summary_has_both_scores() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    let config = GameConfig {
        players: 2,
        ..GameConfig::default()
    };
    let mut board = FakeBoard::new(500, 0);
    let mut rng = seeded_rng();

    let summary = play(&config, &BuiltinSprites, &mut board, &mut rng, &store).unwrap();

    assert_eq!(summary.scores, vec![0, 0]);
    assert!(!summary.new_high_score);
}

#[test]
fn missing_sprite_aborts_before_first_frame() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    let mut board = FakeBoard::new(500, 0);
    let mut rng = seeded_rng();

    let result = play(&GameConfig::default(), &NoMystery, &mut board, &mut rng, &store);

    match result {
        Err(GameError::SpriteLoad { name, .. }) => assert_eq!(name, MYSTERY),
        other => panic!("expected sprite failure, got {other:?}"),
    }
    assert_eq!(board.frames, 0);
    assert!(!store.path().exists());
}

#[test]
fn invalid_config_is_rejected() {
    let config = GameConfig {
        players: 3,
        ..GameConfig::default()
    };
    let board = FakeBoard::new(500, 0);
    let result = Session::start(&config, &BuiltinSprites, &board, 0);
    assert!(matches!(
        result,
        Err(GameError::Config(ConfigError::Invalid { field: "players", .. }))
    ));
}
