use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use knob_invaders::board::Clock;
use knob_invaders::config::GameConfig;
use knob_invaders::entities::GameStatus;
use knob_invaders::error::{GameError, SpriteError};
use knob_invaders::highscore::HighScoreStore;
use knob_invaders::session::{Session, SessionSummary};
use knob_invaders::sprite::{BuiltinSprites, PpmLoader, Sprite, SpriteLoader};
use knob_invaders::terminal::{self, TerminalBoard};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

#[derive(Parser)]
#[command(name = "knob_invaders")]
#[command(about = "Space-invaders style shooter on an emulated knob board")]
struct Cli {
    /// TOML config file; defaults apply when it does not exist
    #[arg(short, long, default_value = "knob_invaders.toml")]
    config: PathBuf,

    /// Number of players (1 or 2), overrides the config
    #[arg(short, long)]
    players: Option<usize>,

    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of .ppm sprites, overrides the config
    #[arg(long)]
    sprites: Option<PathBuf>,
}

/// Sprite source picked at startup.
enum Assets {
    Dir(PpmLoader),
    Builtin(BuiltinSprites),
}

impl SpriteLoader for Assets {
    fn load(&self, name: &str) -> Result<Sprite, SpriteError> {
        match self {
            Assets::Dir(loader) => loader.load(name),
            Assets::Builtin(loader) => loader.load(name),
        }
    }
}

fn init_logging(config: &GameConfig) {
    // The terminal is in raw mode while playing, so logs go to a file.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&config.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("cannot open log file {}: {e}", config.log_file.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    let (mut config, source) = match GameConfig::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    if let Some(players) = cli.players {
        config.players = players;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.sprites.is_some() {
        config.assets.sprite_dir = cli.sprites;
    }

    init_logging(&config);
    log::info!("knob_invaders starting, {source}");

    match run(&config) {
        Ok(summaries) => {
            for summary in &summaries {
                print_summary(summary);
            }
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("knob_invaders: {e}");
            std::process::exit(1);
        }
    }
}

fn run(config: &GameConfig) -> Result<Vec<SessionSummary>, GameError> {
    let assets = match &config.assets.sprite_dir {
        Some(dir) => Assets::Dir(PpmLoader::new(dir)),
        None => Assets::Builtin(BuiltinSprites),
    };
    let store = HighScoreStore::new(&config.high_score_file);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = terminal::enter(&mut out)?;
    let rx = terminal::spawn_event_reader();
    let mut board = TerminalBoard::new(out, rx);

    let result = game_loop(config, &assets, &mut board, &mut rng, &store);

    // Always restore the terminal
    terminal::leave(&mut std::io::stdout(), keyboard_enhanced);
    result
}

/// Play games until the user quits.  Returns one summary per finished game.
fn game_loop<W: Write>(
    config: &GameConfig,
    assets: &Assets,
    board: &mut TerminalBoard<W>,
    rng: &mut StdRng,
    store: &HighScoreStore,
) -> Result<Vec<SessionSummary>, GameError> {
    let mut summaries = Vec::new();

    'games: loop {
        let mut session = Session::start(config, assets, &*board, board.now_ms())?;
        loop {
            let frame_start = Instant::now();
            board.pump();
            if board.quit_requested() {
                break 'games;
            }
            if session.step(board, rng)? == GameStatus::GameOver {
                break;
            }
            pace(frame_start);
        }

        let summary = session.finish(store, board);
        log::info!(
            "game over at level {}, scores {:?}",
            summary.level,
            summary.scores
        );
        summaries.push(summary);

        // The game-over frame stays up until R or Q.
        loop {
            let frame_start = Instant::now();
            board.pump();
            if board.quit_requested() {
                break 'games;
            }
            if board.take_restart() {
                continue 'games;
            }
            pace(frame_start);
        }
    }

    Ok(summaries)
}

fn pace(frame_start: Instant) {
    let elapsed = frame_start.elapsed();
    if elapsed < FRAME {
        std::thread::sleep(FRAME - elapsed);
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("Game over at level {}", summary.level);
    for (player, score) in summary.scores.iter().enumerate() {
        println!("  Player {}: {score}", player + 1);
    }
    if summary.new_high_score {
        println!("  New high score! (previous {})", summary.previous_high);
    } else {
        println!("  High score: {}", summary.previous_high);
    }
}
