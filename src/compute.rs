//! Game-logic functions: one call to [`tick`] advances the simulation by one
//! frame.
//!
//! Every function here mutates a `GameState` in place and never allocates.
//! Randomness comes only through the injected `Rng`, and time only through
//! the `now_ms` timestamp the caller read at the top of the tick, so a seeded
//! RNG plus a scripted clock replays a game exactly.

use rand::Rng;

use crate::board::LedStrip;
use crate::config::GameConfig;
use crate::entities::*;
use crate::sprite::SpriteSet;

/// LED colour flashed when an enemy dies.
pub const ENEMY_KILL_FLASH: u16 = 0xFF00;
/// LED colour flashed when the mystery ship is shot down.
pub const MYSTERY_KILL_FLASH: u16 = 0xFFE0;

// ── Input for one tick ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Signed knob detents since the previous tick.
    pub rotation: i32,
    /// Fire button currently held.
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub players: [PlayerInput; MAX_PLAYERS],
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Points per enemy, by row tier.
pub fn score_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Top => 30,
        EnemyKind::Middle => 20,
        EnemyKind::Bottom => 10,
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the state for a fresh game.  `now_ms` starts the march timer.
pub fn init_state(config: &GameConfig, sprites: SpriteSet, now_ms: u64) -> GameState {
    let players = config.players.clamp(1, MAX_PLAYERS);
    let ships = (0..players)
        .map(|i| {
            // one player centred; two players at the quarter marks
            let centre_x = SCREEN_WIDTH * (2 * i as i32 + 1) / (2 * players as i32);
            Ship::new(
                sprites.ships[i].clone(),
                centre_x,
                config.pools.player_bullets,
            )
        })
        .collect();

    GameState {
        ships,
        formation: Formation::new(
            config.formation.rows,
            config.formation.cols,
            config.pools.enemy_bullets,
            now_ms,
        ),
        mystery: MysteryShip::default(),
        sprites,
        level: 1,
        status: GameStatus::Playing,
        invaded: false,
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
        boundary_y: BOUNDARY_Y,
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle overlap.  Touching edges do not collide.
#[allow(clippy::too_many_arguments)]
pub fn check_collision(
    x1: i32,
    y1: i32,
    w1: i32,
    h1: i32,
    x2: i32,
    y2: i32,
    w2: i32,
    h2: i32,
) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

// ── Player actions ────────────────────────────────────────────────────────────

/// Move a ship by `rotation` knob detents and clamp it to the screen.
pub fn move_player(state: &mut GameState, player: usize, rotation: i32) {
    let width = state.width;
    if let Some(ship) = state.ships.get_mut(player) {
        if !ship.is_alive() {
            return;
        }
        ship.x += rotation * SHIP_SPEED;
        ship.clamp_x(width);
    }
}

/// Fire from the ship's top-centre if the cooldown has elapsed and a slot is
/// free.  Returns whether a bullet was launched.
pub fn player_shoot(state: &mut GameState, player: usize, now_ms: u64) -> bool {
    let Some(ship) = state.ships.get_mut(player) else {
        return false;
    };
    if !ship.is_alive() || !ship.can_fire(now_ms) {
        return false;
    }
    let x = ship.x + ship.width / 2 - BULLET_WIDTH / 2;
    let y = ship.y - BULLET_HEIGHT;
    if ship.bullets.fire(x, y) {
        ship.last_shot_ms = Some(now_ms);
        true
    } else {
        false
    }
}

// ── Per-tick sub-steps ────────────────────────────────────────────────────────

/// Move player bullets up and resolve their hits.  A bullet stops at the
/// first thing it hits; enemies are checked before the mystery ship.
pub fn update_player_bullets(state: &mut GameState, leds: &mut impl LedStrip) {
    let GameState {
        ships,
        formation,
        mystery,
        ..
    } = state;

    for (player, ship) in ships.iter_mut().enumerate() {
        for bullet in ship.bullets.slots_mut().iter_mut().filter(|b| b.active) {
            bullet.y -= BULLET_SPEED;

            let hit = formation.cells().iter().position(|e| {
                e.is_alive()
                    && check_collision(
                        bullet.x,
                        bullet.y,
                        BULLET_WIDTH,
                        BULLET_HEIGHT,
                        e.x,
                        e.y,
                        ENEMY_WIDTH,
                        ENEMY_HEIGHT,
                    )
            });
            if let Some(kind) = hit.and_then(|index| formation.kill(index)) {
                let points = score_for(kind);
                ship.score += points;
                leds.flash(ENEMY_KILL_FLASH);
                bullet.active = false;
                log::debug!(
                    "player {} killed {:?} (+{}), {} left",
                    player + 1,
                    kind,
                    points,
                    formation.alive_count()
                );
                continue;
            }

            if mystery.active
                && check_collision(
                    bullet.x,
                    bullet.y,
                    BULLET_WIDTH,
                    BULLET_HEIGHT,
                    mystery.x,
                    mystery.y,
                    MYSTERY_SHIP_WIDTH,
                    MYSTERY_SHIP_HEIGHT,
                )
            {
                mystery.active = false;
                ship.score += MYSTERY_SHIP_POINTS;
                leds.flash(MYSTERY_KILL_FLASH);
                bullet.active = false;
                log::debug!("player {} downed the mystery ship", player + 1);
                continue;
            }

            if bullet.y + BULLET_HEIGHT < 0 {
                bullet.active = false;
            }
        }
    }
}

/// Launch an enemy bullet from the bottom-centre of the enemy at (x, y),
/// subject to the formation-wide cooldown.
pub fn fire_enemy_bullet(formation: &mut Formation, x: i32, y: i32, now_ms: u64) -> bool {
    let ready = formation
        .last_shot_ms
        .map_or(true, |last| now_ms.saturating_sub(last) >= ENEMY_FIRE_COOLDOWN_MS);
    if !ready {
        return false;
    }
    let bx = x + ENEMY_WIDTH / 2 - ENEMY_BULLET_WIDTH / 2;
    let by = y + ENEMY_HEIGHT;
    if formation.bullets.fire(bx, by) {
        formation.last_shot_ms = Some(now_ms);
        true
    } else {
        false
    }
}

/// March the formation when its interval has elapsed: step sideways, or
/// reverse and drop half an enemy height at the edge.  Afterwards the
/// frontmost enemy of each column may shoot.
pub fn update_formation(state: &mut GameState, now_ms: u64, rng: &mut impl Rng) {
    let formation = &mut state.formation;
    if now_ms.saturating_sub(formation.last_march_ms) < ENEMY_MOVE_INTERVAL_MS {
        return;
    }
    formation.last_march_ms = now_ms;

    if formation.at_leading_edge(state.width) {
        formation.direction = -formation.direction;
        formation.translate(0, ENEMY_HEIGHT / 2);
    } else {
        formation.translate(formation.direction * ENEMY_MOVE_SPEED, 0);
    }

    for col in 0..formation.cols() {
        let Some((x, y)) = formation.frontmost_in_column(col).map(|e| (e.x, e.y)) else {
            continue;
        };
        if rng.gen_ratio(ENEMY_FIRE_PERCENT, 100) {
            fire_enemy_bullet(formation, x, y, now_ms);
        }
    }

    // the invasion line is the top of the players' row
    let ship_height = state.ships.iter().map(|s| s.height).max().unwrap_or(0);
    let invasion_line = state.boundary_y - ship_height;
    if formation.lowest_edge().is_some_and(|bottom| bottom >= invasion_line) {
        if !state.invaded {
            log::info!("formation reached the player line");
        }
        state.invaded = true;
    }
}

/// Move enemy bullets down; they vanish at the boundary line or on a ship.
pub fn update_enemy_bullets(state: &mut GameState) {
    let boundary_y = state.boundary_y;
    let GameState {
        ships, formation, ..
    } = state;

    for bullet in formation.bullets.slots_mut().iter_mut().filter(|b| b.active) {
        bullet.y += ENEMY_BULLET_SPEED;

        if bullet.y >= boundary_y {
            bullet.active = false;
            continue;
        }

        let target = ships.iter_mut().find(|s| {
            s.is_alive()
                && check_collision(
                    bullet.x,
                    bullet.y,
                    ENEMY_BULLET_WIDTH,
                    ENEMY_BULLET_HEIGHT,
                    s.x,
                    s.y,
                    s.width,
                    s.height,
                )
        });
        if let Some(ship) = target {
            ship.lives = ship.lives.saturating_sub(1);
            bullet.active = false;
            log::debug!("ship hit, {} lives left", ship.lives);
        }
    }
}

/// Advance the mystery ship, or maybe launch it from a random edge.
pub fn update_mystery_ship(state: &mut GameState, rng: &mut impl Rng) {
    let width = state.width;
    let mystery = &mut state.mystery;

    if mystery.active {
        mystery.x += mystery.direction * MYSTERY_SHIP_SPEED;
        if mystery.x > width || mystery.x + MYSTERY_SHIP_WIDTH < 0 {
            mystery.active = false;
        }
    } else if rng.gen_ratio(1, MYSTERY_SHIP_ODDS) {
        mystery.active = true;
        mystery.y = MYSTERY_SHIP_Y;
        if rng.gen_bool(0.5) {
            mystery.x = -MYSTERY_SHIP_WIDTH;
            mystery.direction = 1;
        } else {
            mystery.x = width;
            mystery.direction = -1;
        }
    }
}

/// Start the next level once the grid is empty.
pub fn check_level_complete(state: &mut GameState, now_ms: u64) {
    if state.formation.alive_count() == 0 {
        state.level += 1;
        state.formation.reset(now_ms);
        log::info!("level {} begins", state.level);
    }
}

/// Game over when every ship is out of lives or the formation invaded.
pub fn evaluate_game_over(state: &mut GameState) {
    let all_dead = state.ships.iter().all(|s| !s.is_alive());
    if all_dead || state.invaded {
        state.status = GameStatus::GameOver;
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Does nothing once the game is over.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    now_ms: u64,
    rng: &mut impl Rng,
    leds: &mut impl LedStrip,
) {
    if state.is_over() {
        return;
    }

    // ── 1. Player movement ───────────────────────────────────────────────────
    for player in 0..state.ships.len() {
        move_player(state, player, input.players[player].rotation);
    }

    // ── 2. Player fire ───────────────────────────────────────────────────────
    for player in 0..state.ships.len() {
        if input.players[player].fire {
            player_shoot(state, player, now_ms);
        }
    }

    // ── 3. Player bullets ────────────────────────────────────────────────────
    update_player_bullets(state, leds);

    // ── 4. Formation march + enemy fire ──────────────────────────────────────
    update_formation(state, now_ms, rng);

    // ── 5. Enemy bullets ─────────────────────────────────────────────────────
    update_enemy_bullets(state);

    // ── 6. Mystery ship ──────────────────────────────────────────────────────
    update_mystery_ship(state, rng);

    // ── 7. Level completion ──────────────────────────────────────────────────
    check_level_complete(state, now_ms);

    // ── 8. Game over ─────────────────────────────────────────────────────────
    evaluate_game_over(state);
    if state.is_over() {
        log::info!(
            "game over at level {} (best score {})",
            state.level,
            state.best_score()
        );
    }
}
