//! All game entity types: pure data plus the invariants that keep it valid.

use crate::sprite::{SpriteHandle, SpriteSet};

// ── Screen geometry ───────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: i32 = 480;
pub const SCREEN_HEIGHT: i32 = 320;
/// Strip under the play area reserved for the HUD.
pub const BOTTOM_PADDING: i32 = 30;
pub const BOUNDARY_Y: i32 = SCREEN_HEIGHT - BOTTOM_PADDING;

// ── Player ────────────────────────────────────────────────────────────────────

pub const MAX_PLAYERS: usize = 2;
pub const STARTING_LIVES: u32 = 3;
/// Rendered ship size is sprite size times this.
pub const SHIP_SCALE: u32 = 3;
/// Pixels per knob detent.
pub const SHIP_SPEED: i32 = 3;

pub const BULLET_SPEED: i32 = 5;
pub const BULLET_WIDTH: i32 = 2;
pub const BULLET_HEIGHT: i32 = 10;
pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 250;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_WIDTH: i32 = 24;
pub const ENEMY_HEIGHT: i32 = 16;
pub const ENEMY_H_GAP: i32 = 12;
pub const ENEMY_V_GAP: i32 = 8;
pub const FORMATION_LEFT: i32 = 20;
pub const FORMATION_TOP: i32 = 40;
pub const ENEMY_MOVE_SPEED: i32 = 8;
pub const ENEMY_MOVE_INTERVAL_MS: u64 = 500;

pub const ENEMY_BULLET_SPEED: i32 = 4;
pub const ENEMY_BULLET_WIDTH: i32 = 2;
pub const ENEMY_BULLET_HEIGHT: i32 = 8;
/// Shared by the whole formation, not per enemy.
pub const ENEMY_FIRE_COOLDOWN_MS: u64 = 300;
/// Chance, in percent, that a frontmost enemy fires after a march step.
pub const ENEMY_FIRE_PERCENT: u32 = 5;

pub const MYSTERY_SHIP_WIDTH: i32 = 32;
pub const MYSTERY_SHIP_HEIGHT: i32 = 14;
pub const MYSTERY_SHIP_SPEED: i32 = 2;
pub const MYSTERY_SHIP_Y: i32 = 5;
pub const MYSTERY_SHIP_POINTS: u32 = 100;
/// One in this many idle ticks the mystery ship appears.
pub const MYSTERY_SHIP_ODDS: u32 = 500;

// ── Small enums ───────────────────────────────────────────────────────────────

/// Enemy tier, derived from its grid row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Top,
    Middle,
    Bottom,
}

impl EnemyKind {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyKind::Top,
            1 | 2 => EnemyKind::Middle,
            _ => EnemyKind::Bottom,
        }
    }

    /// Index into `SpriteSet::enemies`.
    pub fn index(self) -> usize {
        match self {
            EnemyKind::Top => 0,
            EnemyKind::Middle => 1,
            EnemyKind::Bottom => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
    pub active: bool,
}

/// Fixed-capacity bullet slots.  Never grows after construction.
#[derive(Clone, Debug)]
pub struct BulletPool {
    slots: Vec<Bullet>,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Bullet::default(); capacity],
        }
    }

    /// Activate the first free slot at (x, y).  Returns false when full.
    pub fn fire(&mut self, x: i32, y: i32) -> bool {
        match self.slots.iter_mut().find(|b| !b.active) {
            Some(slot) => {
                *slot = Bullet { x, y, active: true };
                true
            }
            None => false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.active).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &Bullet> {
        self.slots.iter().filter(|b| b.active)
    }

    pub fn slots(&self) -> &[Bullet] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Bullet] {
        &mut self.slots
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub sprite: SpriteHandle,
    pub lives: u32,
    pub score: u32,
    /// `None` until the first shot.
    pub last_shot_ms: Option<u64>,
    pub bullets: BulletPool,
}

impl Ship {
    pub fn new(sprite: SpriteHandle, centre_x: i32, bullet_slots: usize) -> Self {
        let width = (sprite.width * SHIP_SCALE) as i32;
        let height = (sprite.height * SHIP_SCALE) as i32;
        let mut ship = Self {
            x: centre_x - width / 2,
            y: BOUNDARY_Y - height,
            width,
            height,
            sprite,
            lives: STARTING_LIVES,
            score: 0,
            last_shot_ms: None,
            bullets: BulletPool::new(bullet_slots),
        };
        ship.clamp_x(SCREEN_WIDTH);
        ship
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Keep the ship fully on screen.
    pub fn clamp_x(&mut self, screen_width: i32) {
        let max_x = (screen_width - self.width).max(0);
        self.x = self.x.clamp(0, max_x);
    }

    pub fn can_fire(&self, now_ms: u64) -> bool {
        self.last_shot_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= PLAYER_FIRE_COOLDOWN_MS)
    }
}

// ── Enemy formation ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub row: usize,
    pub col: usize,
    pub kind: EnemyKind,
    alive: bool,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Where the top-left corner of grid cell (row, col) starts each level.
pub fn cell_origin(row: usize, col: usize) -> (i32, i32) {
    (
        FORMATION_LEFT + col as i32 * (ENEMY_WIDTH + ENEMY_H_GAP),
        FORMATION_TOP + row as i32 * (ENEMY_HEIGHT + ENEMY_V_GAP),
    )
}

/// The enemy grid, moved as one body.  `alive_count` always equals the
/// number of cells with `alive == true`; cells only die through `kill`.
#[derive(Clone, Debug)]
pub struct Formation {
    rows: usize,
    cols: usize,
    cells: Vec<Enemy>,
    alive_count: usize,
    /// +1 right, −1 left.
    pub direction: i32,
    pub last_march_ms: u64,
    pub last_shot_ms: Option<u64>,
    pub bullets: BulletPool,
}

impl Formation {
    pub fn new(rows: usize, cols: usize, bullet_slots: usize, now_ms: u64) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = cell_origin(row, col);
                cells.push(Enemy {
                    x,
                    y,
                    row,
                    col,
                    kind: EnemyKind::for_row(row),
                    alive: true,
                });
            }
        }
        Self {
            rows,
            cols,
            alive_count: cells.len(),
            cells,
            direction: 1,
            last_march_ms: now_ms,
            last_shot_ms: None,
            bullets: BulletPool::new(bullet_slots),
        }
    }

    /// Repopulate every cell in place for a new level.
    pub fn reset(&mut self, now_ms: u64) {
        for enemy in &mut self.cells {
            let (x, y) = cell_origin(enemy.row, enemy.col);
            enemy.x = x;
            enemy.y = y;
            enemy.alive = true;
        }
        self.alive_count = self.cells.len();
        self.direction = 1;
        self.last_march_ms = now_ms;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn cells(&self) -> &[Enemy] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> &Enemy {
        &self.cells[row * self.cols + col]
    }

    /// Position access only; liveness is changed through `kill`.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Enemy {
        &mut self.cells[row * self.cols + col]
    }

    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.cells.iter().filter(|e| e.alive)
    }

    /// Mark a cell dead.  Returns its kind, or `None` if it was already dead.
    pub fn kill(&mut self, index: usize) -> Option<EnemyKind> {
        let enemy = self.cells.get_mut(index)?;
        if !enemy.alive {
            return None;
        }
        enemy.alive = false;
        self.alive_count -= 1;
        Some(enemy.kind)
    }

    /// Shift every alive cell; dead cells stay where they died.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for enemy in self.cells.iter_mut().filter(|e| e.alive) {
            enemy.x += dx;
            enemy.y += dy;
        }
    }

    /// True if an alive enemy touches the screen edge it is heading toward.
    pub fn at_leading_edge(&self, screen_width: i32) -> bool {
        self.alive().any(|e| {
            (self.direction > 0 && e.x + ENEMY_WIDTH >= screen_width)
                || (self.direction < 0 && e.x <= 0)
        })
    }

    /// The lowest alive enemy in `col`, the only one allowed to shoot.
    pub fn frontmost_in_column(&self, col: usize) -> Option<&Enemy> {
        (0..self.rows)
            .rev()
            .map(|row| self.cell(row, col))
            .find(|e| e.alive)
    }

    /// Bottom edge of the lowest alive enemy.
    pub fn lowest_edge(&self) -> Option<i32> {
        self.alive().map(|e| e.y + ENEMY_HEIGHT).max()
    }
}

// ── Mystery ship ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MysteryShip {
    pub active: bool,
    pub x: i32,
    pub y: i32,
    pub direction: i32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Owns every entity array and the sprite set; all
/// arrays are sized at setup and reused for the life of the game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// One ship per player (1 or 2).
    pub ships: Vec<Ship>,
    pub formation: Formation,
    pub mystery: MysteryShip,
    pub sprites: SpriteSet,
    /// Starts at 1.
    pub level: u32,
    pub status: GameStatus,
    /// Set when the formation reaches the players' row.
    pub invaded: bool,
    pub width: i32,
    pub height: i32,
    pub boundary_y: i32,
}

impl GameState {
    pub fn multiplayer(&self) -> bool {
        self.ships.len() > 1
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn best_score(&self) -> u32 {
        self.ships.iter().map(|s| s.score).max().unwrap_or(0)
    }
}
