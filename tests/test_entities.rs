use std::rc::Rc;

use knob_invaders::entities::*;
use knob_invaders::sprite::{BuiltinSprites, SpriteSet};

fn builtin_sprites(players: usize) -> SpriteSet {
    SpriteSet::load(&BuiltinSprites, players).unwrap()
}

#[test]
fn enemy_kind_follows_row() {
    assert_eq!(EnemyKind::for_row(0), EnemyKind::Top);
    assert_eq!(EnemyKind::for_row(1), EnemyKind::Middle);
    assert_eq!(EnemyKind::for_row(2), EnemyKind::Middle);
    assert_eq!(EnemyKind::for_row(3), EnemyKind::Bottom);
    assert_eq!(EnemyKind::for_row(5), EnemyKind::Bottom);
}

// ── BulletPool ────────────────────────────────────────────────────────────────

#[test]
fn pool_fills_first_free_slot() {
    let mut pool = BulletPool::new(3);
    assert!(pool.fire(1, 1));
    assert!(pool.fire(2, 2));
    pool.slots_mut()[0].active = false;
    assert!(pool.fire(3, 3));
    assert_eq!(pool.slots()[0], Bullet { x: 3, y: 3, active: true });
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn pool_never_grows() {
    let mut pool = BulletPool::new(2);
    assert!(pool.fire(0, 0));
    assert!(pool.fire(0, 0));
    assert!(!pool.fire(0, 0));
    assert_eq!(pool.capacity(), 2);
    assert_eq!(pool.slots().len(), 2);
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[test]
fn ship_size_is_scaled_sprite() {
    let sprites = builtin_sprites(1);
    let ship = Ship::new(Rc::clone(&sprites.ships[0]), 240, 4);
    assert_eq!(ship.width as u32, sprites.ships[0].width * SHIP_SCALE);
    assert_eq!(ship.height as u32, sprites.ships[0].height * SHIP_SCALE);
    assert_eq!(ship.y, BOUNDARY_Y - ship.height);
    assert!(ship.is_alive());
    assert!(ship.can_fire(0));
}

#[test]
fn ship_near_edge_is_clamped_on_creation() {
    let sprites = builtin_sprites(1);
    let ship = Ship::new(Rc::clone(&sprites.ships[0]), 0, 4);
    assert_eq!(ship.x, 0);
    let ship = Ship::new(Rc::clone(&sprites.ships[0]), SCREEN_WIDTH, 4);
    assert_eq!(ship.x + ship.width, SCREEN_WIDTH);
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[test]
fn formation_layout() {
    let f = Formation::new(5, 10, 5, 0);
    assert_eq!(f.alive_count(), 50);
    assert_eq!(f.cells().len(), 50);
    assert_eq!(f.direction, 1);
    assert_eq!((f.cell(0, 0).x, f.cell(0, 0).y), (FORMATION_LEFT, FORMATION_TOP));
    let e = f.cell(2, 3);
    assert_eq!((e.row, e.col), (2, 3));
    assert_eq!(e.x, FORMATION_LEFT + 3 * (ENEMY_WIDTH + ENEMY_H_GAP));
    assert_eq!(e.y, FORMATION_TOP + 2 * (ENEMY_HEIGHT + ENEMY_V_GAP));
    assert_eq!(e.kind, EnemyKind::Middle);
}

#[test]
fn kill_keeps_alive_count_in_step() {
    let mut f = Formation::new(2, 3, 5, 0);
    assert_eq!(f.kill(4), Some(EnemyKind::Middle));
    assert_eq!(f.kill(4), None);
    assert_eq!(f.kill(99), None);
    assert_eq!(f.alive_count(), 5);
    assert_eq!(f.alive().count(), f.alive_count());
}

#[test]
fn translate_leaves_dead_cells() {
    let mut f = Formation::new(1, 2, 5, 0);
    f.kill(0);
    let dead_x = f.cell(0, 0).x;
    f.translate(8, 4);
    assert_eq!(f.cell(0, 0).x, dead_x);
    assert_eq!(f.cell(0, 1).x, cell_origin(0, 1).0 + 8);
    assert_eq!(f.cell(0, 1).y, cell_origin(0, 1).1 + 4);
}

#[test]
fn frontmost_is_lowest_alive() {
    let mut f = Formation::new(3, 2, 5, 0);
    assert_eq!(f.frontmost_in_column(0).map(|e| e.row), Some(2));
    f.kill(2 * 2); // row 2, col 0
    assert_eq!(f.frontmost_in_column(0).map(|e| e.row), Some(1));
    f.kill(2);
    f.kill(0);
    assert!(f.frontmost_in_column(0).is_none());
    assert_eq!(f.frontmost_in_column(1).map(|e| e.row), Some(2));
}

#[test]
fn leading_edge_ignores_dead_cells() {
    let mut f = Formation::new(1, 2, 5, 0);
    f.cell_mut(0, 1).x = SCREEN_WIDTH - ENEMY_WIDTH;
    assert!(f.at_leading_edge(SCREEN_WIDTH));
    f.kill(1);
    assert!(!f.at_leading_edge(SCREEN_WIDTH));

    f.direction = -1;
    f.cell_mut(0, 0).x = 0;
    assert!(f.at_leading_edge(SCREEN_WIDTH));
}

#[test]
fn lowest_edge_tracks_alive_cells() {
    let mut f = Formation::new(2, 1, 5, 0);
    let bottom = cell_origin(1, 0).1 + ENEMY_HEIGHT;
    assert_eq!(f.lowest_edge(), Some(bottom));
    f.kill(1);
    assert_eq!(f.lowest_edge(), Some(cell_origin(0, 0).1 + ENEMY_HEIGHT));
    f.kill(0);
    assert_eq!(f.lowest_edge(), None);
}

#[test]
fn reset_repopulates_in_place() {
    let mut f = Formation::new(2, 2, 5, 0);
    f.translate(40, 16);
    f.direction = -1;
    f.kill(0);
    f.kill(3);
    f.reset(900);
    assert_eq!(f.alive_count(), 4);
    assert_eq!(f.direction, 1);
    assert_eq!(f.last_march_ms, 900);
    for e in f.cells() {
        assert!(e.is_alive());
        assert_eq!((e.x, e.y), cell_origin(e.row, e.col));
    }
}
