/// All game entity types: plain data plus a few read-only queries.
///
/// Behaviour lives in `compute` (per-entity updates, spawning, the tick) and
/// `collision` (group-vs-group tests).
use crate::config::Rules;
use crate::geometry::{Facing, Rect, Vec2};
use crate::hud::Hud;

// ── Sprite extents (world pixels) ────────────────────────────────────────────

pub const PLAYER_SIZE: (f32, f32) = (72.0, 72.0);
/// Unrotated beam; the live box is this rotated to the firing direction.
pub const BEAM_SIZE: (f32, f32) = (75.0, 30.0);
pub const SWORD_SIZE: (f32, f32) = (60.0, 24.0);
pub const BOMB_RADIUS: f32 = 10.0;
pub const ENEMY_SIZE: (f32, f32) = (70.0, 70.0);
pub const BOSS_SIZE: (f32, f32) = (150.0, 150.0);
pub const PICKUP_SIZE: (f32, f32) = (40.0, 40.0);
pub const SHIELD_SIZE: (f32, f32) = (90.0, 90.0);
pub const EXPLOSION_SIZE: (f32, f32) = (100.0, 90.0);

/// Number of distinct bomb colours.
pub const BOMB_COLORS: usize = 6;
/// Number of distinct enemy looks.
pub const ENEMY_VARIANTS: u8 = 3;

// ── Status ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Expression shown on the hero's sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    Normal,
    /// After a beam kill; lasts until the hero moves again.
    Cheer,
    /// Defeated.
    Sad,
}

/// Enemy and boss movement phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Descent {
    Descending,
    Holding,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub mood: Mood,
}

impl Player {
    /// One hit point less, never below zero.
    pub fn take_damage(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

// ── Weapons ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Beam {
    pub rect: Rect,
    pub dir: Vec2,
    pub facing: Facing,
    pub speed: f32,
}

#[derive(Clone, Debug)]
pub struct Sword {
    pub rect: Rect,
    /// Offset direction from the hero, fixed when swung.
    pub dir: Vec2,
    pub facing: Facing,
    /// Updates left before the sword is put away.
    pub life: u32,
}

#[derive(Clone, Debug)]
pub struct Shield {
    pub rect: Rect,
    /// Hits left; removed by the update that sees zero.
    pub life: u32,
}

// ── Hostiles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bomb {
    pub rect: Rect,
    /// Unit vector fixed at spawn; only its signs change, on bounces.
    pub dir: Vec2,
    pub speed: f32,
    pub color: usize,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    pub vy: f32,
    /// Center altitude past which the enemy stops.
    pub hold_y: f32,
    pub state: Descent,
    /// Bombs drop on ticks that are multiples of this.
    pub interval: u64,
    pub variant: u8,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub rect: Rect,
    pub vy: f32,
    pub hold_y: f32,
    pub state: Descent,
    pub interval: u64,
    pub hp: u32,
    /// Signed patrol speed while holding.
    pub patrol_step: f32,
    /// Vertical distance covered since the last patrol reversal.
    pub patrol_offset: f32,
}

/// Drops a bomb on this tick?  Only holding spawners drop.
pub fn drops_bomb(state: Descent, interval: u64, tick: u64) -> bool {
    state == Descent::Holding && interval != 0 && tick % interval == 0
}

// ── Effects & pickups ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Pickup {
    pub rect: Rect,
    /// Ticks alive; drives the flicker.
    pub age: u32,
}

impl Pickup {
    pub fn flipped(&self) -> bool {
        (self.age / 50) % 2 == 1
    }
}

#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    pub life: u32,
}

impl Explosion {
    pub fn flipped(&self) -> bool {
        (self.life / 10) % 2 == 1
    }
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so the tick can return a new copy
/// without mutating its input.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub beams: Vec<Beam>,
    pub swords: Vec<Sword>,
    pub shields: Vec<Shield>,
    pub bombs: Vec<Bomb>,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
    pub pickups: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub hud: Hud,
    /// Beam kills counted toward the next boss.
    pub boss_trigger: u32,
    pub rules: Rules,
    pub status: GameStatus,
    pub tick: u64,
    /// Background scroll offset.
    pub scroll: u32,
}
