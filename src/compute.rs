/// Game-logic functions.
///
/// Spawners and per-entity updates take immutable references and return new
/// values; `tick` clones the incoming `GameState`, advances the copy by one
/// frame and returns it.  All randomness comes through the injected RNG.
use log::{debug, info};
use rand::Rng;

use crate::collision;
use crate::config::Rules;
use crate::entities::{
    drops_bomb, Beam, Bomb, Boss, Descent, Enemy, Explosion, GameState, GameStatus, Mood, Pickup,
    Player, Shield, Sword, BEAM_SIZE, BOMB_COLORS, BOMB_RADIUS, BOSS_SIZE, ENEMY_SIZE,
    ENEMY_VARIANTS, EXPLOSION_SIZE, PICKUP_SIZE, PLAYER_SIZE, SHIELD_SIZE, SWORD_SIZE,
};
use crate::geometry::{check_bound, orientation, rotated_extent, Facing, Rect, Vec2};
use crate::hud::Hud;
use crate::input::{FrameInput, HeldKeys};

/// Lifetime of an explosion left by a kill or a beam hit.
pub const EXPLOSION_LIFE: u32 = 100;
/// Lifetime of the smaller blast left by a sword parrying a bomb.
pub const EXPLOSION_LIFE_SHORT: u32 = 50;
/// The background repeats every this many scroll steps.
pub const SCROLL_WRAP: u32 = 3200;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state.
pub fn init_state(rules: Rules) -> GameState {
    let (w, h) = PLAYER_SIZE;
    GameState {
        player: Player {
            rect: Rect::centered(rules.player.start_x, rules.player.start_y, w, h),
            facing: Facing::Right,
            speed: rules.player.speed,
            hp: rules.player.max_hp,
            max_hp: rules.player.max_hp,
            mood: Mood::Normal,
        },
        beams: Vec::new(),
        swords: Vec::new(),
        shields: Vec::new(),
        bombs: Vec::new(),
        enemies: Vec::new(),
        bosses: Vec::new(),
        pickups: Vec::new(),
        explosions: Vec::new(),
        hud: Hud::default(),
        boss_trigger: 0,
        rules,
        status: GameStatus::Playing,
        tick: 0,
        scroll: 0,
    }
}

/// Center of a weapon held one hero-extent away from the hero along `dir`.
fn held_at(player: &Player, dir: Vec2) -> (f32, f32) {
    (
        player.rect.cx + player.rect.w * dir.x,
        player.rect.cy + player.rect.h * dir.y,
    )
}

pub fn fire_beam(player: &Player, speed: f32) -> Beam {
    let facing = player.facing;
    let dir = facing.unit();
    let (w, h) = rotated_extent(BEAM_SIZE.0, BEAM_SIZE.1, facing.angle());
    let (cx, cy) = held_at(player, dir);
    Beam {
        rect: Rect::centered(cx, cy, w, h),
        dir,
        facing,
        speed,
    }
}

pub fn swing_sword(player: &Player, life: u32) -> Sword {
    let facing = player.facing;
    let dir = facing.unit();
    let (w, h) = rotated_extent(SWORD_SIZE.0, SWORD_SIZE.1, facing.angle());
    let (cx, cy) = held_at(player, dir);
    Sword {
        rect: Rect::centered(cx, cy, w, h),
        dir,
        facing,
        life,
    }
}

pub fn raise_shield(player: &Player, life: u32) -> Shield {
    let (w, h) = SHIELD_SIZE;
    Shield {
        rect: Rect::centered(player.rect.cx, player.rect.cy, w, h),
        life,
    }
}

pub fn spawn_enemy(rules: &Rules, rng: &mut impl Rng) -> Enemy {
    let width = rules.screen.width as i32;
    let height = rules.screen.height as i32;
    let margin = rules.enemy.spawn_margin;
    let x = rng.gen_range(margin..=width - margin) as f32;
    let hold_y = rng.gen_range(rules.enemy.hold_margin..=height - rules.enemy.hold_margin) as f32;
    let interval = rng.gen_range(rules.enemy.drop_interval_min..=rules.enemy.drop_interval_max);
    let variant = rng.gen_range(0..ENEMY_VARIANTS);
    Enemy {
        rect: Rect::centered(x, 0.0, ENEMY_SIZE.0, ENEMY_SIZE.1),
        vy: rules.enemy.speed,
        hold_y,
        state: Descent::Descending,
        interval,
        variant,
    }
}

pub fn spawn_boss(rules: &Rules, rng: &mut impl Rng) -> Boss {
    let width = rules.screen.width as i32;
    let height = rules.screen.height as i32;
    let x = rng.gen_range(0..=width) as f32;
    let hold_y = rng.gen_range(rules.boss.hold_min..=height / 2) as f32;
    let interval = rng.gen_range(rules.enemy.drop_interval_min..=rules.enemy.drop_interval_max);
    Boss {
        rect: Rect::centered(x, 0.0, BOSS_SIZE.0, BOSS_SIZE.1),
        vy: rules.boss.speed,
        hold_y,
        state: Descent::Descending,
        interval,
        hp: rules.boss.hp,
        patrol_step: rules.boss.patrol_speed,
        patrol_offset: 0.0,
    }
}

/// A bomb released from the bottom-center of `spawner`, aimed once at
/// `target`.  A spawner sitting exactly on the target drops straight down.
pub fn drop_bomb(spawner: &Rect, target: &Rect, speed: f32, rng: &mut impl Rng) -> Bomb {
    let dir = orientation(spawner, target).unwrap_or(Vec2::new(0.0, 1.0));
    let size = 2.0 * BOMB_RADIUS;
    Bomb {
        rect: Rect::centered(spawner.cx, spawner.cy + spawner.h / 2.0, size, size),
        dir,
        speed,
        color: rng.gen_range(0..BOMB_COLORS),
    }
}

pub fn explode(at: &Rect, life: u32) -> Explosion {
    Explosion {
        rect: Rect::centered(at.cx, at.cy, EXPLOSION_SIZE.0, EXPLOSION_SIZE.1),
        life,
    }
}

pub fn drop_pickup(at: &Rect) -> Pickup {
    Pickup {
        rect: Rect::centered(at.cx, at.cy, PICKUP_SIZE.0, PICKUP_SIZE.1),
        age: 0,
    }
}

// ── Per-entity updates ───────────────────────────────────────────────────────

/// Move the hero one step per held key, scaled by speed.  If the moved box
/// leaves the screen on either axis the whole step is undone.  Facing follows
/// the net key direction even when the step is undone.
pub fn move_player(player: &Player, keys: &HeldKeys, width: f32, height: f32) -> Player {
    let (dx, dy) = keys.net();
    let mut moved = player.clone();
    moved
        .rect
        .translate(dx as f32 * player.speed, dy as f32 * player.speed);
    if check_bound(&moved.rect, width, height) != (true, true) {
        moved.rect = player.rect;
    }
    if let Some(facing) = Facing::from_delta(dx, dy) {
        moved.facing = facing;
        if moved.mood == Mood::Cheer {
            moved.mood = Mood::Normal;
        }
    }
    moved
}

/// `None` once the beam has left the screen on either axis.
pub fn update_beam(beam: &Beam, width: f32, height: f32) -> Option<Beam> {
    let mut next = beam.clone();
    next.rect
        .translate(beam.speed * beam.dir.x, beam.speed * beam.dir.y);
    if check_bound(&next.rect, width, height) != (true, true) {
        return None;
    }
    Some(next)
}

/// Re-anchor the sword on the hero and burn one tick of its life.
pub fn update_sword(sword: &Sword, player: &Player) -> Option<Sword> {
    let life = sword.life.saturating_sub(1);
    if life == 0 {
        return None;
    }
    let (cx, cy) = held_at(player, sword.dir);
    Some(Sword {
        rect: Rect::centered(cx, cy, sword.rect.w, sword.rect.h),
        life,
        ..sword.clone()
    })
}

/// Follow the hero; a shield with no hits left is dropped.
pub fn update_shield(shield: &Shield, player: &Player) -> Option<Shield> {
    if shield.life == 0 {
        return None;
    }
    Some(Shield {
        rect: Rect::centered(player.rect.cx, player.rect.cy, shield.rect.w, shield.rect.h),
        life: shield.life,
    })
}

/// Advance the bomb, then point each axis whose screen edge it is past back
/// toward the inside.  A bomb released beyond an edge drifts back in instead
/// of flipping on every tick.
pub fn update_bomb(bomb: &Bomb, width: f32, height: f32) -> Bomb {
    let mut next = bomb.clone();
    next.rect
        .translate(bomb.speed * bomb.dir.x, bomb.speed * bomb.dir.y);
    let (horizontal, vertical) = check_bound(&next.rect, width, height);
    if !horizontal {
        next.dir.x = inward(next.dir.x, next.rect.left() < 0.0);
    }
    if !vertical {
        next.dir.y = inward(next.dir.y, next.rect.top() < 0.0);
    }
    next
}

/// Velocity component pointing away from the near edge (`low` for the
/// left/top edge).
fn inward(component: f32, low: bool) -> f32 {
    if low {
        component.abs()
    } else {
        -component.abs()
    }
}

/// Stop for good once past the hold altitude; otherwise keep descending.
pub fn update_enemy(enemy: &Enemy) -> Enemy {
    let mut next = enemy.clone();
    if next.rect.cy > next.hold_y {
        next.vy = 0.0;
        next.state = Descent::Holding;
    }
    next.rect.cy += next.vy;
    next
}

/// Descend like an enemy, then patrol up and down.  A boss whose hit points
/// reached zero is removed here rather than at the moment of the hit.
pub fn update_boss(boss: &Boss, band: f32) -> Option<Boss> {
    let mut next = boss.clone();
    if next.rect.cy > next.hold_y {
        next.vy = 0.0;
        next.state = Descent::Holding;
    }
    next.rect.cy += next.vy;
    if next.hp == 0 {
        return None;
    }
    if next.state == Descent::Holding {
        next.rect.cy += next.patrol_step;
        next.patrol_offset += next.patrol_step;
    }
    if next.patrol_offset >= band {
        next.patrol_step = -next.patrol_step.abs();
        next.patrol_offset = 0.0;
    } else if next.patrol_offset <= -band {
        next.patrol_step = next.patrol_step.abs();
        next.patrol_offset = 0.0;
    }
    Some(next)
}

pub fn update_pickup(pickup: &Pickup) -> Pickup {
    Pickup {
        age: pickup.age + 1,
        ..pickup.clone()
    }
}

pub fn update_explosion(explosion: &Explosion) -> Option<Explosion> {
    let life = explosion.life.saturating_sub(1);
    if life == 0 {
        return None;
    }
    Some(Explosion {
        life,
        ..explosion.clone()
    })
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Order: player actions, spawning,
/// collisions, movement.  Once the hero is defeated the returned state has
/// status `GameOver` and further calls leave it untouched.
pub fn tick(state: &GameState, input: &FrameInput, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let rules = state.rules;
    let t = state.tick;
    let (width, height) = (rules.width(), rules.height());
    let mut next = state.clone();

    // ── 1. Player actions ────────────────────────────────────────────────────
    if input.fire && next.hud.cooldown.is_ready() {
        next.beams.push(fire_beam(&next.player, rules.weapons.beam_speed));
        next.hud.cooldown.start();
        debug!("beam fired {:?} at tick {t}", next.player.facing);
    }
    if input.swing {
        next.swords.push(swing_sword(&next.player, rules.weapons.sword_life));
        debug!("sword swung {:?} at tick {t}", next.player.facing);
    }
    if input.raise_shield && next.hud.shield_available(rules.weapons.shield_cost) {
        next.shields.push(raise_shield(&next.player, rules.weapons.shield_life));
        next.hud.shields_used += 1;
        debug!("shield raised, {} used", next.hud.shields_used);
    }

    // ── 2. Boss arrival ──────────────────────────────────────────────────────
    if next.boss_trigger != 0 && next.boss_trigger % rules.boss.trigger_kills == 0 {
        let boss = spawn_boss(&rules, rng);
        info!("boss incoming at x={} (tick {t})", boss.rect.cx);
        next.bosses.push(boss);
        next.boss_trigger += 1;
    }

    let target = next.player.rect;
    let bomb_speed = rules.enemy.bomb_speed;

    // ── 3. Boss bombs ────────────────────────────────────────────────────────
    let boss_bombs: Vec<Bomb> = next
        .bosses
        .iter()
        .filter(|b| drops_bomb(b.state, b.interval, t))
        .map(|b| drop_bomb(&b.rect, &target, bomb_speed, rng))
        .collect();
    next.bombs.extend(boss_bombs);

    // ── 4. Enemy waves ───────────────────────────────────────────────────────
    let every = rules.enemy.spawn_every;
    if t % every == 0 {
        next.enemies.push(spawn_enemy(&rules, rng));
        debug!("enemy spawned at tick {t}");
    }
    if next.hud.difficulty >= rules.progression.surge_level && (t + every / 2) % every == 0 {
        next.enemies.push(spawn_enemy(&rules, rng));
        debug!("surge enemy spawned at tick {t}");
    }

    // ── 5. Difficulty ────────────────────────────────────────────────────────
    if t % rules.progression.level_every == 0
        && next.hud.difficulty_up(rules.progression.max_level)
    {
        info!("difficulty raised to {}", next.hud.difficulty);
    }

    // ── 6. Enemy bombs ───────────────────────────────────────────────────────
    let enemy_bombs: Vec<Bomb> = next
        .enemies
        .iter()
        .filter(|e| drops_bomb(e.state, e.interval, t))
        .map(|e| drop_bomb(&e.rect, &target, bomb_speed, rng))
        .collect();
    if !enemy_bombs.is_empty() {
        debug!("{} bombs dropped at tick {t}", enemy_bombs.len());
    }
    next.bombs.extend(enemy_bombs);

    // ── 7. Collisions ────────────────────────────────────────────────────────
    if collision::resolve(&mut next) {
        return next;
    }

    // ── 8. Movement & lifetimes ──────────────────────────────────────────────
    next.player = move_player(&next.player, &input.held, width, height);
    next.beams = next
        .beams
        .iter()
        .filter_map(|b| update_beam(b, width, height))
        .collect();
    next.swords = next
        .swords
        .iter()
        .filter_map(|s| update_sword(s, &next.player))
        .collect();
    next.enemies = next.enemies.iter().map(update_enemy).collect();
    next.bosses = next
        .bosses
        .iter()
        .filter_map(|b| update_boss(b, rules.boss.patrol_band))
        .collect();
    next.bombs = next
        .bombs
        .iter()
        .map(|b| update_bomb(b, width, height))
        .collect();
    next.pickups = next.pickups.iter().map(update_pickup).collect();
    next.explosions = next.explosions.iter().filter_map(update_explosion).collect();
    next.hud.cooldown.advance(t, rules.weapons.beam_cooldown);
    next.shields = next
        .shields
        .iter()
        .filter_map(|s| update_shield(s, &next.player))
        .collect();

    next.tick = t + 1;
    next.scroll = (next.scroll + 1) % SCROLL_WRAP;
    next
}
