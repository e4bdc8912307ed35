/// Group-vs-group collision tests and the fixed per-tick resolution order.
use log::{debug, info};

use crate::compute::{drop_pickup, explode, EXPLOSION_LIFE, EXPLOSION_LIFE_SHORT};
use crate::entities::{
    Beam, Bomb, Boss, Enemy, GameState, GameStatus, Mood, Pickup, Shield, Sword,
};
use crate::geometry::Rect;

/// Anything with a collision box.
pub trait Collider {
    fn rect(&self) -> &Rect;
}

macro_rules! impl_collider {
    ($($ty:ty),* $(,)?) => {
        $(impl Collider for $ty {
            fn rect(&self) -> &Rect {
                &self.rect
            }
        })*
    };
}

impl_collider!(Beam, Sword, Shield, Bomb, Enemy, Boss, Pickup);

/// Test every member of `group_a` against `group_b`, in order.
///
/// For each member of A the intersecting members of B are found; when
/// `kill_b` is set they are removed on the spot, so later members of A can no
/// longer match them.  `on_hit` runs once for each A member with at least one
/// partner, before that member is removed (when `kill_a` is set).  Returns the
/// number of A members hit.
pub fn group_collide<A, B, F>(
    group_a: &mut Vec<A>,
    group_b: &mut Vec<B>,
    kill_a: bool,
    kill_b: bool,
    mut on_hit: F,
) -> usize
where
    A: Collider,
    B: Collider,
    F: FnMut(&mut A),
{
    let mut hits = 0;
    group_a.retain_mut(|a| {
        let partners = sprite_collide(a.rect(), group_b, kill_b);
        if partners == 0 {
            return true;
        }
        hits += 1;
        on_hit(a);
        !kill_a
    });
    hits
}

/// Count the members of `group` intersecting `rect`, removing them when
/// `kill` is set.
pub fn sprite_collide<B: Collider>(rect: &Rect, group: &mut Vec<B>, kill: bool) -> usize {
    if kill {
        let before = group.len();
        group.retain(|b| !rect.intersects(b.rect()));
        before - group.len()
    } else {
        group.iter().filter(|b| rect.intersects(b.rect())).count()
    }
}

/// Run every collision test for one tick, in the fixed order.  Returns
/// `true` if the hero was defeated, in which case the remaining tests are
/// skipped.
pub fn resolve(state: &mut GameState) -> bool {
    let pickup_points = state.rules.progression.pickup_points;
    let mut blasts: Vec<(Rect, u32)> = Vec::new();
    let mut drops: Vec<Rect> = Vec::new();

    // 1. beam vs enemy
    let enemy_kills = group_collide(&mut state.enemies, &mut state.beams, true, true, |e| {
        blasts.push((e.rect, EXPLOSION_LIFE));
        drops.push(e.rect);
    });
    if enemy_kills > 0 {
        state.player.mood = Mood::Cheer;
        state.boss_trigger += enemy_kills as u32;
        state.hud.kills += enemy_kills as u32;
        debug!("beam destroyed {enemy_kills} enemies");
    }

    // 2. beam vs boss
    let boss_hits = group_collide(&mut state.bosses, &mut state.beams, false, true, |b| {
        b.hp = b.hp.saturating_sub(1);
        blasts.push((b.rect, EXPLOSION_LIFE));
        drops.push(b.rect);
    });
    state.hud.kills += boss_hits as u32;

    // 3. beam vs bomb
    group_collide(&mut state.bombs, &mut state.beams, true, true, |b| {
        blasts.push((b.rect, EXPLOSION_LIFE));
    });

    // 4. sword vs enemy
    let slain = group_collide(&mut state.enemies, &mut state.swords, true, false, |e| {
        blasts.push((e.rect, EXPLOSION_LIFE));
        drops.push(e.rect);
    });
    state.hud.kills += slain as u32;

    // 5. sword vs bomb
    group_collide(&mut state.bombs, &mut state.swords, true, false, |b| {
        blasts.push((b.rect, EXPLOSION_LIFE_SHORT));
    });

    // 6. sword vs boss: the sword breaks on the boss
    let boss_slashes = group_collide(&mut state.bosses, &mut state.swords, false, true, |b| {
        b.hp = b.hp.saturating_sub(1);
        blasts.push((b.rect, EXPLOSION_LIFE));
    });
    state.hud.kills += boss_slashes as u32;

    if boss_hits + boss_slashes > 0 {
        debug!("boss hit {} times", boss_hits + boss_slashes);
    }

    state
        .explosions
        .extend(blasts.into_iter().map(|(rect, life)| explode(&rect, life)));
    state.pickups.extend(drops.iter().map(drop_pickup));

    // 7. hero vs pickup
    if sprite_collide(&state.player.rect, &mut state.pickups, true) > 0 {
        state.hud.score += pickup_points;
    }

    // 8. hero vs bomb
    if sprite_collide(&state.player.rect, &mut state.bombs, true) > 0 {
        state.player.take_damage();
        debug!("hero hit, {} hp left", state.player.hp);
        if state.player.is_defeated() {
            state.player.mood = Mood::Sad;
            state.status = GameStatus::GameOver;
            info!(
                "hero defeated at tick {} with score {}",
                state.tick, state.hud.score
            );
            return true;
        }
    }

    // 9. shield vs bomb
    group_collide(&mut state.shields, &mut state.bombs, false, true, |s| {
        s.life = s.life.saturating_sub(1);
    });

    false
}
