use hero_kokaton::collision::{group_collide, resolve, sprite_collide};
use hero_kokaton::compute::{fire_beam, init_state, swing_sword, tick, update_boss, update_shield};
use hero_kokaton::config::Rules;
use hero_kokaton::entities::*;
use hero_kokaton::geometry::{Facing, Rect, Vec2};
use hero_kokaton::input::FrameInput;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    let mut s = init_state(Rules::default());
    s.tick = 1;
    s
}

fn beam_at(x: f32, y: f32) -> Beam {
    Beam {
        rect: Rect::centered(x, y, BEAM_SIZE.0, BEAM_SIZE.1),
        dir: Vec2::new(1.0, 0.0),
        facing: Facing::Right,
        speed: 10.0,
    }
}

fn bomb_at(x: f32, y: f32) -> Bomb {
    Bomb {
        rect: Rect::centered(x, y, 20.0, 20.0),
        dir: Vec2::new(0.0, 1.0),
        speed: 6.0,
        color: 0,
    }
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        rect: Rect::centered(x, y, ENEMY_SIZE.0, ENEMY_SIZE.1),
        vy: 0.0,
        hold_y: y,
        state: Descent::Holding,
        interval: 10_000,
        variant: 1,
    }
}

fn boss_at(x: f32, y: f32) -> Boss {
    Boss {
        rect: Rect::centered(x, y, BOSS_SIZE.0, BOSS_SIZE.1),
        vy: 0.0,
        hold_y: y,
        state: Descent::Holding,
        interval: 10_000,
        hp: 2,
        patrol_step: 3.0,
        patrol_offset: 0.0,
    }
}

fn shield_at(x: f32, y: f32) -> Shield {
    Shield {
        rect: Rect::centered(x, y, SHIELD_SIZE.0, SHIELD_SIZE.1),
        life: 3,
    }
}

// ── group_collide / sprite_collide ────────────────────────────────────────────

#[test]
fn killed_partner_matches_only_once_per_call() {
    // One beam overlapping two enemies destroys only the first one.
    let mut enemies = vec![enemy_at(300.0, 300.0), enemy_at(320.0, 300.0)];
    let mut beams = vec![beam_at(310.0, 300.0)];
    let hits = group_collide(&mut enemies, &mut beams, true, true, |_| {});
    assert_eq!(hits, 1);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].rect.cx, 320.0);
    assert!(beams.is_empty());
}

#[test]
fn kept_partner_can_match_several_members() {
    let mut enemies = vec![enemy_at(300.0, 300.0), enemy_at(320.0, 300.0)];
    let mut swords = vec![swing_sword(&make_state().player, 10)];
    swords[0].rect = Rect::centered(310.0, 300.0, 60.0, 24.0);
    let hits = group_collide(&mut enemies, &mut swords, true, false, |_| {});
    assert_eq!(hits, 2);
    assert!(enemies.is_empty());
    assert_eq!(swords.len(), 1);
}

#[test]
fn on_hit_runs_once_per_member_even_with_many_partners() {
    let mut bosses = vec![boss_at(500.0, 300.0)];
    let mut beams = vec![beam_at(480.0, 300.0), beam_at(520.0, 300.0)];
    let hits = group_collide(&mut bosses, &mut beams, false, true, |b| b.hp -= 1);
    assert_eq!(hits, 1);
    assert_eq!(bosses[0].hp, 1);
    assert!(beams.is_empty());
}

#[test]
fn touching_edges_do_not_collide() {
    let rect = Rect::centered(0.0, 0.0, 20.0, 20.0);
    let mut bombs = vec![bomb_at(20.0, 0.0)];
    assert_eq!(sprite_collide(&rect, &mut bombs, true), 0);
    assert_eq!(bombs.len(), 1);
}

// ── resolve: fixed order ──────────────────────────────────────────────────────

#[test]
fn beam_kill_drops_pickup_and_explosion_and_cheers() {
    let mut s = make_state();
    s.enemies.push(enemy_at(300.0, 200.0));
    s.beams.push(beam_at(300.0, 200.0));
    assert!(!resolve(&mut s));
    assert!(s.enemies.is_empty());
    assert!(s.beams.is_empty());
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(s.explosions[0].life, 100);
    assert_eq!(s.pickups.len(), 1);
    assert_eq!(s.hud.kills, 1);
    assert_eq!(s.boss_trigger, 1);
    assert_eq!(s.player.mood, Mood::Cheer);
    assert_eq!(s.hud.score, 0); // points only come from pickups
}

#[test]
fn beam_spent_on_enemy_cannot_also_hit_bomb() {
    let mut s = make_state();
    s.enemies.push(enemy_at(300.0, 200.0));
    s.bombs.push(bomb_at(300.0, 200.0));
    s.beams.push(beam_at(300.0, 200.0));
    resolve(&mut s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.bombs.len(), 1);
}

#[test]
fn beam_destroys_bomb() {
    let mut s = make_state();
    s.bombs.push(bomb_at(300.0, 200.0));
    s.beams.push(beam_at(300.0, 200.0));
    resolve(&mut s);
    assert!(s.bombs.is_empty());
    assert!(s.beams.is_empty());
    assert_eq!(s.explosions.len(), 1);
    assert!(s.pickups.is_empty());
}

#[test]
fn sword_kill_keeps_sword_and_skips_boss_trigger() {
    let mut s = make_state();
    s.enemies.push(enemy_at(300.0, 200.0));
    let mut sword = swing_sword(&s.player, 10);
    sword.rect = Rect::centered(300.0, 200.0, 60.0, 24.0);
    s.swords.push(sword);
    resolve(&mut s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.swords.len(), 1);
    assert_eq!(s.hud.kills, 1);
    assert_eq!(s.boss_trigger, 0);
    assert_eq!(s.pickups.len(), 1);
    assert_eq!(s.player.mood, Mood::Normal);
}

#[test]
fn sword_parry_leaves_short_explosion() {
    let mut s = make_state();
    s.bombs.push(bomb_at(300.0, 200.0));
    let mut sword = swing_sword(&s.player, 10);
    sword.rect = Rect::centered(300.0, 200.0, 60.0, 24.0);
    s.swords.push(sword);
    resolve(&mut s);
    assert!(s.bombs.is_empty());
    assert_eq!(s.swords.len(), 1);
    assert_eq!(s.explosions[0].life, 50);
}

#[test]
fn sword_breaks_on_boss() {
    let mut s = make_state();
    s.bosses.push(boss_at(300.0, 200.0));
    let mut sword = swing_sword(&s.player, 10);
    sword.rect = Rect::centered(300.0, 200.0, 60.0, 24.0);
    s.swords.push(sword);
    resolve(&mut s);
    assert_eq!(s.bosses[0].hp, 1);
    assert!(s.swords.is_empty());
    assert_eq!(s.hud.kills, 1);
    assert!(s.pickups.is_empty());
}

#[test]
fn boss_removed_on_the_update_after_its_last_hit() {
    let mut s = make_state();
    s.bosses.push(boss_at(300.0, 200.0));

    s.beams.push(beam_at(300.0, 200.0));
    resolve(&mut s);
    assert_eq!(s.bosses[0].hp, 1);
    s.bosses = s.bosses.iter().filter_map(|b| update_boss(b, 150.0)).collect();
    assert_eq!(s.bosses.len(), 1);

    // second hit, on a later tick
    let at = s.bosses[0].rect;
    s.beams.push(beam_at(at.cx, at.cy));
    resolve(&mut s);
    assert_eq!(s.bosses.len(), 1);
    assert_eq!(s.bosses[0].hp, 0);

    s.bosses = s.bosses.iter().filter_map(|b| update_boss(b, 150.0)).collect();
    assert!(s.bosses.is_empty());
}

#[test]
fn boss_hp_never_underflows() {
    let mut s = make_state();
    let mut boss = boss_at(300.0, 200.0);
    boss.hp = 1;
    s.bosses.push(boss);
    s.beams.push(beam_at(300.0, 200.0));
    let mut sword = swing_sword(&s.player, 10);
    sword.rect = Rect::centered(300.0, 200.0, 60.0, 24.0);
    s.swords.push(sword);
    resolve(&mut s);
    assert_eq!(s.bosses[0].hp, 0);
}

#[test]
fn pickups_score_ten_once_per_tick() {
    let mut s = make_state();
    let p = s.player.rect;
    for dx in [-10.0, 10.0] {
        s.pickups.push(Pickup {
            rect: Rect::centered(p.cx + dx, p.cy, PICKUP_SIZE.0, PICKUP_SIZE.1),
            age: 0,
        });
    }
    resolve(&mut s);
    assert!(s.pickups.is_empty());
    assert_eq!(s.hud.score, 10);
}

#[test]
fn several_bombs_cost_one_hit_point() {
    let mut s = make_state();
    let p = s.player.rect;
    s.bombs.push(bomb_at(p.cx - 5.0, p.cy));
    s.bombs.push(bomb_at(p.cx + 5.0, p.cy));
    assert!(!resolve(&mut s));
    assert_eq!(s.player.hp, 2);
    assert!(s.bombs.is_empty());
}

#[test]
fn lethal_hit_stops_resolution() {
    let mut s = make_state();
    s.player.hp = 1;
    let p = s.player.rect;
    s.bombs.push(bomb_at(p.cx, p.cy));
    s.shields.push(shield_at(1200.0, 700.0));
    s.bombs.push(bomb_at(1200.0, 700.0));
    assert!(resolve(&mut s));
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.player.mood, Mood::Sad);
    // the shield test never ran
    assert_eq!(s.shields[0].life, 3);
    assert_eq!(s.bombs.len(), 1);
}

#[test]
fn bomb_reaching_player_and_shield_hits_player_first() {
    let mut s = make_state();
    let p = s.player.rect;
    s.shields.push(shield_at(p.cx, p.cy));
    s.bombs.push(bomb_at(p.cx, p.cy));
    resolve(&mut s);
    assert_eq!(s.player.hp, 2);
    assert_eq!(s.shields[0].life, 3);
}

#[test]
fn shield_absorbs_three_hits_then_goes_away() {
    let mut s = make_state();
    s.shields.push(shield_at(1200.0, 700.0));
    for expected in [2, 1, 0] {
        s.bombs.push(bomb_at(1200.0, 700.0));
        resolve(&mut s);
        assert!(s.bombs.is_empty());
        assert_eq!(s.shields.len(), 1);
        assert_eq!(s.shields[0].life, expected);
        assert_eq!(update_shield(&s.shields[0], &s.player).is_some(), expected > 0);
    }
    assert_eq!(s.player.hp, 3);
}

#[test]
fn shield_loses_one_life_per_tick_however_many_bombs() {
    let mut s = make_state();
    s.shields.push(shield_at(1200.0, 700.0));
    s.bombs.push(bomb_at(1190.0, 700.0));
    s.bombs.push(bomb_at(1210.0, 700.0));
    resolve(&mut s);
    assert!(s.bombs.is_empty());
    assert_eq!(s.shields[0].life, 2);
}

// ── Through the tick ──────────────────────────────────────────────────────────

#[test]
fn beam_that_left_the_screen_hits_nothing_afterwards() {
    let mut s = make_state();
    // right edge at 1595: the next step carries it to 1605 and off screen
    s.beams.push(beam_at(1557.5, 300.0));
    // just beyond the beam now, overlapping where it would be after moving
    s.enemies.push(enemy_at(1631.0, 300.0));
    let mut rng = StdRng::seed_from_u64(7);

    s = tick(&s, &FrameInput::default(), &mut rng);
    assert!(s.beams.is_empty());
    assert_eq!(s.enemies.len(), 1);

    s = tick(&s, &FrameInput::default(), &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.hud.kills, 0);
}

#[test]
fn second_beam_kill_summons_boss_next_tick() {
    let mut s = make_state();
    let mut rng = StdRng::seed_from_u64(3);
    s.enemies.push(enemy_at(300.0, 200.0));
    s.enemies.push(enemy_at(600.0, 200.0));
    s.beams.push(beam_at(300.0, 200.0));
    s.beams.push(beam_at(600.0, 200.0));

    s = tick(&s, &FrameInput::default(), &mut rng);
    assert_eq!(s.boss_trigger, 2);
    assert!(s.bosses.is_empty());

    s = tick(&s, &FrameInput::default(), &mut rng);
    assert_eq!(s.bosses.len(), 1);
    assert_eq!(s.boss_trigger, 3);
}

#[test]
fn fired_beam_can_hit_on_its_first_tick() {
    let mut s = make_state();
    let beam = fire_beam(&s.player, 10.0);
    s.enemies.push(enemy_at(beam.rect.cx, beam.rect.cy));
    let s2 = tick(
        &s,
        &FrameInput { fire: true, ..FrameInput::default() },
        &mut StdRng::seed_from_u64(1),
    );
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.hud.kills, 1);
}
