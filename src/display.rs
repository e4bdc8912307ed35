/// Terminal renderer for the play field and the title card.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only projects the
/// world (1600x900 by default) onto the terminal grid and emits commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use hero_kokaton::compute::SCROLL_WRAP;
use hero_kokaton::entities::{
    Beam, Bomb, Boss, Enemy, Explosion, GameState, GameStatus, Mood, Pickup, Shield, Sword,
};
use hero_kokaton::geometry::Facing;
use hero_kokaton::hud::{health_bar_width, CooldownPhase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_STAR: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Blue;
const C_HUD_LEVEL: Color = Color::Red;
const C_HUD_HP: Color = Color::Blue;
const C_HUD_SHIELD: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_PLAYER_CHEER: Color = Color::Yellow;
const C_PLAYER_SAD: Color = Color::Blue;
const C_BEAM: Color = Color::Cyan;
const C_SWORD: Color = Color::White;
const C_BOSS: Color = Color::Red;
const C_BOSS_HURT: Color = Color::DarkRed;
const C_PICKUP: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

const BOMB_PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
];

const ENEMY_LOOKS: [(&str, Color); 3] = [
    ("«▼»", Color::Green),
    ("(◎)", Color::Red),
    ("<Ψ>", Color::Magenta),
];

const STAR_COUNT: u32 = 40;
const HP_BAR_CELLS: u32 = 10;
/// World pixels per cooldown-bar cell.
const COOLDOWN_CELL: u32 = 10;
const READY_BAR_CELLS: usize = 6;

const CONTROLS: &str = "ARROWS/WASD : Move   SPACE : Beam   Z : Sword   TAB : Shield   Q : Quit";

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps world coordinates onto the play area: rows 2..rows-3 and columns
/// 1..cols-2, inside the border.
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_w || y >= self.world_h {
            return None;
        }
        let inner_w = self.cols.saturating_sub(2) as f32;
        let inner_h = self.rows.saturating_sub(4) as f32;
        let col = 1 + (x / self.world_w * inner_w) as u16;
        let row = 2 + (y / self.world_h * inner_h) as u16;
        Some((
            col.min(self.cols.saturating_sub(2)),
            row.min(self.rows.saturating_sub(3)),
        ))
    }

    /// Print `text` centred on the world point, clipped to the play area.
    fn put<W: Write>(
        &self,
        out: &mut W,
        x: f32,
        y: f32,
        text: &str,
        color: Color,
    ) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(x, y) else {
            return Ok(());
        };
        let len = text.chars().count() as u16;
        let start = col.saturating_sub(len / 2).max(1);
        let room = self.cols.saturating_sub(1).saturating_sub(start) as usize;
        let clipped: String = text.chars().take(room).collect();
        out.queue(cursor::MoveTo(start, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(clipped))?;
        Ok(())
    }

    fn rows_per_world(&self) -> f32 {
        self.rows.saturating_sub(4) as f32 / self.world_h
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let vp = Viewport {
        cols,
        rows,
        world_w: state.rules.width(),
        world_h: state.rules.height(),
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, &vp, state)?;
    draw_border(out, cols, rows)?;

    for pickup in &state.pickups {
        draw_pickup(out, &vp, pickup)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, &vp, enemy)?;
    }
    for boss in &state.bosses {
        draw_boss(out, &vp, boss)?;
    }
    for shield in &state.shields {
        draw_shield(out, &vp, shield)?;
    }
    draw_player(out, &vp, state)?;
    draw_cooldown(out, &vp, state)?;
    for beam in &state.beams {
        draw_beam(out, &vp, beam)?;
    }
    for sword in &state.swords {
        draw_sword(out, &vp, sword)?;
    }
    for bomb in &state.bombs {
        draw_bomb(out, &vp, bomb)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, &vp, explosion)?;
    }

    draw_hud(out, cols, state)?;
    draw_controls_hint(out, rows)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, cols, rows, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title card shown before the first tick.
pub fn render_title<W: Write>(out: &mut W) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let lines: &[(&str, Color, u16)] = &[
        ("★  HERO  KOKATON  ★", Color::Cyan, 0),
        ("Press Enter to Start ...", Color::Green, 3),
        (CONTROLS, C_HINT, 6),
    ];
    let top = (rows / 2).saturating_sub(3);
    for (text, color, offset) in lines {
        let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, top + offset))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(
    out: &mut W,
    vp: &Viewport,
    state: &GameState,
) -> std::io::Result<()> {
    // Fixed star pattern on a strip twice the screen width, scrolled left.
    let strip = SCROLL_WRAP as f32;
    for i in 0..STAR_COUNT {
        let base_x = (i * 797 % SCROLL_WRAP) as f32;
        let y = (i * 421 % 1000) as f32 / 1000.0 * vp.world_h;
        let x = (base_x - state.scroll as f32).rem_euclid(strip) * vp.world_w / (strip / 2.0);
        vp.put(out, x, y, ".", C_STAR)?;
    }
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // top bar on row 1
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // bottom bar
    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, cols: u16, state: &GameState) -> std::io::Result<()> {
    let hud = &state.hud;

    // score and level, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>5}  ", hud.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("Level: {:>2}", hud.difficulty)))?;

    // health bar, centre
    let filled = health_bar_width(state.player.hp, state.player.max_hp, HP_BAR_CELLS) as usize;
    let bar = format!(
        "HP [{}{}]",
        "█".repeat(filled),
        " ".repeat(HP_BAR_CELLS as usize - filled)
    );
    let bx = (cols / 2).saturating_sub(bar.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(&bar))?;

    // shield charges, right
    let charges = hud.shield_charges(state.rules.weapons.shield_cost);
    let shield_str = format!("Shield ◈ {}", charges);
    let rx = cols.saturating_sub(shield_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SHIELD))?;
    out.queue(Print(&shield_str))?;

    Ok(())
}

/// Bar just under the hero: red then yellow while cooling, green briefly
/// once the beam is ready again.
fn draw_cooldown<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player.rect;
    let y = p.bottom() + 10.0;
    let Some((col, row)) = vp.cell(p.left().max(0.0), y) else {
        return Ok(());
    };
    let cooldown = &state.hud.cooldown;
    let (cells, color) = match cooldown.phase() {
        CooldownPhase::Hot => ((cooldown.elapsed / COOLDOWN_CELL + 1) as usize, Color::Red),
        CooldownPhase::Cooling => {
            ((cooldown.elapsed / COOLDOWN_CELL + 1) as usize, Color::Yellow)
        }
        CooldownPhase::Ready => {
            if cooldown.ready_flash(state.tick, state.rules.weapons.ready_flash) {
                (READY_BAR_CELLS, Color::Green)
            } else {
                return Ok(());
            }
        }
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print("▔".repeat(cells)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn arrow(facing: Facing) -> char {
    match facing {
        Facing::Right => '→',
        Facing::UpRight => '↗',
        Facing::Up => '↑',
        Facing::UpLeft => '↖',
        Facing::Left => '←',
        Facing::DownLeft => '↙',
        Facing::Down => '↓',
        Facing::DownRight => '↘',
    }
}

fn stroke(facing: Facing) -> &'static str {
    match facing {
        Facing::Right | Facing::Left => "━",
        Facing::Up | Facing::Down => "┃",
        Facing::UpRight | Facing::DownLeft => "╱",
        Facing::UpLeft | Facing::DownRight => "╲",
    }
}

fn draw_player<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let (sprite, color) = match p.mood {
        Mood::Normal => (format!("[{}]", arrow(p.facing)), C_PLAYER),
        Mood::Cheer => (format!("^{}^", arrow(p.facing)), C_PLAYER_CHEER),
        Mood::Sad => ("x_x".to_string(), C_PLAYER_SAD),
    };
    vp.put(out, p.rect.cx, p.rect.cy, &sprite, color)
}

fn draw_shield<W: Write>(out: &mut W, vp: &Viewport, shield: &Shield) -> std::io::Result<()> {
    let color = match shield.life {
        0 | 1 => Color::DarkBlue,
        2 => Color::Blue,
        _ => Color::Cyan,
    };
    vp.put(out, shield.rect.cx, shield.rect.cy, "(   )", color)
}

fn draw_beam<W: Write>(out: &mut W, vp: &Viewport, beam: &Beam) -> std::io::Result<()> {
    vp.put(out, beam.rect.cx, beam.rect.cy, stroke(beam.facing), C_BEAM)
}

fn draw_sword<W: Write>(out: &mut W, vp: &Viewport, sword: &Sword) -> std::io::Result<()> {
    let blade = match sword.facing {
        Facing::Right | Facing::Left => "─┼",
        _ => "†",
    };
    vp.put(out, sword.rect.cx, sword.rect.cy, blade, C_SWORD)
}

fn draw_bomb<W: Write>(out: &mut W, vp: &Viewport, bomb: &Bomb) -> std::io::Result<()> {
    let color = BOMB_PALETTE[bomb.color % BOMB_PALETTE.len()];
    vp.put(out, bomb.rect.cx, bomb.rect.cy, "●", color)
}

fn draw_enemy<W: Write>(out: &mut W, vp: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let (sprite, color) = ENEMY_LOOKS[enemy.variant as usize % ENEMY_LOOKS.len()];
    vp.put(out, enemy.rect.cx, enemy.rect.cy, sprite, color)
}

fn draw_boss<W: Write>(out: &mut W, vp: &Viewport, boss: &Boss) -> std::io::Result<()> {
    // Two-row saucer:
    //   ╔◉═◉╗
    //   ╚═══╝
    let color = if boss.hp >= 2 { C_BOSS } else { C_BOSS_HURT };
    let row_step = 1.0 / vp.rows_per_world().max(f32::EPSILON);
    vp.put(out, boss.rect.cx, boss.rect.cy, "╔◉═◉╗", color)?;
    vp.put(out, boss.rect.cx, boss.rect.cy + row_step, "╚═══╝", color)
}

fn draw_pickup<W: Write>(out: &mut W, vp: &Viewport, pickup: &Pickup) -> std::io::Result<()> {
    let sprite = if pickup.flipped() { "●●─" } else { "─●●" };
    vp.put(out, pickup.rect.cx, pickup.rect.cy, sprite, C_PICKUP)
}

fn draw_explosion<W: Write>(
    out: &mut W,
    vp: &Viewport,
    explosion: &Explosion,
) -> std::io::Result<()> {
    let sprite = if explosion.flipped() { "x*x" } else { "*x*" };
    vp.put(out, explosion.rect.cx, explosion.rect.cy, sprite, C_EXPLOSION)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    cols: u16,
    rows: u16,
    state: &GameState,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.hud.score);
    let kills_line = format!("Kills:       {:>6}", state.hud.kills);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (kills_line.as_str(), Color::DarkGrey),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
