/// Gameplay tuning loaded from TOML.
///
/// Every section and field is optional; anything missing falls back to the
/// values the game was balanced with.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::PLAYER_SIZE;
use crate::error::ConfigError;
use crate::geometry::{check_bound, Rect};

/// Most hits a boss can take.
pub const MAX_BOSS_HP: u32 = 2;
/// Most bombs a shield can absorb.
pub const MAX_SHIELD_LIFE: u32 = 3;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HERO_KOKATON_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "hero_kokaton.toml";

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    /// Simulation ticks per second.
    pub tick_rate: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            width: 1600,
            height: 900,
            tick_rate: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub max_hp: u32,
    pub start_x: f32,
    pub start_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            speed: 10.0,
            max_hp: 3,
            start_x: 900.0,
            start_y: 400.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub beam_speed: f32,
    /// Ticks the beam cooldown runs before another shot is allowed.
    pub beam_cooldown: u32,
    /// Ticks the "ready" marker stays visible once the cooldown ends.
    pub ready_flash: u64,
    pub sword_life: u32,
    pub shield_life: u32,
    /// Kills per shield already used needed to raise the next one.
    pub shield_cost: u32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        WeaponConfig {
            beam_speed: 10.0,
            beam_cooldown: 50,
            ready_flash: 50,
            sword_life: 10,
            shield_life: 3,
            shield_cost: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub speed: f32,
    pub spawn_every: u64,
    /// Horizontal distance from either edge enemies never spawn within.
    pub spawn_margin: i32,
    /// Distance from the top/bottom edges hold altitudes stay away from.
    pub hold_margin: i32,
    pub drop_interval_min: u64,
    pub drop_interval_max: u64,
    pub bomb_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            speed: 6.0,
            spawn_every: 200,
            spawn_margin: 50,
            hold_margin: 20,
            drop_interval_min: 50,
            drop_interval_max: 300,
            bomb_speed: 6.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub hp: u32,
    pub speed: f32,
    /// Lowest hold altitude; the highest is half the screen height.
    pub hold_min: i32,
    pub patrol_speed: f32,
    pub patrol_band: f32,
    /// A boss appears whenever the beam-kill counter is a non-zero multiple
    /// of this value.
    pub trigger_kills: u32,
}

impl Default for BossConfig {
    fn default() -> Self {
        BossConfig {
            hp: 2,
            speed: 6.0,
            hold_min: 50,
            patrol_speed: 3.0,
            patrol_band: 150.0,
            trigger_kills: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Ticks between difficulty increments.
    pub level_every: u64,
    pub max_level: u32,
    /// Difficulty from which a second, offset enemy wave spawns.
    pub surge_level: u32,
    pub pickup_points: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            level_every: 1000,
            max_level: 10,
            surge_level: 5,
            pickup_points: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// File the log is written to; the terminal itself is busy drawing.
    pub file: PathBuf,
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: PathBuf::from("hero_kokaton.log"),
            filter: "info".to_string(),
        }
    }
}

// ── Aggregates ───────────────────────────────────────────────────────────────

/// The gameplay rules carried inside the game state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub weapons: WeaponConfig,
    pub enemy: EnemyConfig,
    pub boss: BossConfig,
    pub progression: ProgressionConfig,
}

impl Rules {
    pub fn width(&self) -> f32 {
        self.screen.width as f32
    }

    pub fn height(&self) -> f32 {
        self.screen.height as f32
    }

    /// Rejects values that would break spawning or the tick arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.screen.width == 0 || self.screen.height == 0 {
            return invalid("screen dimensions must be non-zero");
        }
        if self.screen.tick_rate == 0 {
            return invalid("screen.tick_rate must be non-zero");
        }
        if self.player.max_hp == 0 {
            return invalid("player.max_hp must be non-zero");
        }
        if self.enemy.spawn_every == 0 || self.progression.level_every == 0 {
            return invalid("spawn and level intervals must be non-zero");
        }
        if self.enemy.drop_interval_min == 0
            || self.enemy.drop_interval_min > self.enemy.drop_interval_max
        {
            return invalid("enemy drop interval range is empty or starts at zero");
        }
        let width = self.screen.width as i64;
        let height = self.screen.height as i64;
        if self.enemy.spawn_margin < 0 || 2 * self.enemy.spawn_margin as i64 > width {
            return invalid("enemy.spawn_margin leaves no room to spawn");
        }
        if self.enemy.hold_margin < 0 || 2 * self.enemy.hold_margin as i64 > height {
            return invalid("enemy.hold_margin leaves no hold altitude");
        }
        if self.boss.hold_min < 0 || self.boss.hold_min as i64 > height / 2 {
            return invalid("boss.hold_min must lie within the top half of the screen");
        }
        if self.weapons.beam_cooldown == 0 {
            return invalid("weapons.beam_cooldown must be non-zero");
        }
        if self.boss.trigger_kills == 0 || self.weapons.shield_cost == 0 {
            return invalid("boss.trigger_kills and weapons.shield_cost must be non-zero");
        }
        if self.boss.patrol_band <= 0.0 {
            return invalid("boss.patrol_band must be positive");
        }
        if self.boss.hp == 0 || self.boss.hp > MAX_BOSS_HP {
            return invalid("boss.hp must be 1 or 2");
        }
        if self.weapons.shield_life == 0 || self.weapons.shield_life > MAX_SHIELD_LIFE {
            return invalid("weapons.shield_life must be between 1 and 3");
        }
        let hero = Rect::centered(
            self.player.start_x,
            self.player.start_y,
            PLAYER_SIZE.0,
            PLAYER_SIZE.1,
        );
        if check_bound(&hero, self.width(), self.height()) != (true, true) {
            return invalid("player start position puts the hero off screen");
        }
        Ok(())
    }
}

/// Full configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    #[serde(flatten)]
    pub rules: Rules,
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.rules.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Locate the config: `$HERO_KOKATON_CONFIG`, then `hero_kokaton.toml`
    /// in the working directory, then built-in defaults. Returns the file
    /// used, if any.
    pub fn discover() -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::load(&local)?, Some(local)));
        }
        Ok((GameConfig::default(), None))
    }
}
