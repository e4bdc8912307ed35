/// HUD counters: scalars the loop updates and the renderer reads.

/// Beam cooldown.  `elapsed == 0` means ready to fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    pub elapsed: u32,
    /// Tick on which the last cooldown finished.
    pub ready_at: Option<u64>,
}

/// Colour band of the cooldown bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownPhase {
    Ready,
    Hot,
    Cooling,
}

impl Cooldown {
    pub fn is_ready(&self) -> bool {
        self.elapsed == 0
    }

    pub fn start(&mut self) {
        self.elapsed = 1;
    }

    /// Called once per tick after collisions.
    pub fn advance(&mut self, tick: u64, limit: u32) {
        if self.elapsed >= 1 {
            self.elapsed += 1;
        }
        if self.elapsed >= limit {
            self.elapsed = 0;
            self.ready_at = Some(tick);
        }
    }

    pub fn phase(&self) -> CooldownPhase {
        match self.elapsed {
            0 => CooldownPhase::Ready,
            1..=20 => CooldownPhase::Hot,
            _ => CooldownPhase::Cooling,
        }
    }

    /// The green "ready" marker shows for `window` ticks after a cooldown
    /// ends, while no new shot has been fired.
    pub fn ready_flash(&self, tick: u64, window: u64) -> bool {
        match self.ready_at {
            Some(at) => self.is_ready() && at + window >= tick,
            None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Points from collected pickups.
    pub score: u32,
    pub difficulty: u32,
    /// Enemy kills and boss hits by beam or sword.
    pub kills: u32,
    /// Starts at 1; every raised shield adds one.
    pub shields_used: u32,
    pub cooldown: Cooldown,
}

impl Default for Hud {
    fn default() -> Self {
        Hud {
            score: 0,
            difficulty: 0,
            kills: 0,
            shields_used: 1,
            cooldown: Cooldown::default(),
        }
    }
}

impl Hud {
    pub fn shield_available(&self, cost: u32) -> bool {
        self.kills / self.shields_used >= cost
    }

    /// Value shown next to the shield icon.
    pub fn shield_charges(&self, cost: u32) -> u32 {
        self.kills / self.shields_used / cost
    }

    pub fn difficulty_up(&mut self, max: u32) -> bool {
        if self.difficulty < max {
            self.difficulty += 1;
            true
        } else {
            false
        }
    }
}

/// Width of the health bar for `hp` out of `max_hp`.
pub fn health_bar_width(hp: u32, max_hp: u32, max_width: u32) -> u32 {
    if max_hp == 0 {
        return 0;
    }
    max_width * hp.min(max_hp) / max_hp
}
