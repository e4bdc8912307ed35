/// Per-frame input snapshot handed from the front end to the simulation.
use crossterm::event::KeyCode;

/// Directional keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Sum of one unit per held key; opposite keys cancel out.
    pub fn net(&self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.up {
            dy -= 1;
        }
        if self.down {
            dy += 1;
        }
        if self.left {
            dx -= 1;
        }
        if self.right {
            dx += 1;
        }
        (dx, dy)
    }
}

/// Everything the player asked for during one tick: held movement keys plus
/// one-shot actions triggered by a fresh key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub held: HeldKeys,
    pub fire: bool,
    pub swing: bool,
    pub raise_shield: bool,
}

impl FrameInput {
    /// Record the one-shot action bound to a freshly pressed key.  Returns
    /// `false` for keys with no action.
    pub fn press(&mut self, code: &KeyCode) -> bool {
        match code {
            KeyCode::Char(' ') => self.fire = true,
            KeyCode::Char('z') | KeyCode::Char('Z') => self.swing = true,
            KeyCode::Tab => self.raise_shield = true,
            _ => return false,
        }
        true
    }
}
