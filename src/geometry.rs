/// World-space geometry: rectangles, facings and the screen-bound test.
///
/// The world is measured in pixels (1600x900 by default) with y growing
/// downward, independent of the terminal grid the game is drawn on.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

/// Axis-aligned box stored by its center and full extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect { cx, cy, w, h }
    }

    pub fn left(&self) -> f32 {
        self.cx - self.w / 2.0
    }

    pub fn right(&self) -> f32 {
        self.cx + self.w / 2.0
    }

    pub fn top(&self) -> f32 {
        self.cy - self.h / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.cy + self.h / 2.0
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.cx += dx;
        self.cy += dy;
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Returns `(horizontal, vertical)`: `true` on an axis means the box lies
/// fully inside the screen on that axis.
pub fn check_bound(rect: &Rect, width: f32, height: f32) -> (bool, bool) {
    let horizontal = !(rect.left() < 0.0 || width < rect.right());
    let vertical = !(rect.top() < 0.0 || height < rect.bottom());
    (horizontal, vertical)
}

/// Unit vector pointing from the center of `from` to the center of `to`.
/// `None` when both centers coincide.
pub fn orientation(from: &Rect, to: &Rect) -> Option<Vec2> {
    let dx = to.cx - from.cx;
    let dy = to.cy - from.cy;
    let norm = (dx * dx + dy * dy).sqrt();
    if norm == 0.0 {
        return None;
    }
    Some(Vec2::new(dx / norm, dy / norm))
}

/// Bounding extent of a `w`x`h` box after rotating it by `degrees`.
pub fn rotated_extent(w: f32, h: f32, degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (
        (w * cos).abs() + (h * sin).abs(),
        (w * sin).abs() + (h * cos).abs(),
    )
}

// ── Facing ───────────────────────────────────────────────────────────────────

/// One of the eight directions the hero can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::Right,
        Facing::UpRight,
        Facing::Up,
        Facing::UpLeft,
        Facing::Left,
        Facing::DownLeft,
        Facing::Down,
        Facing::DownRight,
    ];

    /// Maps a net key displacement (each axis in -1..=1) to a facing.
    /// A zero displacement has no facing.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Facing> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Facing::Right),
            (1, -1) => Some(Facing::UpRight),
            (0, -1) => Some(Facing::Up),
            (-1, -1) => Some(Facing::UpLeft),
            (-1, 0) => Some(Facing::Left),
            (-1, 1) => Some(Facing::DownLeft),
            (0, 1) => Some(Facing::Down),
            (1, 1) => Some(Facing::DownRight),
            _ => None,
        }
    }

    /// Screen angle in degrees, counter-clockwise from "right".
    pub fn angle(self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::UpRight => 45.0,
            Facing::Up => 90.0,
            Facing::UpLeft => 135.0,
            Facing::Left => 180.0,
            Facing::DownLeft => -135.0,
            Facing::Down => -90.0,
            Facing::DownRight => -45.0,
        }
    }

    /// Key displacement this facing corresponds to.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::Right => (1, 0),
            Facing::UpRight => (1, -1),
            Facing::Up => (0, -1),
            Facing::UpLeft => (-1, -1),
            Facing::Left => (-1, 0),
            Facing::DownLeft => (-1, 1),
            Facing::Down => (0, 1),
            Facing::DownRight => (1, 1),
        }
    }

    /// Unit vector in world space (y down), diagonals normalized.
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        let norm = ((dx * dx + dy * dy) as f32).sqrt();
        Vec2::new(dx as f32 / norm, dy as f32 / norm)
    }
}
