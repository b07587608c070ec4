//! Game entity types and their per-frame behavior.
//!
//! Positions live in a virtual pixel space (origin bottom-left, f32
//! coordinates, speeds in pixels per second). The display layer scales
//! virtual coordinates to terminal cells; nothing here touches I/O.

use crate::input::InputState;

/// Default virtual playfield dimensions.
pub const VIRTUAL_WIDTH: f32 = 1280.0;
pub const VIRTUAL_HEIGHT: f32 = 720.0;

/// Sprite footprints in virtual pixels, used for screen clamping and
/// bounding rectangles.
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const ENEMY_WIDTH: f32 = 50.0;
pub const ENEMY_HEIGHT: f32 = 40.0;
pub const PROJECTILE_WIDTH: f32 = 10.0;
pub const PROJECTILE_HEIGHT: f32 = 10.0;

pub const PLAYER_SPEED: f32 = 300.0;
pub const PROJECTILE_SPEED: f32 = 500.0;

/// Seconds an enemy's explosion stays on screen before removal.
pub const EXPLOSION_DURATION: f32 = 1.0;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// The playfield dimensions, passed explicitly wherever movement is clamped
/// or spawn positions are computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            width: VIRTUAL_WIDTH,
            height: VIRTUAL_HEIGHT,
        }
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Strict-inequality overlap test: rectangles sharing only an edge do
    /// not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Opaque visual handle an entity carries; resolved to glyphs by the
/// display layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    Ship,
    Raider,
    Explosion,
    Bolt,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub sprite: Sprite,
}

impl Player {
    /// Start centred near the bottom of the playfield.
    pub fn new(screen: &Screen) -> Self {
        Player {
            x: screen.width / 2.0 - PLAYER_WIDTH / 2.0,
            y: 50.0,
            speed: PLAYER_SPEED,
            sprite: Sprite::Ship,
        }
    }

    /// Apply held movement input, then clamp so no part of the sprite
    /// leaves the playfield. Opposite keys cancel by summation; diagonals
    /// are faster than axis moves (no normalization).
    pub fn update(&mut self, delta: f32, input: &InputState, screen: &Screen) {
        if input.left {
            self.x -= self.speed * delta;
        }
        if input.right {
            self.x += self.speed * delta;
        }
        if input.up {
            self.y += self.speed * delta;
        }
        if input.down {
            self.y -= self.speed * delta;
        }

        if self.x < 0.0 {
            self.x = 0.0;
        }
        if self.x + PLAYER_WIDTH > screen.width {
            self.x = screen.width - PLAYER_WIDTH;
        }
        if self.y < 0.0 {
            self.y = 0.0;
        }
        if self.y + PLAYER_HEIGHT > screen.height {
            self.y = screen.height - PLAYER_HEIGHT;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
        }
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub destroyed: bool,
    /// Seconds since destruction; only accumulates while `destroyed`.
    pub explosion_elapsed: f32,
    pub sprite: Sprite,
    pub explosion_sprite: Sprite,
}

impl Enemy {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Enemy {
            x,
            y,
            speed,
            destroyed: false,
            explosion_elapsed: 0.0,
            sprite: Sprite::Raider,
            explosion_sprite: Sprite::Explosion,
        }
    }

    /// Descend while alive; once destroyed the position freezes and the
    /// explosion timer runs instead.
    pub fn update(&mut self, delta: f32) {
        if !self.destroyed {
            self.y -= self.speed * delta;
        } else {
            self.explosion_elapsed += delta;
        }
    }

    /// Mark destroyed and restart the explosion timer. Re-destroying an
    /// already exploding enemy resets the timer.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.explosion_elapsed = 0.0;
    }

    /// The sprite's top edge has passed below the bottom of the playfield.
    pub fn is_off_screen(&self) -> bool {
        self.y + ENEMY_HEIGHT < 0.0
    }

    pub fn explosion_finished(&self) -> bool {
        self.destroyed && self.explosion_elapsed > EXPLOSION_DURATION
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: ENEMY_WIDTH,
            h: ENEMY_HEIGHT,
        }
    }
}

// ── Projectile ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub active: bool,
    pub sprite: Sprite,
}

impl Projectile {
    pub fn new(x: f32, y: f32) -> Self {
        Projectile {
            x,
            y,
            active: true,
            sprite: Sprite::Bolt,
        }
    }

    /// Constant upward travel; deactivates once past the top edge. The
    /// owner filters out inactive projectiles on the same frame.
    pub fn update(&mut self, delta: f32, screen: &Screen) {
        self.y += PROJECTILE_SPEED * delta;
        if self.y > screen.height {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: PROJECTILE_WIDTH,
            h: PROJECTILE_HEIGHT,
        }
    }
}
