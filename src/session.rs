//! The session orchestrator: one in-progress play-through.
//!
//! A `Session` exclusively owns the player, the live projectiles and
//! enemies, and all session-scoped counters. `update` runs once per host
//! frame with the measured delta and an input snapshot; sounds are emitted
//! through the injected [`AudioSink`] so the core stays free of device
//! handles. Rendering lives in the `display` module and is read-only over
//! this state.

use crate::audio::{AudioSink, SoundCue};
use crate::entities::{Enemy, Player, Projectile, Screen};
use crate::input::InputState;

pub const STARTING_LIVES: i32 = 5;
/// Seconds of ignored collisions after taking a hit.
pub const INVINCIBILITY_WINDOW: f32 = 2.0;

/// Live-enemy band: a wave tops the count up to `MAX_ENEMIES` whenever it
/// drops below `MIN_ENEMIES`.
pub const MIN_ENEMIES: usize = 7;
pub const MAX_ENEMIES: usize = 13;

pub const ENEMY_BASE_SPEED: f32 = 100.0;
pub const ENEMY_SPEED_CAP: f32 = 400.0;

/// Kills required for the first level-up; each level-up raises the bar.
pub const BASE_KILLS_PER_LEVEL: u32 = 20;
pub const KILLS_PER_LEVEL_STEP: u32 = 3;

/// Projectiles leave the ship's nose, offset from the player position.
const FIRE_OFFSET_X: f32 = 20.0;
const FIRE_OFFSET_Y: f32 = 40.0;

/// Spawn x positions are shifted left by half an enemy sprite.
const SPAWN_X_NUDGE: f32 = 25.0;

pub struct Session {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub lives: i32,
    pub score: u32,
    pub level: u32,
    pub destroyed_this_level: u32,
    pub needed_for_level: u32,
    /// Counts down from [`INVINCIBILITY_WINDOW`]; only its sign is
    /// consulted, so it may dip below zero.
    pub invincibility_timer: f32,
    /// Terminal flag: once set, `update` is a no-op and only the end
    /// screen renders.
    pub game_over: bool,
    pub screen: Screen,
}

impl Session {
    /// A fresh session starts with full lives and an initial enemy wave.
    pub fn new(screen: Screen) -> Self {
        let mut session = Session {
            player: Player::new(&screen),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            lives: STARTING_LIVES,
            score: 0,
            level: 1,
            destroyed_this_level: 0,
            needed_for_level: BASE_KILLS_PER_LEVEL,
            invincibility_timer: 0.0,
            game_over: false,
            screen,
        };
        session.spawn_wave();
        session
    }

    /// Enemy speed for a wave spawned at `level`.
    pub fn spawn_speed(level: u32) -> f32 {
        (ENEMY_BASE_SPEED + 0.5 * level as f32).min(ENEMY_SPEED_CAP)
    }

    /// Top the live-enemy count up to [`MAX_ENEMIES`], spacing the new
    /// enemies evenly across the playfield just above the visible area.
    fn spawn_wave(&mut self) {
        let to_add = MAX_ENEMIES - self.enemies.len();
        let spacing = self.screen.width / (to_add + 1) as f32;
        let speed = Self::spawn_speed(self.level);

        for i in 1..=to_add {
            let x = i as f32 * spacing - SPAWN_X_NUDGE;
            self.enemies.push(Enemy::new(x, self.screen.height, speed));
        }
    }

    /// Advance the session by one frame.
    pub fn update(&mut self, delta: f32, input: &InputState, audio: &mut impl AudioSink) {
        if self.game_over {
            return;
        }

        if self.invincibility_timer > 0.0 {
            self.invincibility_timer -= delta;
        }

        if self.enemies.len() < MIN_ENEMIES {
            self.spawn_wave();
        }

        self.player.update(delta, input, &self.screen);

        let screen = self.screen;
        self.projectiles.retain_mut(|p| {
            p.update(delta, &screen);
            p.active
        });

        self.advance_enemies(delta, audio);
        self.resolve_projectile_hits(audio);

        if input.fire {
            self.fire(audio);
        }
    }

    /// Per-enemy pass, in iteration order: advance, then either drop
    /// off-screen strays, take a hit on player contact, or retire a
    /// finished explosion (which is what actually scores). Invincibility
    /// granted by an earlier enemy in the pass shields the later ones.
    fn advance_enemies(&mut self, delta: f32, audio: &mut impl AudioSink) {
        let mut i = 0;
        while i < self.enemies.len() {
            self.enemies[i].update(delta);

            if self.enemies[i].is_off_screen() {
                // Escaped, not destroyed: no score effect.
                self.enemies.remove(i);
                continue;
            }

            if self.invincibility_timer <= 0.0
                && self.enemies[i].bounds().overlaps(&self.player.bounds())
            {
                self.lives -= 1;
                audio.play(SoundCue::PlayerHit);
                self.invincibility_timer = INVINCIBILITY_WINDOW;
                self.enemies[i].destroy();
                if self.lives <= 0 {
                    self.game_over = true;
                }
            } else if self.enemies[i].explosion_finished() {
                self.enemies.remove(i);
                self.destroyed_this_level += 1;
                self.score += self.level;

                if self.destroyed_this_level >= self.needed_for_level {
                    self.level += 1;
                    self.needed_for_level += KILLS_PER_LEVEL_STEP;
                    self.destroyed_this_level = 0;
                }
                continue;
            }

            i += 1;
        }
    }

    /// Projectile-vs-enemy pass: each active projectile hits at most the
    /// first overlapping enemy, then stops scanning. The scan does not
    /// deduplicate across projectiles, so two projectiles may each hit the
    /// same enemy in one frame; destroyed enemies are not skipped either
    /// (a hit restarts their explosion). Both are kept source behaviors.
    fn resolve_projectile_hits(&mut self, audio: &mut impl AudioSink) {
        for projectile in &mut self.projectiles {
            if !projectile.active {
                continue;
            }
            for enemy in &mut self.enemies {
                if projectile.bounds().overlaps(&enemy.bounds()) {
                    audio.play(SoundCue::Explosion);
                    enemy.destroy();
                    projectile.active = false;
                    break;
                }
            }
        }
    }

    /// Spawn one projectile above the ship's nose. No cooldown: holding
    /// fire spawns one projectile per frame.
    fn fire(&mut self, audio: &mut impl AudioSink) {
        self.projectiles.push(Projectile::new(
            self.player.x + FIRE_OFFSET_X,
            self.player.y + FIRE_OFFSET_Y,
        ));
        audio.play(SoundCue::Fire);
    }
}
