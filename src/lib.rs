//! Flappy Chicken - A flap-through-the-pipes arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, power-ups)
//! - `session`: Menu/run/pause/game-over transitions and persistence
//! - `driver`: Per-frame loop gluing input, simulation, rendering and sound
//! - `renderer`: Draw-list generation and the canvas backend
//! - `persistence`: Key-value store abstraction (LocalStorage on web)

pub mod audio;
pub mod driver;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::BestScore;
pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (pixels)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ground strip at the bottom of the canvas
    pub const GROUND_HEIGHT: f32 = 80.0;
    pub const GROUND_Y: f32 = CANVAS_HEIGHT - GROUND_HEIGHT;
    /// Distance from ground/ceiling that already counts as a crash
    pub const BOUNDARY_MARGIN: f32 = 5.0;

    /// Chicken defaults
    pub const CHICKEN_X: f32 = 100.0;
    pub const CHICKEN_WIDTH: f32 = 35.0;
    pub const CHICKEN_HEIGHT: f32 = 25.0;
    pub const CHICKEN_MAX_VELOCITY: f32 = 8.0;
    pub const CHICKEN_TINY_SCALE: f32 = 0.6;
    /// Rotation is velocity * factor, clamped to +/- max
    pub const ROTATION_FACTOR: f32 = 0.08;
    pub const MAX_ROTATION: f32 = 0.3;

    /// Trail sampling
    pub const TRAIL_LENGTH: usize = 10;
    pub const TRAIL_INTERVAL: u64 = 3;
    pub const TRAIL_DECAY: f32 = 0.1;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_MIN_HEIGHT: f32 = 80.0;
    /// Pixel tolerance shaved off the chicken box before testing pipes
    pub const COLLISION_MARGIN: f32 = 3.0;
    /// Pipe is highlighted while its leading edge is in (chicken.x - behind, chicken.x + ahead)
    pub const HIGHLIGHT_BEHIND: f32 = 50.0;
    pub const HIGHLIGHT_AHEAD: f32 = 100.0;
    /// Chance a new pipe carries a bonus tag
    pub const SPECIAL_PIPE_CHANCE: f64 = 0.15;

    /// Power-up spawning and pickup
    pub const POWER_UP_CHANCE: f64 = 0.2;
    pub const POWER_UP_MIN_SCORE: u64 = 5;
    pub const POWER_UP_RADIUS: f32 = 20.0;
    pub const POWER_UP_PICKUP_SLACK: f32 = 15.0;
    pub const POWER_UP_SPAWN_OFFSET: f32 = 100.0;
    pub const POWER_UP_SPEED_FACTOR: f32 = 0.8;
    pub const POWER_UP_DESPAWN_X: f32 = -50.0;

    /// Combo multiplier
    pub const COMBO_STEP: f32 = 0.1;
    pub const COMBO_MAX: f32 = 3.0;
    /// Ticks without scoring before the combo resets (3 seconds at 60 Hz)
    pub const COMBO_TIMEOUT_TICKS: u32 = 180;

    /// Score per level
    pub const LEVEL_SCORE_STEP: u64 = 10;
    /// Chicken sprite changes every N points
    pub const VARIANT_SCORE_STEP: u64 = 5;

    /// Time-scale while SlowTime is active
    pub const SLOW_TIME_SCALE: f32 = 0.5;

    /// Day/night cycle period in ticks
    pub const DAY_CYCLE_TICKS: u64 = 2000;

    /// Screen shake applied on crash, decays by SHAKE_DECAY per tick
    pub const CRASH_SHAKE: f32 = 15.0;
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Cosmetic sky population
    pub const CLOUD_COUNT: usize = 8;
    pub const STAR_COUNT: usize = 100;

    /// Hard cap on loose particles
    pub const MAX_PARTICLES: usize = 512;
    /// Max rotation per tick for tumbling star particles (radians)
    pub const STAR_SPIN: f32 = 0.1;
}

/// Axis-aligned rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Shrink on every side by `margin`
    #[inline]
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(margin),
            max: self.max - Vec2::splat(margin),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
