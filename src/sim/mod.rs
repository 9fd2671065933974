//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod entities;
pub mod state;
pub mod tick;

pub use collision::{Crash, boundary_crash, chicken_hits_pipe};
pub use difficulty::{ConfigError, Difficulty, DifficultyProfile};
pub use effects::{ActiveEffect, EffectSlot};
pub use entities::{
    Chicken, Cloud, Color, Explosion, Particle, ParticleShape, Pipe, PowerUp, PowerUpKind,
    SpecialKind, Star, TrailPoint, Updatable,
};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{collect_power_up, score_gain, spawn_pipe, tick};
