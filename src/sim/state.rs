//! Game state and core simulation types
//!
//! Everything a session owns lives in `GameState`. A reset builds a fresh
//! one; only the best score and preferences survive (held by the session).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyProfile};
use super::effects::EffectSlot;
use super::entities::{
    Chicken, Cloud, Color, Explosion, Particle, Pipe, PowerUp, PowerUpKind, Star,
};
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first jump
    Menu,
    /// Active gameplay
    Running,
    /// Started but frozen
    Paused,
    /// Crashed; entities frozen for the final frame
    GameOver,
}

/// Things that happened during a tick or a session call.
/// Drained by the driver (sound, logging, HUD flashes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Scored { gain: u64, total: u64 },
    LevelUp { level: u32 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    Explosion,
    GameOver { score: u64, new_record: bool },
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Locked for the whole session
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub phase: GamePhase,
    /// Ticks simulated while running
    pub frame_count: u64,
    pub score: u64,
    /// High-water mark, seeded from the store by the session
    pub best_score: u64,
    /// Set on game over when the run beat the previous best
    pub new_record: bool,
    pub combo_multiplier: f32,
    pub combo_ticks: u32,
    pub level: u32,
    pub effects: EffectSlot,
    /// Day/night phase in [0, 1); night when > 0.5
    pub time_of_day: f32,
    pub screen_shake: f32,
    /// Index into the chicken sprite variants
    pub chicken_variant: usize,
    pub chicken: Chicken,
    pub pipes: Vec<Pipe>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    /// Cosmetic sky
    pub clouds: Vec<Cloud>,
    pub stars: Vec<Star>,
    /// Pending events (drained every frame)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session in the menu phase
    pub fn new(seed: u64, difficulty: Difficulty, best_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = (0..CLOUD_COUNT).map(|_| Cloud::random(&mut rng)).collect();
        let stars = (0..STAR_COUNT).map(|_| Star::random(&mut rng)).collect();

        Self {
            seed,
            rng,
            difficulty,
            profile: difficulty.profile(),
            phase: GamePhase::Menu,
            frame_count: 0,
            score: 0,
            best_score,
            new_record: false,
            combo_multiplier: 1.0,
            combo_ticks: 0,
            level: 1,
            effects: EffectSlot::default(),
            time_of_day: 0.0,
            screen_shake: 0.0,
            chicken_variant: 0,
            chicken: Chicken::new(CANVAS_HEIGHT / 2.0),
            pipes: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            clouds,
            stars,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Started = left the menu and not yet crashed
    pub fn is_started(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_night(&self) -> bool {
        self.time_of_day > 0.5
    }

    /// Weather darkening with level, 0-1
    pub fn storm_intensity(&self) -> f32 {
        (self.level as f32 / 10.0).min(1.0)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a burst of loose particles; the oldest are evicted in one drain once over the cap
    pub fn spawn_particles(&mut self, burst: impl IntoIterator<Item = Particle>) {
        self.particles.extend(burst);
        let overflow = self.particles.len().saturating_sub(MAX_PARTICLES);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }
    }

    /// Apply a jump impulse plus a puff of dust under the chicken
    pub fn jump(&mut self) {
        self.chicken.jump(self.profile.jump_power);
        let bounds = self.chicken.bounds();
        let origin = Vec2::new(bounds.center().x, bounds.max.y);
        let rng = &mut self.rng;
        let dust: Vec<Particle> = (0..5)
            .map(|_| {
                let vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * 4.0,
                    rng.random_range(1.0..3.0),
                );
                Particle::new(origin, vel, Color::hex(0x87CEEB))
                    .with_life(0.6)
                    .with_gravity(0.1)
            })
            .collect();
        self.spawn_particles(dust);
        self.emit(GameEvent::Jump);
    }

    /// Crash: freeze the run, blow up the chicken, record the best score
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.screen_shake = CRASH_SHAKE;
        let center = self.chicken.center();
        let explosion = Explosion::new(center, 40.0, &mut self.rng);
        self.explosions.push(explosion);
        self.emit(GameEvent::Explosion);

        let new_record = self.score > self.best_score;
        if new_record {
            self.best_score = self.score;
        }
        self.new_record = new_record;
        log::info!(
            "Game over: score {} (best {}, level {}, {})",
            self.score,
            self.best_score,
            self.level,
            self.difficulty
        );
        self.emit(GameEvent::GameOver {
            score: self.score,
            new_record,
        });
    }
}
