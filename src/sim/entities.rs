//! Entity models and their per-tick update rules
//!
//! Entities never reference each other; anything spatial between them
//! (pickups, collisions) is resolved by the tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

/// Plain RGB colour, resolved to CSS/GPU formats by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFFFFFF);

    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// HSL with hue in degrees, saturation/lightness in 0..=1
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }
}

/// Shared per-tick lifecycle of ephemeral entities
pub trait Updatable {
    /// Advance one tick
    fn update(&mut self);
    /// True once the entity should be dropped
    fn is_dead(&self) -> bool;
}

/// Update every entity and drop the dead ones
pub fn update_all<T: Updatable>(items: &mut Vec<T>) {
    for item in items.iter_mut() {
        item.update();
    }
    items.retain(|item| !item.is_dead());
}

// --- Particles ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleShape {
    #[default]
    Circle,
    Square,
    Star,
}

/// A visual-only particle. Size shrinks with the remaining life fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 0-1, decreases by `decay` every tick
    pub life: f32,
    pub max_life: f32,
    pub decay: f32,
    pub size: f32,
    pub max_size: f32,
    pub gravity: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub shape: ParticleShape,
    pub glow: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Color) -> Self {
        Self {
            pos,
            vel,
            color,
            life: 1.0,
            max_life: 1.0,
            decay: 0.02,
            size: 2.0,
            max_size: 2.0,
            gravity: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            shape: ParticleShape::Circle,
            glow: false,
        }
    }

    pub fn with_life(mut self, life: f32) -> Self {
        let life = life.clamp(0.0, 1.0);
        self.life = life;
        self.max_life = life;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self.max_size = size;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_spin(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn glowing(mut self) -> Self {
        self.glow = true;
        self
    }

    /// Opacity for drawing (remaining life fraction)
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Updatable for Particle {
    fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.rotation += self.rotation_speed;
        self.life = (self.life - self.decay).max(0.0);
        self.size = self.max_size * self.alpha();
        debug_assert!((0.0..=1.0).contains(&self.life));
    }

    fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

// --- Explosion ---

/// Particles owned by every explosion
pub const EXPLOSION_PARTICLES: usize = 20;

/// Expanding ring plus a fixed burst of debris
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub size: f32,
    pub max_size: f32,
    pub life: f32,
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Build the explosion and its whole particle burst at once
    pub fn new(center: Vec2, size: f32, rng: &mut Pcg32) -> Self {
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLES as f32;
                let speed = rng.random_range(3.0..8.0);
                let hue = rng.random_range(10.0..70.0);
                Particle::new(
                    center,
                    Vec2::new(angle.cos(), angle.sin()) * speed,
                    Color::hsl(hue, 1.0, 0.6),
                )
                .with_life(0.8)
                .with_size(rng.random_range(2.0..6.0))
                .with_gravity(0.1)
                .glowing()
            })
            .collect();

        Self {
            center,
            size,
            max_size: size,
            life: 1.0,
            particles,
        }
    }
}

impl Updatable for Explosion {
    fn update(&mut self) {
        self.life = (self.life - 0.05).max(0.0);
        self.size = self.max_size * self.life;
        update_all(&mut self.particles);
    }

    fn is_dead(&self) -> bool {
        self.life <= 0.0 && self.particles.is_empty()
    }
}

// --- Chicken ---

/// Trail sample (chicken centre) for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chicken {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub velocity: f32,
    pub rotation: f32,
    /// Size scale (1.0 normal, 0.6 tiny)
    pub size: f32,
    pub invulnerable: bool,
    pub invulnerability_ticks: u32,
    /// Oldest first
    pub trail: Vec<TrailPoint>,
}

impl Chicken {
    pub fn new(y: f32) -> Self {
        Self {
            pos: Vec2::new(CHICKEN_X, y),
            velocity: 0.0,
            rotation: 0.0,
            size: 1.0,
            invulnerable: false,
            invulnerability_ticks: 0,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Bounding box including the size scale
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            CHICKEN_WIDTH * self.size,
            CHICKEN_HEIGHT * self.size,
        )
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn jump(&mut self, jump_power: f32) {
        self.velocity = jump_power;
    }

    /// Apply gravity, clamp, integrate and derive rotation
    pub fn integrate(&mut self, gravity: f32, time_scale: f32) {
        self.velocity += gravity * time_scale;
        self.velocity = self
            .velocity
            .clamp(-CHICKEN_MAX_VELOCITY, CHICKEN_MAX_VELOCITY);
        self.pos.y += self.velocity * time_scale;
        self.rotation = (self.velocity * ROTATION_FACTOR).clamp(-MAX_ROTATION, MAX_ROTATION);
        debug_assert!(self.velocity.abs() <= CHICKEN_MAX_VELOCITY);
    }

    /// Sample the trail every few ticks, then age and prune all points.
    /// Samples sit at the full-size centre, so a tiny chicken trails from its old middle.
    pub fn update_trail(&mut self, frame: u64) {
        if frame % TRAIL_INTERVAL == 0 {
            self.trail.push(TrailPoint {
                pos: self.pos + Vec2::new(CHICKEN_WIDTH, CHICKEN_HEIGHT) / 2.0,
                life: 1.0,
            });
            if self.trail.len() > TRAIL_LENGTH {
                self.trail.remove(0);
            }
        }
        for point in &mut self.trail {
            point.life -= TRAIL_DECAY;
        }
        self.trail.retain(|p| p.life > 0.0);
    }

    pub fn grant_invulnerability(&mut self, ticks: u32) {
        self.invulnerable = true;
        self.invulnerability_ticks = ticks;
    }

    /// Count down invulnerability; the flag drops on the tick the timer hits zero
    pub fn tick_invulnerability(&mut self) {
        if self.invulnerability_ticks > 0 {
            self.invulnerability_ticks -= 1;
            if self.invulnerability_ticks == 0 {
                self.invulnerable = false;
            }
        }
    }
}

// --- Pipes ---

/// Bonus tag carried by special pipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKind {
    Golden,
    Crystal,
    Fire,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 3] = [SpecialKind::Golden, SpecialKind::Crystal, SpecialKind::Fire];

    pub fn multiplier(&self) -> u32 {
        match self {
            SpecialKind::Golden => 3,
            SpecialKind::Crystal => 2,
            SpecialKind::Fire => 1,
        }
    }

    /// Score-burst colour
    pub fn color(&self) -> Color {
        match self {
            SpecialKind::Golden => Color::hex(0xFFD700),
            SpecialKind::Crystal => Color::hex(0x00FFFF),
            SpecialKind::Fire => Color::hex(0xFF4500),
        }
    }
}

/// A pair of pipes with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Leading (left) edge
    pub x: f32,
    pub top_height: f32,
    pub bottom_y: f32,
    pub passed: bool,
    /// Pipe is right in front of the chicken
    pub highlight: bool,
    pub special: Option<SpecialKind>,
}

impl Pipe {
    pub fn new(x: f32, top_height: f32, gap: f32, special: Option<SpecialKind>) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + gap,
            passed: false,
            highlight: false,
            special,
        }
    }

    pub fn trailing_edge(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    pub fn gap_center(&self) -> f32 {
        (self.top_height + self.bottom_y) * 0.5
    }

    /// Score multiplier from the special tag
    pub fn multiplier(&self) -> u32 {
        self.special.map_or(1, |s| s.multiplier())
    }

    /// Upper pipe, extended above the canvas
    pub fn top_rect(&self) -> Rect {
        Rect {
            min: Vec2::new(self.x, f32::NEG_INFINITY),
            max: Vec2::new(self.trailing_edge(), self.top_height),
        }
    }

    /// Lower pipe, extended below the canvas
    pub fn bottom_rect(&self) -> Rect {
        Rect {
            min: Vec2::new(self.x, self.bottom_y),
            max: Vec2::new(self.trailing_edge(), f32::INFINITY),
        }
    }
}

// --- Power-ups ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    SlowTime,
    DoubleScore,
    TinyChicken,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Shield,
        PowerUpKind::SlowTime,
        PowerUpKind::DoubleScore,
        PowerUpKind::TinyChicken,
        PowerUpKind::Magnet,
    ];

    /// Effect length in ticks
    pub fn duration(&self) -> u32 {
        match self {
            PowerUpKind::Shield => 300,
            PowerUpKind::SlowTime => 240,
            PowerUpKind::DoubleScore => 360,
            PowerUpKind::TinyChicken => 300,
            PowerUpKind::Magnet => 240,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Shield",
            PowerUpKind::SlowTime => "Slow Time",
            PowerUpKind::DoubleScore => "2x Score",
            PowerUpKind::TinyChicken => "Tiny Mode",
            PowerUpKind::Magnet => "Score Magnet",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Shield => Color::hex(0x00FFFF),
            PowerUpKind::SlowTime => Color::hex(0xFF69B4),
            PowerUpKind::DoubleScore => Color::hex(0xFFD700),
            PowerUpKind::TinyChicken => Color::hex(0x90EE90),
            PowerUpKind::Magnet => Color::hex(0xFF4500),
        }
    }

    /// Glyph drawn on the pickup
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "🛡️",
            PowerUpKind::SlowTime => "⏰",
            PowerUpKind::DoubleScore => "2x",
            PowerUpKind::TinyChicken => "↓",
            PowerUpKind::Magnet => "🧲",
        }
    }
}

/// A floating pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    /// Horizontal drift per tick
    pub speed: f32,
    pub bob_phase: f32,
    pub rotation: f32,
    pub sparkles: Vec<Particle>,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, speed: f32, bob_phase: f32) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            speed,
            bob_phase,
            rotation: 0.0,
            sparkles: Vec::new(),
        }
    }

    /// Randomly shed a sparkle (30% per tick)
    pub fn emit_sparkle(&mut self, rng: &mut Pcg32) {
        if rng.random_bool(0.3) {
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5)
                * POWER_UP_RADIUS;
            let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 2.0;
            self.sparkles.push(
                Particle::new(self.pos + offset, vel, self.kind.color())
                    .with_life(0.5)
                    .glowing(),
            );
        }
    }

    /// Whether the chicken centre is close enough to grab it
    pub fn reaches(&self, point: Vec2) -> bool {
        !self.collected && self.pos.distance(point) < POWER_UP_RADIUS + POWER_UP_PICKUP_SLACK
    }
}

impl Updatable for PowerUp {
    fn update(&mut self) {
        self.bob_phase += 0.1;
        self.rotation += 0.05;
        self.pos.x -= self.speed;
        update_all(&mut self.sparkles);
    }

    fn is_dead(&self) -> bool {
        self.collected || self.pos.x <= POWER_UP_DESPAWN_X
    }
}

// --- Cosmetic sky ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub storm: bool,
    /// Ticks of lightning flash remaining
    pub lightning: u32,
}

impl Cloud {
    pub fn random(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..CANVAS_WIDTH),
                rng.random_range(50.0..250.0),
            ),
            size: rng.random_range(20.0..60.0),
            speed: rng.random_range(0.3..1.1),
            opacity: rng.random_range(0.1..0.5),
            storm: rng.random_bool(0.3),
            lightning: 0,
        }
    }

    /// Drift left, wrap around, flicker
    pub fn drift(&mut self, time_scale: f32, rng: &mut Pcg32) {
        self.pos.x -= self.speed * time_scale;
        if self.pos.x + self.size < 0.0 {
            self.pos.x = CANVAS_WIDTH + self.size;
            self.pos.y = rng.random_range(50.0..250.0);
        }
        if self.storm && rng.random_bool(0.001) {
            self.lightning = 30;
        }
        self.lightning = self.lightning.saturating_sub(1);
    }
}

/// Night-sky star; twinkle is derived from the frame counter at draw time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub twinkle: f32,
    pub twinkle_speed: f32,
    pub brightness: f32,
}

impl Star {
    pub fn random(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..CANVAS_WIDTH),
                rng.random_range(0.0..CANVAS_HEIGHT * 0.6),
            ),
            size: rng.random_range(1.0..4.0),
            twinkle: rng.random_range(0.0..std::f32::consts::TAU),
            twinkle_speed: rng.random_range(0.05..0.15),
            brightness: rng.random_range(0.2..1.0),
        }
    }

    pub fn alpha_at(&self, frame: u64) -> f32 {
        let phase = self.twinkle + self.twinkle_speed * frame as f32;
        (phase.sin() + 1.0) / 2.0 * self.brightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_particle_shrinks_and_dies() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE)
            .with_size(4.0)
            .with_decay(0.25);
        p.update();
        assert_eq!(p.pos, Vec2::new(1.0, 0.0));
        assert!((p.size - 3.0).abs() < 1e-5);
        for _ in 0..3 {
            p.update();
        }
        assert!(p.is_dead());
        assert_eq!(p.size, 0.0);
    }

    #[test]
    fn test_explosion_owns_full_burst() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ex = Explosion::new(Vec2::new(50.0, 50.0), 40.0, &mut rng);
        assert_eq!(ex.particles.len(), EXPLOSION_PARTICLES);
        let mut ticks = 0;
        while !ex.is_dead() {
            ex.update();
            ticks += 1;
            assert!(ticks < 200, "explosion never finished");
        }
        assert_eq!(ex.life, 0.0);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut chicken = Chicken::new(300.0);
        for frame in 1..=60 {
            chicken.update_trail(frame);
            assert!(chicken.trail.len() <= TRAIL_LENGTH);
            assert!(chicken.trail.iter().all(|p| p.life > 0.0 && p.life <= 1.0));
        }
        assert!(!chicken.trail.is_empty());
    }

    #[test]
    fn test_trail_samples_unscaled_centre() {
        let mut chicken = Chicken::new(300.0);
        chicken.size = CHICKEN_TINY_SCALE;
        chicken.update_trail(TRAIL_INTERVAL);
        assert_eq!(chicken.trail.len(), 1);
        assert_eq!(chicken.trail[0].pos, Vec2::new(CHICKEN_X + 17.5, 312.5));
        assert_ne!(chicken.trail[0].pos, chicken.center());
    }

    #[test]
    fn test_rotation_is_clamped() {
        let mut chicken = Chicken::new(300.0);
        chicken.velocity = 7.9;
        chicken.integrate(0.55, 1.0);
        assert_eq!(chicken.velocity, CHICKEN_MAX_VELOCITY);
        assert_eq!(chicken.rotation, MAX_ROTATION);

        chicken.jump(-9.0);
        chicken.integrate(0.0, 1.0);
        assert_eq!(chicken.velocity, -CHICKEN_MAX_VELOCITY);
        assert_eq!(chicken.rotation, -MAX_ROTATION);
    }

    #[test]
    fn test_pipe_geometry() {
        let pipe = Pipe::new(200.0, 100.0, 200.0, Some(SpecialKind::Golden));
        assert_eq!(pipe.bottom_y, 300.0);
        assert_eq!(pipe.gap_center(), 200.0);
        assert_eq!(pipe.multiplier(), 3);
        assert_eq!(pipe.trailing_edge(), 260.0);
    }

    #[test]
    fn test_power_up_despawns_offscreen() {
        let mut p = PowerUp::new(Vec2::new(-49.0, 100.0), PowerUpKind::Shield, 2.0, 0.0);
        assert!(!p.is_dead());
        p.update();
        assert!(p.is_dead());
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::hsl(0.0, 1.0, 0.5), Color::hex(0xFF0000));
        assert_eq!(Color::hsl(120.0, 1.0, 0.5), Color::hex(0x00FF00));
        assert_eq!(Color::hsl(240.0, 1.0, 0.5), Color::hex(0x0000FF));
    }
}
