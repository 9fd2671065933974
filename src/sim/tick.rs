//! Per-frame simulation tick
//!
//! Advances the running game by exactly one step. Order matters: physics,
//! timers, pipes (scoring + collision), spawning, pickups/particles, then
//! the ground/ceiling check. At most one crash is processed per tick.

use glam::Vec2;
use rand::Rng;

use super::collision::{boundary_crash, chicken_hits_pipe};
use super::entities::{
    Color, Particle, ParticleShape, Pipe, PowerUp, PowerUpKind, SpecialKind, Updatable,
    update_all,
};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Advance the game state by one tick. No-op unless running.
pub fn tick(state: &mut GameState) {
    if !state.is_running() {
        return;
    }

    state.frame_count += 1;
    state.time_of_day = (state.frame_count % DAY_CYCLE_TICKS) as f32 / DAY_CYCLE_TICKS as f32;
    if state.screen_shake > 0.0 {
        state.screen_shake *= SHAKE_DECAY;
    }

    let time_scale = state.effects.time_scale();

    // Chicken physics
    let gravity = state.profile.gravity;
    state.chicken.integrate(gravity, time_scale);
    state.chicken.update_trail(state.frame_count);

    // Timers
    state.chicken.tick_invulnerability();
    if let Some(expired) = state.effects.tick(&mut state.chicken) {
        log::debug!("Power-up expired: {}", expired.name());
        state.emit(GameEvent::PowerUpExpired(expired));
    }
    if state.combo_ticks > 0 {
        state.combo_ticks -= 1;
        if state.combo_ticks == 0 {
            state.combo_multiplier = 1.0;
        }
    }

    // Pipes: move, score, cull, collide
    if update_pipes(state, time_scale) {
        return;
    }

    if should_spawn_pipe(state) {
        spawn_pipe(state);
    }

    update_power_ups(state);
    update_all(&mut state.particles);
    update_all(&mut state.explosions);

    {
        let GameState { clouds, rng, .. } = state;
        for cloud in clouds.iter_mut() {
            cloud.drift(time_scale, rng);
        }
    }

    if let Some(crash) = boundary_crash(&state.chicken) {
        if !state.chicken.invulnerable {
            log::debug!("Boundary crash: {:?}", crash);
            state.game_over();
        }
    }

    debug_assert!((1.0..=COMBO_MAX).contains(&state.combo_multiplier));
}

/// Returns true if the chicken crashed into a pipe (tick must stop)
fn update_pipes(state: &mut GameState, time_scale: f32) -> bool {
    let speed = state.profile.pipe_speed * time_scale;
    let chicken_x = state.chicken.pos.x;

    let mut i = 0;
    while i < state.pipes.len() {
        let pipe = &mut state.pipes[i];
        pipe.x -= speed;
        pipe.highlight = pipe.x > chicken_x - HIGHLIGHT_BEHIND && pipe.x < chicken_x + HIGHLIGHT_AHEAD;

        if !pipe.passed && pipe.trailing_edge() < chicken_x {
            pipe.passed = true;
            let passed = pipe.clone();
            award_pipe(state, &passed);
        }

        let pipe = &state.pipes[i];
        let hit = chicken_hits_pipe(&state.chicken, pipe);
        if pipe.trailing_edge() < 0.0 {
            state.pipes.remove(i);
        } else {
            i += 1;
        }

        if hit && !state.chicken.invulnerable {
            log::debug!("Pipe crash at x={:.1}", state.chicken.pos.x);
            state.game_over();
            return true;
        }
    }
    false
}

/// Score gain for passing a pipe: base x special x double-score x combo
pub fn score_gain(special_multiplier: u32, score_factor: u32, combo: f32) -> u64 {
    let gain = (special_multiplier * score_factor) as f32 * combo;
    (gain.round() as u64).max(1)
}

/// Apply scoring, combo and level rules for a pipe that was just passed
fn award_pipe(state: &mut GameState, pipe: &Pipe) {
    let gain = score_gain(
        pipe.multiplier(),
        state.effects.score_factor(),
        state.combo_multiplier,
    );
    let previous = state.score;
    state.score += gain;
    state.emit(GameEvent::Scored {
        gain,
        total: state.score,
    });

    state.combo_multiplier = (state.combo_multiplier + COMBO_STEP).min(COMBO_MAX);
    state.combo_ticks = COMBO_TIMEOUT_TICKS;

    if state.score > state.level as u64 * LEVEL_SCORE_STEP {
        state.level += 1;
        log::info!("Level up: {}", state.level);
        state.emit(GameEvent::LevelUp { level: state.level });
        celebrate(state);
    }

    // Score burst from the middle of the gap
    let color = pipe.special.map_or(Color::hex(0x90EE90), |s| s.color());
    let origin = Vec2::new(pipe.x + PIPE_WIDTH / 2.0, pipe.gap_center());
    let rng = &mut state.rng;
    let sparks: Vec<Particle> = (0..gain * 3)
        .map(|_| {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0 - 2.0,
            );
            Particle::new(origin, vel, color).with_size(3.0).glowing()
        })
        .collect();
    state.spawn_particles(sparks);

    // New chicken look every few points
    if state.score / VARIANT_SCORE_STEP > previous / VARIANT_SCORE_STEP {
        state.chicken_variant += 1;
    }
}

/// Star shower at the top of the screen
fn celebrate(state: &mut GameState) {
    let origin = Vec2::new(CANVAS_WIDTH / 2.0, 50.0);
    let rng = &mut state.rng;
    let stars: Vec<Particle> = (0..20)
        .map(|_| {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 10.0,
                -rng.random_range(2.0..7.0),
            );
            let hue = rng.random_range(0.0..360.0);
            let spin = rng.random_range(-STAR_SPIN..STAR_SPIN);
            Particle::new(origin, vel, Color::hsl(hue, 1.0, 0.6))
                .with_decay(0.0133)
                .with_size(4.0)
                .with_gravity(0.1)
                .with_shape(ParticleShape::Star)
                .with_spin(spin)
                .glowing()
        })
        .collect();
    state.spawn_particles(stars);
}

fn should_spawn_pipe(state: &GameState) -> bool {
    state.frame_count > state.profile.first_pipe_delay
        && state
            .pipes
            .last()
            .is_none_or(|last| last.x < CANVAS_WIDTH - state.profile.pipe_interval)
}

/// Spawn a pipe at the right edge, maybe with a power-up in its gap
pub fn spawn_pipe(state: &mut GameState) {
    let gap = state.profile.pipe_gap;
    let max_height = GROUND_Y - gap - PIPE_MIN_HEIGHT;
    let top_height = state.rng.random_range(PIPE_MIN_HEIGHT..max_height);
    let special = if state.rng.random_bool(SPECIAL_PIPE_CHANCE) {
        let idx = state.rng.random_range(0..SpecialKind::ALL.len());
        Some(SpecialKind::ALL[idx])
    } else {
        None
    };

    let pipe = Pipe::new(CANVAS_WIDTH, top_height, gap, special);
    log::debug!(
        "Spawned pipe top={:.0} gap={:.0} special={:?}",
        top_height,
        gap,
        special
    );

    if state.rng.random_bool(POWER_UP_CHANCE) && state.score > POWER_UP_MIN_SCORE {
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        let pos = Vec2::new(CANVAS_WIDTH + POWER_UP_SPAWN_OFFSET, pipe.gap_center());
        let bob = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = state.profile.pipe_speed * POWER_UP_SPEED_FACTOR;
        log::debug!("Spawned power-up {:?}", kind);
        state.power_ups.push(PowerUp::new(pos, kind, speed, bob));
    }

    state.pipes.push(pipe);
}

/// Move pickups, let them sparkle, and collect any the chicken touches
fn update_power_ups(state: &mut GameState) {
    let target = state.chicken.center();
    let mut collected = Vec::new();
    {
        let GameState { power_ups, rng, .. } = state;
        for power_up in power_ups.iter_mut() {
            power_up.emit_sparkle(rng);
            power_up.update();
            if power_up.reaches(target) {
                power_up.collected = true;
                collected.push((power_up.kind, power_up.pos));
            }
        }
        power_ups.retain(|p| !p.is_dead());
    }

    for (kind, pos) in collected {
        collect_power_up(state, kind, pos);
    }
}

/// Activate an effect and show a star burst where it was grabbed
pub fn collect_power_up(state: &mut GameState, kind: PowerUpKind, pos: Vec2) {
    log::info!("Power-up collected: {}", kind.name());
    state.effects.activate(kind, &mut state.chicken);
    state.emit(GameEvent::PowerUpCollected(kind));
    let rng = &mut state.rng;
    let stars: Vec<Particle> = (0..15)
        .map(|_| {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 8.0,
            );
            let spin = rng.random_range(-STAR_SPIN..STAR_SPIN);
            Particle::new(pos, vel, kind.color())
                .with_size(4.0)
                .with_shape(ParticleShape::Star)
                .with_spin(spin)
                .glowing()
        })
        .collect();
    state.spawn_particles(stars);
}
