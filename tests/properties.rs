//! Property tests for the simulation invariants

use flappy_chicken::BestScore;
use flappy_chicken::consts::*;
use flappy_chicken::sim::{
    Chicken, Difficulty, GamePhase, GameState, Pipe, PowerUpKind, chicken_hits_pipe, tick,
};
use proptest::prelude::*;

fn difficulty(index: usize) -> Difficulty {
    Difficulty::ALL[index % Difficulty::ALL.len()]
}

fn running(seed: u64, index: usize) -> GameState {
    let mut state = GameState::new(seed, difficulty(index), 0);
    state.phase = GamePhase::Running;
    state
}

proptest! {
    #[test]
    fn velocity_stays_bounded(
        seed in any::<u64>(),
        index in 0usize..4,
        jumps in proptest::collection::vec(proptest::bool::weighted(0.15), 1..400),
    ) {
        let mut state = running(seed, index);
        for jump in jumps {
            if !state.is_running() {
                break;
            }
            if jump {
                state.jump();
            }
            tick(&mut state);
            prop_assert!(
                state.chicken.velocity.abs() <= CHICKEN_MAX_VELOCITY,
                "velocity {} over cap",
                state.chicken.velocity
            );
        }
    }

    #[test]
    fn score_combo_and_passed_are_monotonic(
        seed in any::<u64>(),
        index in 0usize..4,
        jumps in proptest::collection::vec(proptest::bool::weighted(0.08), 1..600),
    ) {
        let mut state = running(seed, index);
        // Keep the run alive long enough to meet pipes
        state.chicken.grant_invulnerability(u32::MAX);
        for jump in jumps {
            if !state.is_running() {
                break;
            }
            if jump {
                state.jump();
            }
            let score = state.score;
            let passed: Vec<(f32, f32)> = state
                .pipes
                .iter()
                .filter(|p| p.passed)
                .map(|p| (p.top_height, p.bottom_y))
                .collect();

            tick(&mut state);

            prop_assert!(state.score >= score);
            prop_assert!((1.0..=COMBO_MAX).contains(&state.combo_multiplier));
            for pipe in &state.pipes {
                if passed.contains(&(pipe.top_height, pipe.bottom_y)) {
                    prop_assert!(pipe.passed);
                }
            }
        }
    }

    #[test]
    fn paused_tick_changes_nothing(
        seed in any::<u64>(),
        index in 0usize..4,
        warmup in 0u32..200,
    ) {
        let mut state = running(seed, index);
        state.chicken.grant_invulnerability(u32::MAX);
        for i in 0..warmup {
            if i % 12 == 0 {
                state.jump();
            }
            tick(&mut state);
        }
        state.phase = GamePhase::Paused;
        let before = state.clone();

        tick(&mut state);

        prop_assert_eq!(&state.chicken, &before.chicken);
        prop_assert_eq!(&state.pipes, &before.pipes);
        prop_assert_eq!(&state.power_ups, &before.power_ups);
        prop_assert_eq!(&state.particles, &before.particles);
        prop_assert_eq!(&state.explosions, &before.explosions);
        prop_assert_eq!(state.score, before.score);
        prop_assert_eq!(state.frame_count, before.frame_count);
    }

    #[test]
    fn chicken_inside_gap_never_collides(y in 105.0f32..=(290.0 - CHICKEN_HEIGHT)) {
        let pipe = Pipe::new(CHICKEN_X - 10.0, 100.0, 200.0, None);
        prop_assert!(!chicken_hits_pipe(&Chicken::new(y), &pipe));
    }

    #[test]
    fn chicken_above_margin_always_collides(y in 10.0f32..96.9) {
        let pipe = Pipe::new(CHICKEN_X - 10.0, 100.0, 200.0, None);
        prop_assert!(chicken_hits_pipe(&Chicken::new(y), &pipe));
    }

    #[test]
    fn shielded_chicken_survives_pipes(offset in -40.0f32..40.0, top in 120.0f32..300.0) {
        let mut state = running(1, 1);
        state.effects.activate(PowerUpKind::Shield, &mut state.chicken);
        state.chicken.pos.y = 250.0;
        state.pipes.push(Pipe::new(CHICKEN_X + offset, top, 40.0, None));
        tick(&mut state);
        prop_assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn best_score_keeps_the_maximum(previous in 0u64..10_000, score in 0u64..10_000) {
        let mut best = BestScore::new(previous);
        let improved = best.record(score);
        prop_assert_eq!(improved, score > previous);
        prop_assert_eq!(best.score, previous.max(score));
        // Recording the same score again never counts twice
        prop_assert!(!best.record(score));
    }
}
