//! Session controller
//!
//! Owns the simulation state together with everything that outlives a
//! single run: the store, preferences and the best score.
//!
//! Phases: Menu -> Running <-> Paused -> GameOver -> (reset) -> Menu/Running

use thiserror::Error;

use crate::highscores::BestScore;
use crate::input::{InputEvent, InputQueue};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{ConfigError, Difficulty, GameEvent, GamePhase, GameState, tick};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("difficulty is locked while a game is in progress")]
    DifficultyLocked,
}

/// One player's session
pub struct Session<S: KeyValueStore> {
    state: GameState,
    store: S,
    settings: Settings,
    best: BestScore,
    /// Seed of the current run; each reset advances it
    seed: u64,
    runs: u32,
}

impl<S: KeyValueStore> Session<S> {
    /// Load preferences and best score, then sit in the menu
    pub fn new(store: S, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let best = BestScore::load(&store);
        let state = GameState::new(seed, settings.difficulty, best.score);
        log::info!(
            "Session ready (seed {}, {}, best {})",
            seed,
            settings.difficulty,
            best.score
        );
        Self {
            state,
            store,
            settings,
            best,
            seed,
            runs: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for drivers and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn best_score(&self) -> u64 {
        self.best.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of runs started in this session (including the current one)
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Apply every queued input in order
    pub fn process(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Jump => self.jump(),
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::ShowMenu => self.show_menu(),
            InputEvent::ToggleSound => {
                self.toggle_sound();
            }
            InputEvent::ChangeDifficulty(difficulty) => {
                if let Err(e) = self.set_difficulty(difficulty) {
                    log::warn!("Difficulty change ignored: {}", e);
                }
            }
            InputEvent::Restart => self.restart_and_jump(),
        }
    }

    /// Flap. Starts the run from the menu; after a crash it starts a new one.
    pub fn jump(&mut self) {
        match self.state.phase {
            GamePhase::Menu => {
                self.state.phase = GamePhase::Running;
                log::info!("Run {} started ({})", self.runs, self.state.difficulty);
                self.state.jump();
            }
            GamePhase::Running => self.state.jump(),
            GamePhase::Paused => {}
            GamePhase::GameOver => self.restart_and_jump(),
        }
    }

    /// Running <-> Paused; ignored before the run starts or after it ends
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => {
                log::debug!("Pause ignored in {:?}", other);
                return;
            }
        };
        log::info!("Phase -> {:?}", self.state.phase);
    }

    /// Abandon the current run and return to the menu
    pub fn show_menu(&mut self) {
        self.reset();
    }

    /// Fresh state with the current difficulty preference, back in the menu
    pub fn reset(&mut self) {
        self.seed = next_seed(self.seed);
        self.runs += 1;
        self.state = GameState::new(self.seed, self.settings.difficulty, self.best.score);
        log::info!("Reset (seed {}, {})", self.seed, self.settings.difficulty);
    }

    pub fn restart_and_jump(&mut self) {
        self.reset();
        self.jump();
    }

    /// Flip and persist the sound preference. Returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        self.settings.save(&mut self.store);
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        enabled
    }

    /// Parse a difficulty name and apply it
    pub fn change_difficulty(&mut self, name: &str) -> Result<(), SessionError> {
        let difficulty: Difficulty = name.parse()?;
        self.set_difficulty(difficulty)
    }

    /// Persist a difficulty and reset into it. Locked while a run is live.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if self.state.is_started() {
            return Err(SessionError::DifficultyLocked);
        }
        self.settings.difficulty = difficulty;
        self.settings.save(&mut self.store);
        log::info!("Difficulty -> {}", difficulty);
        self.reset();
        Ok(())
    }

    /// One simulation step. Persists the best score on the crash tick.
    pub fn step(&mut self) {
        let was_over = self.state.phase == GamePhase::GameOver;
        tick(&mut self.state);
        if !was_over && self.state.phase == GamePhase::GameOver {
            self.finish_run();
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn finish_run(&mut self) {
        if self.best.record(self.state.score) {
            self.best.save(&mut self.store);
        }
    }
}

/// Advance the per-run seed (64-bit LCG step)
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::{MemoryStore, keys};
    use crate::sim::Pipe;

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new(), 7)
    }

    #[test]
    fn test_first_jump_starts_run() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Menu);
        s.handle(InputEvent::Jump);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.state().chicken.velocity, Difficulty::Normal.profile().jump_power);
    }

    #[test]
    fn test_pause_only_while_started() {
        let mut s = session();
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Menu);

        s.jump();
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Paused);

        let chicken = s.state().chicken.clone();
        s.step();
        s.jump();
        assert_eq!(s.state().chicken, chicken);

        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_show_menu_resets() {
        let mut s = session();
        s.jump();
        for _ in 0..10 {
            s.step();
        }
        s.handle(InputEvent::ShowMenu);
        assert_eq!(s.phase(), GamePhase::Menu);
        assert_eq!(s.state().frame_count, 0);
        assert_eq!(s.state().score, 0);
    }

    #[test]
    fn test_difficulty_locked_while_started() {
        let mut s = session();
        s.jump();
        assert_eq!(
            s.change_difficulty("hard"),
            Err(SessionError::DifficultyLocked)
        );
        s.toggle_pause();
        assert_eq!(
            s.set_difficulty(Difficulty::Hard),
            Err(SessionError::DifficultyLocked)
        );
        assert_eq!(s.state().difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_difficulty_change_persists_and_resets() {
        let mut s = session();
        s.change_difficulty("Insane").unwrap();
        assert_eq!(s.state().difficulty, Difficulty::Insane);
        assert_eq!(s.phase(), GamePhase::Menu);
        assert_eq!(s.store().get(keys::DIFFICULTY).as_deref(), Some("insane"));
    }

    #[test]
    fn test_unknown_difficulty_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.change_difficulty("nightmare"),
            Err(SessionError::Config(ConfigError::UnknownDifficulty(_)))
        ));
    }

    #[test]
    fn test_crash_persists_best_once() {
        let mut s = session();
        s.jump();
        s.state_mut().score = 9;
        let (x, y) = (s.state().chicken.pos.x, s.state().chicken.pos.y);
        s.state_mut().pipes.push(Pipe::new(x, y + 50.0, 200.0, None));
        s.step();
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.best_score(), 9);
        assert_eq!(s.store().get(keys::BEST_SCORE).as_deref(), Some("9"));

        // Frozen afterwards; nothing changes on later steps
        s.step();
        assert_eq!(s.best_score(), 9);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set(keys::BEST_SCORE, "20").unwrap();
        let mut s = Session::new(store, 1);
        s.jump();
        s.state_mut().score = 4;
        s.state_mut().chicken.pos.y = GROUND_Y;
        s.step();
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.best_score(), 20);
        assert_eq!(s.store().get(keys::BEST_SCORE).as_deref(), Some("20"));
    }

    #[test]
    fn test_jump_after_crash_restarts() {
        let mut s = session();
        s.jump();
        s.state_mut().chicken.pos.y = GROUND_Y;
        s.step();
        let seed = s.state().seed;
        s.jump();
        assert_eq!(s.phase(), GamePhase::Running);
        assert_ne!(s.state().seed, seed);
        assert_eq!(s.runs(), 2);
    }

    #[test]
    fn test_sound_toggle_persists() {
        let mut s = session();
        assert!(!s.toggle_sound());
        assert_eq!(s.store().get(keys::SOUND).as_deref(), Some("false"));
        s.handle(InputEvent::ToggleSound);
        assert!(s.settings().sound_enabled);
    }
}
