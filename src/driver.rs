//! Game loop driver
//!
//! One call to `GameLoop::frame` per display refresh: drain input, advance
//! the simulation one tick, draw, then fire the sounds for what happened.

use crate::audio::{SoundEffect, SoundTrigger};
use crate::input::{InputEvent, InputQueue};
use crate::persistence::KeyValueStore;
use crate::renderer::{DrawSurface, build_frame};
use crate::session::Session;
use crate::sim::{GameEvent, GamePhase, GameState};

/// Ties a session to its input, drawing and sound backends
pub struct GameLoop<S: KeyValueStore, D: DrawSurface, A: SoundTrigger> {
    session: Session<S>,
    input: InputQueue,
    surface: D,
    sound: A,
    frames: u64,
    last_phase: GamePhase,
}

impl<S: KeyValueStore, D: DrawSurface, A: SoundTrigger> GameLoop<S, D, A> {
    pub fn new(session: Session<S>, surface: D, sound: A) -> Self {
        let last_phase = session.phase();
        Self {
            session,
            input: InputQueue::new(),
            surface,
            sound,
            frames: 0,
            last_phase,
        }
    }

    /// Queue an event for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue the event for a key; false if the key is unbound
    pub fn push_key(&mut self, key: &str) -> bool {
        self.input.push_key(key)
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame and return the events it produced
    pub fn frame(&mut self) -> Vec<GameEvent> {
        self.session.process(&mut self.input);
        self.session.step();
        let events = self.session.drain_events();

        let settings = self.session.settings();
        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                let volume = settings.effective_volume(effect.default_volume());
                if volume > 0.0 {
                    self.sound.play(effect, volume);
                }
            }
        }

        let frame = build_frame(self.session.state(), settings);
        self.surface.present(&frame);

        let phase = self.session.phase();
        if phase != self.last_phase {
            log::debug!("Frame {}: {:?} -> {:?}", self.frames, self.last_phase, phase);
            self.last_phase = phase;
        }
        self.frames += 1;
        events
    }
}

/// Flap whenever the chicken sinks below the next gap's centre.
/// Used by the headless native build.
pub fn autopilot(state: &GameState) -> Option<InputEvent> {
    match state.phase {
        GamePhase::Menu => return Some(InputEvent::Jump),
        GamePhase::Running => {}
        GamePhase::Paused | GamePhase::GameOver => return None,
    }

    let chicken = &state.chicken;
    let bounds = chicken.bounds();
    let target = state
        .pipes
        .iter()
        .find(|p| p.trailing_edge() > bounds.min.x)
        .map_or(crate::consts::CANVAS_HEIGHT / 2.0, |p| p.gap_center() + 10.0);

    (bounds.max.y > target && chicken.velocity >= 0.0).then_some(InputEvent::Jump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSound;
    use crate::persistence::MemoryStore;
    use crate::renderer::RecordingSurface;
    use crate::sim::Pipe;

    type TestLoop = GameLoop<MemoryStore, RecordingSurface, RecordingSound>;

    fn game() -> TestLoop {
        GameLoop::new(
            Session::new(MemoryStore::new(), 99),
            RecordingSurface::default(),
            RecordingSound::default(),
        )
    }

    #[test]
    fn test_frame_draws_every_time() {
        let mut game = game();
        game.frame();
        game.frame();
        assert_eq!(game.surface().frames, 2);
        assert_eq!(game.frames(), 2);
        assert_eq!(game.session().phase(), GamePhase::Menu);
        let last = game.surface().last.as_ref().map(|f| f.has_text("Click to start!"));
        assert_eq!(last, Some(true));
    }

    #[test]
    fn test_jump_plays_sound_and_starts() {
        let mut game = game();
        assert!(game.push_key(" "));
        let events = game.frame();
        assert!(events.contains(&GameEvent::Jump));
        assert_eq!(game.session().phase(), GamePhase::Running);
        assert_eq!(game.sound().played, vec![(SoundEffect::Jump, 0.08)]);
    }

    #[test]
    fn test_muted_session_is_silent() {
        let mut game = game();
        game.push_input(InputEvent::ToggleSound);
        game.push_input(InputEvent::Jump);
        game.frame();
        assert!(game.sound().played.is_empty());
    }

    #[test]
    fn test_crash_sounds() {
        let mut game = game();
        game.push_input(InputEvent::Jump);
        game.frame();
        game.session_mut().state_mut().chicken.pos.y = crate::consts::GROUND_Y;
        game.frame();
        let effects = game.sound().effects();
        assert!(effects.contains(&SoundEffect::Explosion));
        assert!(effects.contains(&SoundEffect::GameOver));
    }

    #[test]
    fn test_autopilot_rules() {
        let mut state = GameState::new(1, crate::sim::Difficulty::Normal, 0);
        assert_eq!(autopilot(&state), Some(InputEvent::Jump));

        state.phase = GamePhase::Running;
        state.pipes.push(Pipe::new(200.0, 100.0, 200.0, None));
        // Gap centre 200; chicken at 300 and falling
        state.chicken.velocity = 1.0;
        assert_eq!(autopilot(&state), Some(InputEvent::Jump));

        // Already rising
        state.chicken.velocity = -3.0;
        assert_eq!(autopilot(&state), None);

        // Well above the gap
        state.chicken.velocity = 1.0;
        state.chicken.pos.y = 120.0;
        assert_eq!(autopilot(&state), None);

        state.phase = GamePhase::GameOver;
        assert_eq!(autopilot(&state), None);
    }
}
