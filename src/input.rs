//! Input events
//!
//! DOM handlers (or the native autopilot) push discrete events into an
//! `InputQueue`; the session drains it once per frame before the tick.

use std::collections::VecDeque;

use crate::sim::Difficulty;

/// Discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Flap (also starts the game from the menu)
    Jump,
    TogglePause,
    /// Abandon the run and go back to the menu
    ShowMenu,
    ToggleSound,
    ChangeDifficulty(Difficulty),
    /// Reset and immediately flap
    Restart,
}

impl InputEvent {
    /// Map a `KeyboardEvent.key()` value to an event
    pub fn from_key(key: &str) -> Option<Self> {
        let event = match key {
            " " | "ArrowUp" => InputEvent::Jump,
            "p" | "P" | "Escape" => InputEvent::TogglePause,
            "m" | "M" => InputEvent::ShowMenu,
            "s" | "S" => InputEvent::ToggleSound,
            "r" | "R" => InputEvent::Restart,
            "1" => InputEvent::ChangeDifficulty(Difficulty::Easy),
            "2" => InputEvent::ChangeDifficulty(Difficulty::Normal),
            "3" => InputEvent::ChangeDifficulty(Difficulty::Hard),
            "4" => InputEvent::ChangeDifficulty(Difficulty::Insane),
            _ => return None,
        };
        Some(event)
    }

    /// Whether the browser default action (page scroll) should be suppressed
    pub fn captures_key(key: &str) -> bool {
        matches!(key, " " | "ArrowUp")
    }
}

/// FIFO of events waiting for the next frame
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Push the event for a key, if it maps to one
    pub fn push_key(&mut self, key: &str) -> bool {
        match InputEvent::from_key(key) {
            Some(event) => {
                self.push(event);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(InputEvent::from_key(" "), Some(InputEvent::Jump));
        assert_eq!(InputEvent::from_key("P"), Some(InputEvent::TogglePause));
        assert_eq!(InputEvent::from_key("m"), Some(InputEvent::ShowMenu));
        assert_eq!(InputEvent::from_key("s"), Some(InputEvent::ToggleSound));
        assert_eq!(InputEvent::from_key("R"), Some(InputEvent::Restart));
        assert_eq!(
            InputEvent::from_key("4"),
            Some(InputEvent::ChangeDifficulty(Difficulty::Insane))
        );
        assert_eq!(InputEvent::from_key("x"), None);
        assert!(InputEvent::captures_key(" "));
        assert!(!InputEvent::captures_key("p"));
    }

    #[test]
    fn test_queue_is_fifo_and_drains() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Jump);
        assert!(queue.push_key("p"));
        assert!(!queue.push_key("z"));
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![InputEvent::Jump, InputEvent::TogglePause]);
        assert!(queue.is_empty());
    }
}
