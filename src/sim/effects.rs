//! Power-up effect slot
//!
//! Only one effect is active at a time. Collecting another replaces it
//! (last write wins) after reverting whatever the old one changed.

use serde::{Deserialize, Serialize};

use super::entities::{Chicken, PowerUpKind};
use crate::consts::{CHICKEN_TINY_SCALE, SLOW_TIME_SCALE};

/// The active effect and its remaining ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining: u32,
}

impl ActiveEffect {
    /// Fraction of the duration left, for the HUD bar
    pub fn progress(&self) -> f32 {
        self.remaining as f32 / self.kind.duration() as f32
    }
}

/// Single-slot effect state machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSlot {
    active: Option<ActiveEffect>,
}

impl EffectSlot {
    pub fn active(&self) -> Option<ActiveEffect> {
        self.active
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.is_some_and(|e| e.kind == kind)
    }

    /// Global time-scale (SlowTime halves everything)
    pub fn time_scale(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowTime) {
            SLOW_TIME_SCALE
        } else {
            1.0
        }
    }

    /// Score gain factor from the active effect
    pub fn score_factor(&self) -> u32 {
        if self.is_active(PowerUpKind::DoubleScore) {
            2
        } else {
            1
        }
    }

    /// Activate `kind`, replacing any current effect
    pub fn activate(&mut self, kind: PowerUpKind, chicken: &mut Chicken) {
        if let Some(previous) = self.active.take() {
            revert(previous.kind, chicken);
        }
        match kind {
            PowerUpKind::Shield => chicken.grant_invulnerability(kind.duration()),
            PowerUpKind::TinyChicken => chicken.size = CHICKEN_TINY_SCALE,
            // Read through time_scale / score_factor
            PowerUpKind::SlowTime | PowerUpKind::DoubleScore => {}
            PowerUpKind::Magnet => {}
        }
        self.active = Some(ActiveEffect {
            kind,
            remaining: kind.duration(),
        });
    }

    /// Count down; returns the kind that expired this tick, if any
    pub fn tick(&mut self, chicken: &mut Chicken) -> Option<PowerUpKind> {
        let effect = self.active.as_mut()?;
        effect.remaining = effect.remaining.saturating_sub(1);
        if effect.remaining > 0 {
            return None;
        }
        let kind = effect.kind;
        self.active = None;
        revert(kind, chicken);
        Some(kind)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Undo entity modifications made by an effect. Shield keeps its own timer on the chicken.
fn revert(kind: PowerUpKind, chicken: &mut Chicken) {
    if kind == PowerUpKind::TinyChicken {
        chicken.size = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_reverts_on_expiry_exactly_once() {
        let mut chicken = Chicken::new(300.0);
        let mut slot = EffectSlot::default();
        slot.activate(PowerUpKind::TinyChicken, &mut chicken);
        assert_eq!(chicken.size, CHICKEN_TINY_SCALE);

        for _ in 0..PowerUpKind::TinyChicken.duration() - 1 {
            assert_eq!(slot.tick(&mut chicken), None);
            assert_eq!(chicken.size, CHICKEN_TINY_SCALE);
        }
        assert_eq!(slot.tick(&mut chicken), Some(PowerUpKind::TinyChicken));
        assert_eq!(chicken.size, 1.0);
        assert_eq!(slot.tick(&mut chicken), None);
        assert!(slot.active().is_none());
    }

    #[test]
    fn test_replacement_is_last_write_wins() {
        let mut chicken = Chicken::new(300.0);
        let mut slot = EffectSlot::default();
        slot.activate(PowerUpKind::TinyChicken, &mut chicken);
        slot.activate(PowerUpKind::DoubleScore, &mut chicken);
        assert_eq!(chicken.size, 1.0);
        assert!(slot.is_active(PowerUpKind::DoubleScore));
        assert_eq!(slot.score_factor(), 2);
        assert_eq!(slot.time_scale(), 1.0);
    }

    #[test]
    fn test_shield_outlives_replacement() {
        let mut chicken = Chicken::new(300.0);
        let mut slot = EffectSlot::default();
        slot.activate(PowerUpKind::Shield, &mut chicken);
        slot.activate(PowerUpKind::SlowTime, &mut chicken);
        assert!(chicken.invulnerable);
        assert_eq!(slot.time_scale(), SLOW_TIME_SCALE);
    }

    #[test]
    fn test_magnet_is_inert() {
        let mut chicken = Chicken::new(300.0);
        let before = chicken.clone();
        let mut slot = EffectSlot::default();
        slot.activate(PowerUpKind::Magnet, &mut chicken);
        assert_eq!(chicken, before);
        assert_eq!(slot.score_factor(), 1);
        assert_eq!(slot.time_scale(), 1.0);
    }
}
