//! Collision rules
//!
//! Chicken vs pipes is a rectangle against two rectangles, with the chicken
//! box shrunk by a forgiveness margin so near-misses don't count.

use super::entities::{Chicken, Pipe};
use crate::consts::{BOUNDARY_MARGIN, COLLISION_MARGIN, GROUND_Y};

/// What the chicken ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Pipe,
    Ground,
    Ceiling,
}

/// True if the chicken's (scaled, inset) box overlaps either half of the pipe.
/// Ignores invulnerability; callers decide whether a hit is fatal.
pub fn chicken_hits_pipe(chicken: &Chicken, pipe: &Pipe) -> bool {
    let hitbox = chicken.bounds().inset(COLLISION_MARGIN);
    hitbox.overlaps(&pipe.top_rect()) || hitbox.overlaps(&pipe.bottom_rect())
}

/// Ground or ceiling contact (no forgiveness margin, boundary margin instead)
pub fn boundary_crash(chicken: &Chicken) -> Option<Crash> {
    let bounds = chicken.bounds();
    if bounds.max.y > GROUND_Y - BOUNDARY_MARGIN {
        Some(Crash::Ground)
    } else if bounds.min.y < BOUNDARY_MARGIN {
        Some(Crash::Ceiling)
    } else {
        None
    }
}
