//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::draw_list::{DrawList, Paint, Rgba};
use super::palette::ChickenPalette;
use crate::Rect;
use crate::consts::{CANVAS_WIDTH, GROUND_Y};
use crate::sim::Cloud;

/// Outline of a five-point star, starting at the top spike
pub fn star_points(center: Vec2, outer_radius: f32) -> Vec<Vec2> {
    const SPIKES: usize = 5;
    let inner_radius = outer_radius * 0.4;
    let step = PI / SPIKES as f32;
    let mut rot = PI / 2.0 * 3.0;

    let mut points = Vec::with_capacity(SPIKES * 2);
    for _ in 0..SPIKES {
        points.push(center + Vec2::new(rot.cos(), rot.sin()) * outer_radius);
        rot += step;
        points.push(center + Vec2::new(rot.cos(), rot.sin()) * inner_radius);
        rot += step;
    }
    points
}

/// Square of half-width `half` around the origin
pub fn centered_square(half: f32) -> Rect {
    Rect::new(-half, -half, half * 2.0, half * 2.0)
}

/// Four overlapping puffs making up one cloud
pub fn cloud_puffs(cloud: &Cloud) -> [(Vec2, f32); 4] {
    let Cloud { pos, size, .. } = *cloud;
    [
        (pos, size),
        (pos + Vec2::new(size * 0.6, 0.0), size * 0.8),
        (pos + Vec2::new(size * 1.2, 0.0), size),
        (pos + Vec2::new(size * 0.3, -size * 0.3), size * 0.6),
    ]
}

/// Swaying grass tufts along the ground line
pub fn grass_blades(frame: u64) -> impl Iterator<Item = Rect> {
    let t = frame as f32;
    (0..CANVAS_WIDTH as u32).step_by(6).map(move |i| {
        let x = i as f32;
        let height = (x * 0.1 + t * 0.03).sin() * 3.0 + 6.0;
        let sway = (x * 0.05 + t * 0.02).sin();
        Rect::new(x + sway, GROUND_Y - height, 3.0, height)
    })
}

/// Deterministic shake offset in [-shake/2, shake/2) for a frame
pub fn shake_offset(frame: u64, shake: f32) -> Vec2 {
    let jitter = |k: f32| ((frame as f32 * k).sin() * 43758.547).rem_euclid(1.0) - 0.5;
    Vec2::new(jitter(12.9898), jitter(78.233)) * shake
}

/// Chicken drawing in a 35x25 box, origin at its top-left
pub fn chicken_art(palette: &ChickenPalette) -> DrawList {
    let mut art = DrawList::new();
    let shaded = |center: Vec2, radius: f32| Paint::Radial {
        center,
        radius,
        inner: palette.body,
        outer: palette.accent,
    };

    art.save();
    // Body and head
    let body = Vec2::new(17.0, 17.0);
    art.ellipse(body, Vec2::new(12.0, 8.0), shaded(body, 12.0));
    let head = Vec2::new(25.0, 10.0);
    art.circle(head, 6.0, shaded(head, 6.0));

    // Beak and eye
    art.polygon(
        vec![
            Vec2::new(29.0, 10.0),
            Vec2::new(34.0, 11.0),
            Vec2::new(29.0, 12.0),
        ],
        Rgba::hex(0xFF8C00),
    );
    art.circle(Vec2::new(27.0, 8.0), 1.2, Rgba::BLACK);
    art.circle(Vec2::new(27.3, 7.7), 0.4, Rgba::WHITE);

    // Comb
    art.polygon(
        vec![
            Vec2::new(22.0, 5.0),
            Vec2::new(24.0, 2.5),
            Vec2::new(26.0, 5.0),
            Vec2::new(28.0, 2.5),
            Vec2::new(30.0, 5.0),
        ],
        palette.comb,
    );

    // Wing, tail, foot
    art.ellipse(Vec2::new(15.0, 15.0), Vec2::new(4.0, 6.0), palette.accent);
    art.ellipse(Vec2::new(8.0, 16.0), Vec2::new(3.0, 5.0), palette.accent);
    art.alpha(0.7);
    art.ellipse(Vec2::new(12.0, 20.0), Vec2::new(2.0, 3.0), palette.accent);
    art.restore();
    art
}
