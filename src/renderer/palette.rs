//! Colour tables and the chicken sprite sheet

use glam::Vec2;

use super::draw_list::{DrawList, Rgba};
use super::shapes;
use crate::consts::{CHICKEN_HEIGHT, CHICKEN_WIDTH};
use crate::sim::{Pipe, SpecialKind};

/// One chicken colour scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChickenPalette {
    pub name: &'static str,
    pub body: Rgba,
    pub accent: Rgba,
    pub comb: Rgba,
}

const fn palette(name: &'static str, body: u32, accent: u32, comb: u32) -> ChickenPalette {
    ChickenPalette {
        name,
        body: Rgba::hex(body),
        accent: Rgba::hex(accent),
        comb: Rgba::hex(comb),
    }
}

/// Variants in unlock order
pub const CHICKEN_PALETTES: [ChickenPalette; 8] = [
    palette("Golden", 0xFFD700, 0xFFA500, 0xFF0000),
    palette("Brown", 0xDEB887, 0xCD853F, 0xDC143C),
    palette("Beige", 0xF5F5DC, 0xD2B48C, 0xFF6347),
    palette("Orange", 0xFF7F50, 0xFF6347, 0xFF0000),
    palette("Emerald", 0x98FB98, 0x90EE90, 0xFF1493),
    palette("Sky", 0x87CEEB, 0x4169E1, 0xFF69B4),
    palette("Purple", 0xDDA0DD, 0x9370DB, 0xFF1493),
    palette("Golden Rod", 0xF0E68C, 0xDAA520, 0xFF4500),
];

/// Variant counter -> palette slot
pub fn variant_index(variant: usize) -> usize {
    variant % CHICKEN_PALETTES.len()
}

pub fn chicken_palette(variant: usize) -> &'static ChickenPalette {
    &CHICKEN_PALETTES[variant_index(variant)]
}

// Scenery
pub const GROUND_TOP: Rgba = Rgba::hex(0x8B4513);
pub const GROUND_BOTTOM: Rgba = Rgba::hex(0x654321);
pub const GRASS: Rgba = Rgba::hex(0x228B22);
pub const PIPE_OUTLINE: Rgba = Rgba::hex(0x006400);
pub const GOLD: Rgba = Rgba::hex(0xFFD700);
pub const TRAIL: Rgba = Rgba::hex(0x87CEEB);
pub const EXPLOSION_RING: Rgba = Rgba::hex(0xFF4500);
pub const LIGHTNING: Rgba = Rgba::hex(0xFFFF00);
pub const MENU_ACCENT: Rgba = Rgba::hex(0x90EE90);

/// Resolved colours for one pipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeColors {
    pub body: Rgba,
    pub cap: Rgba,
    pub glow: Option<Rgba>,
}

/// Highlight overrides the special tint
pub fn pipe_colors(pipe: &Pipe) -> PipeColors {
    if pipe.highlight {
        return PipeColors {
            body: Rgba::hex(0x32CD32),
            cap: Rgba::hex(0x7FFF00),
            glow: Some(Rgba::hex(0x7FFF00)),
        };
    }
    match pipe.special {
        Some(SpecialKind::Golden) => PipeColors {
            body: Rgba::hex(0xDAA520),
            cap: Rgba::hex(0xFFD700),
            glow: Some(Rgba::hex(0xFFD700)),
        },
        Some(SpecialKind::Crystal) => PipeColors {
            body: Rgba::hex(0x4169E1),
            cap: Rgba::hex(0x00BFFF),
            glow: Some(Rgba::hex(0x00FFFF)),
        },
        Some(SpecialKind::Fire) => PipeColors {
            body: Rgba::hex(0xDC143C),
            cap: Rgba::hex(0xFF4500),
            glow: Some(Rgba::hex(0xFF6347)),
        },
        None => PipeColors {
            body: Rgba::hex(0x228B22),
            cap: Rgba::hex(0x32CD32),
            glow: None,
        },
    }
}

pub fn special_symbol(kind: SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Golden => "★",
        SpecialKind::Crystal => "◆",
        SpecialKind::Fire => "🔥",
    }
}

/// Sky gradient stops, darkened by storm intensity (0-1)
pub fn sky_stops(night: bool, storm: f32) -> Vec<(f32, Rgba)> {
    let s = storm.clamp(0.0, 1.0);
    let rgb = |r: f32, g: f32, b: f32| Rgba::from_f32(r, g, b);
    if night {
        vec![
            (0.0, rgb(25.0 - s * 15.0, 25.0 - s * 15.0, 112.0 - s * 50.0)),
            (0.7, rgb(72.0 - s * 30.0, 61.0 - s * 30.0, 139.0 - s * 50.0)),
            (1.0, rgb(47.0 - s * 20.0, 79.0 - s * 30.0, 79.0 - s * 30.0)),
        ]
    } else {
        let sky = rgb(135.0 - s * 50.0, 206.0 - s * 100.0, 235.0 - s * 100.0);
        vec![
            (0.0, sky),
            (0.7, sky),
            (0.8, rgb(144.0 - s * 50.0, 238.0 - s * 100.0, 144.0 - s * 50.0)),
            (1.0, rgb(34.0 - s * 20.0, 139.0 - s * 50.0, 34.0 - s * 20.0)),
        ]
    }
}

pub fn cloud_color(night: bool, storm: bool) -> Rgba {
    match (storm, night) {
        (true, true) => Rgba::hex(0x696969),
        (true, false) => Rgba::hex(0xA9A9A9),
        (false, true) => Rgba::hex(0xE6E6FA),
        (false, false) => Rgba::WHITE,
    }
}

/// A pre-built drawing in sprite-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteArt {
    pub name: &'static str,
    pub size: Vec2,
    pub commands: DrawList,
}

/// Every chicken variant, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    sprites: Vec<SpriteArt>,
}

impl SpriteSheet {
    pub fn chickens() -> Self {
        let size = Vec2::new(CHICKEN_WIDTH, CHICKEN_HEIGHT);
        let sprites = CHICKEN_PALETTES
            .iter()
            .map(|p| SpriteArt {
                name: p.name,
                size,
                commands: shapes::chicken_art(p),
            })
            .collect();
        Self { sprites }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpriteArt> {
        self.sprites.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteArt> {
        self.sprites.iter()
    }
}
