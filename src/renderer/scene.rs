//! Frame composition
//!
//! `build_frame` is a pure function of the game state: it never mutates
//! anything, so a paused or finished game redraws the same picture.

use glam::Vec2;

use super::draw_list::{DrawList, Paint, Rgba, TextAlign, TextStyle};
use super::palette::{self, chicken_palette, pipe_colors, special_symbol, variant_index};
use super::shapes::{centered_square, cloud_puffs, grass_blades, shake_offset, star_points};
use crate::Rect;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    Chicken, Explosion, GamePhase, GameState, Particle, ParticleShape, Pipe, PowerUp,
};

/// Ticks per second, used for the power-up countdown
const TICKS_PER_SECOND: u32 = 60;

/// Ephemeral entities that know how to draw themselves
#[derive(Debug, Clone, Copy)]
pub enum Sprite<'a> {
    Particle(&'a Particle),
    PowerUp(&'a PowerUp),
    Explosion(&'a Explosion),
}

impl Sprite<'_> {
    pub fn draw(&self, list: &mut DrawList) {
        match self {
            Sprite::Particle(p) => draw_particle(list, p),
            Sprite::PowerUp(p) => draw_power_up(list, p),
            Sprite::Explosion(e) => draw_explosion(list, e),
        }
    }
}

/// Pickups first, then loose particles, explosions on top
pub fn sprites(state: &GameState) -> impl Iterator<Item = Sprite<'_>> {
    let power_ups = state.power_ups.iter().map(Sprite::PowerUp);
    let particles = state.particles.iter().map(Sprite::Particle);
    let explosions = state.explosions.iter().map(Sprite::Explosion);
    power_ups.chain(particles).chain(explosions)
}

/// Compose the whole frame
pub fn build_frame(state: &GameState, settings: &Settings) -> DrawList {
    let mut list = DrawList::new();
    list.save();
    if state.screen_shake > 0.0 {
        list.translate(shake_offset(state.frame_count, state.screen_shake));
    }

    draw_sky(&mut list, state);
    for pipe in &state.pipes {
        draw_pipe(&mut list, pipe);
    }
    draw_ground(&mut list, state.frame_count);

    for sprite in sprites(state) {
        sprite.draw(&mut list);
    }

    if state.is_started() {
        draw_chicken(&mut list, state);
    }

    draw_hud(&mut list, state, settings);
    match state.phase {
        GamePhase::Menu => draw_menu(&mut list, state),
        GamePhase::Paused => draw_pause(&mut list),
        GamePhase::GameOver => draw_game_over(&mut list, state),
        GamePhase::Running => {}
    }

    list.restore();
    debug_assert!(list.is_balanced());
    list
}

fn full_screen() -> Rect {
    Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)
}

fn draw_sky(list: &mut DrawList, state: &GameState) {
    let night = state.is_night();
    list.rect(
        full_screen(),
        Paint::Linear {
            y0: 0.0,
            y1: CANVAS_HEIGHT,
            stops: palette::sky_stops(night, state.storm_intensity()),
        },
    );

    if night {
        for star in &state.stars {
            list.layer(|l| {
                l.alpha(star.alpha_at(state.frame_count));
                l.shadow(Rgba::WHITE, 3.0);
                l.circle(star.pos, star.size, Rgba::WHITE);
            });
        }
    }

    for cloud in &state.clouds {
        list.layer(|l| {
            let mut color = palette::cloud_color(night, cloud.storm);
            if cloud.lightning > 0 {
                color = palette::LIGHTNING;
                l.alpha(1.0);
                l.shadow(palette::LIGHTNING, 20.0);
            } else {
                l.alpha(cloud.opacity);
            }
            for (center, radius) in cloud_puffs(cloud) {
                l.circle(center, radius, color);
            }
        });
    }
}

fn draw_pipe(list: &mut DrawList, pipe: &Pipe) {
    let colors = pipe_colors(pipe);
    list.layer(|l| {
        if let Some(glow) = colors.glow {
            l.shadow(glow, 15.0);
        }

        let top = Rect::new(pipe.x, 0.0, PIPE_WIDTH, pipe.top_height);
        let bottom = Rect::new(pipe.x, pipe.bottom_y, PIPE_WIDTH, GROUND_Y - pipe.bottom_y);
        for body in [top, bottom] {
            l.rect(body, colors.body);
            l.stroke_rect(body, palette::PIPE_OUTLINE, 2.0);
        }

        let top_cap = Rect::new(pipe.x - 3.0, pipe.top_height - 15.0, PIPE_WIDTH + 6.0, 15.0);
        let bottom_cap = Rect::new(pipe.x - 3.0, pipe.bottom_y, PIPE_WIDTH + 6.0, 15.0);
        for cap in [top_cap, bottom_cap] {
            l.rect(cap, colors.cap);
            l.stroke_rect(cap, palette::PIPE_OUTLINE, 2.0);
        }

        if let Some(kind) = pipe.special {
            let style = TextStyle::new(12.0, Rgba::WHITE).bold();
            let x = pipe.x + PIPE_WIDTH / 2.0;
            l.text(Vec2::new(x, pipe.top_height - 7.0), special_symbol(kind), style);
            l.text(Vec2::new(x, pipe.bottom_y + 7.0), special_symbol(kind), style);
        }
    });
}

fn draw_ground(list: &mut DrawList, frame: u64) {
    list.rect(
        Rect::new(0.0, GROUND_Y, CANVAS_WIDTH, GROUND_HEIGHT),
        Paint::Linear {
            y0: GROUND_Y,
            y1: CANVAS_HEIGHT,
            stops: vec![(0.0, palette::GROUND_TOP), (1.0, palette::GROUND_BOTTOM)],
        },
    );
    for blade in grass_blades(frame) {
        list.rect(blade, palette::GRASS);
    }
}

fn draw_particle(list: &mut DrawList, p: &Particle) {
    list.layer(|l| {
        if p.glow {
            l.shadow(p.color, 10.0);
        }
        l.alpha(p.alpha());
        l.translate(p.pos);
        l.rotate(p.rotation);
        match p.shape {
            ParticleShape::Circle => l.circle(Vec2::ZERO, p.size, p.color),
            ParticleShape::Square => l.rect(centered_square(p.size), p.color),
            ParticleShape::Star => l.polygon(star_points(Vec2::ZERO, p.size), p.color),
        }
    });
}

fn draw_power_up(list: &mut DrawList, power_up: &PowerUp) {
    for sparkle in &power_up.sparkles {
        draw_particle(list, sparkle);
    }

    let bob = power_up.bob_phase.sin() * 5.0;
    list.layer(|l| {
        l.shadow(power_up.kind.color(), 15.0);
        l.translate(power_up.pos + Vec2::new(0.0, bob));
        l.rotate(power_up.rotation);
        l.circle(Vec2::ZERO, POWER_UP_RADIUS, power_up.kind.color());
        l.ring(Vec2::ZERO, POWER_UP_RADIUS, 2.0, Rgba::WHITE);
        l.text(
            Vec2::ZERO,
            power_up.kind.symbol(),
            TextStyle::new(16.0, Rgba::WHITE).bold().middle(),
        );
    });
}

fn draw_explosion(list: &mut DrawList, explosion: &Explosion) {
    if explosion.life > 0.0 {
        list.layer(|l| {
            l.alpha(explosion.life);
            l.ring(explosion.center, explosion.size, 3.0, palette::EXPLOSION_RING);
        });
    }
    for particle in &explosion.particles {
        draw_particle(list, particle);
    }
}

fn draw_chicken(list: &mut DrawList, state: &GameState) {
    let chicken: &Chicken = &state.chicken;
    // The golden chicken leaves a golden trail
    let trail_color = if variant_index(state.chicken_variant) == 0 {
        palette::GOLD
    } else {
        palette::TRAIL
    };
    for point in &chicken.trail {
        list.layer(|l| {
            l.alpha(point.life * 0.4);
            l.circle(point.pos, 3.0 * point.life, trail_color);
        });
    }

    list.layer(|l| {
        if let Some(effect) = state.effects.active() {
            l.shadow(effect.kind.color(), 15.0);
        }
        // Blink while invulnerable
        if chicken.invulnerable && (state.frame_count / 5) % 2 == 1 {
            l.alpha(0.5);
        }
        l.translate(chicken.center());
        l.rotate(chicken.rotation);
        l.scale(chicken.size);
        l.sprite(
            variant_index(state.chicken_variant),
            Vec2::ZERO,
            Vec2::new(CHICKEN_WIDTH, CHICKEN_HEIGHT),
        );
    });
}

fn draw_hud(list: &mut DrawList, state: &GameState, settings: &Settings) {
    let center_x = CANVAS_WIDTH / 2.0;
    list.save();
    list.shadow(Rgba::BLACK, 3.0);

    list.text(
        Vec2::new(center_x, 40.0),
        format!("Score: {}", state.score),
        TextStyle::new(28.0, Rgba::WHITE).bold(),
    );
    if state.combo_multiplier > 1.0 {
        list.text(
            Vec2::new(center_x, 65.0),
            format!("{:.1}x COMBO!", state.combo_multiplier),
            TextStyle::new(18.0, palette::GOLD).bold(),
        );
    }
    list.text(
        Vec2::new(center_x, 85.0),
        format!("Level {} - {}", state.level, state.difficulty.label()),
        TextStyle::new(16.0, Rgba::WHITE),
    );
    list.text(
        Vec2::new(center_x, 105.0),
        format!("{} Chicken", chicken_palette(state.chicken_variant).name),
        TextStyle::new(14.0, palette::GOLD),
    );

    if let Some(effect) = state.effects.active() {
        let color: Rgba = effect.kind.color().into();
        let seconds = effect.remaining.div_ceil(TICKS_PER_SECOND);
        list.text(
            Vec2::new(10.0, CANVAS_HEIGHT - 60.0),
            format!("{}: {}s", effect.kind.name(), seconds),
            TextStyle::new(16.0, color).bold().align(TextAlign::Left),
        );
        let bar = Rect::new(10.0, CANVAS_HEIGHT - 45.0, 100.0, 8.0);
        list.rect(bar, Rgba::BLACK.with_alpha(0.5));
        list.rect(
            Rect::new(bar.min.x, bar.min.y, 100.0 * effect.progress(), 8.0),
            color,
        );
    }

    let right = TextStyle::new(16.0, Rgba::WHITE).align(TextAlign::Right);
    list.text(
        Vec2::new(CANVAS_WIDTH - 10.0, 30.0),
        format!("Best: {}", state.best_score),
        right,
    );
    let sound = if settings.sound_enabled { "🔊" } else { "🔇" };
    list.text(Vec2::new(CANVAS_WIDTH - 10.0, 50.0), sound, right);

    list.restore();
}

fn draw_pause(list: &mut DrawList) {
    let mid = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    list.rect(full_screen(), Rgba::BLACK.with_alpha(0.8));
    list.text(mid, "PAUSED", TextStyle::new(48.0, Rgba::WHITE).bold());
    list.text(
        mid + Vec2::new(0.0, 50.0),
        "Press P to resume",
        TextStyle::new(20.0, Rgba::WHITE),
    );
}

fn draw_menu(list: &mut DrawList, state: &GameState) {
    let mid = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    let at = |dy: f32| mid + Vec2::new(0.0, dy);

    list.rect(full_screen(), Rgba::BLACK.with_alpha(0.9));
    list.text(
        at(-120.0),
        "🐔 Flappy Chicken 🐔",
        TextStyle::new(32.0, Rgba::WHITE).bold(),
    );
    list.text(
        at(-40.0),
        "Keep clicking to stay airborne!",
        TextStyle::new(18.0, Rgba::WHITE),
    );
    list.text(
        at(0.0),
        "Click to start!",
        TextStyle::new(28.0, palette::GOLD).bold(),
    );
    list.text(
        at(40.0),
        format!("Difficulty: {} (1-4 to change)", state.difficulty.label()),
        TextStyle::new(16.0, Rgba::WHITE),
    );

    let controls = [
        "Space / Click: flap",
        "P: pause   M: menu   S: sound",
        "R: restart",
    ];
    let small = TextStyle::new(14.0, palette::MENU_ACCENT);
    for (i, line) in controls.iter().enumerate() {
        list.text(at(80.0 + i as f32 * 20.0), *line, small);
    }

    if state.best_score > 0 {
        list.text(
            Vec2::new(mid.x, CANVAS_HEIGHT - 40.0),
            format!("Best Score: {}", state.best_score),
            TextStyle::new(18.0, Rgba::WHITE),
        );
    }
}

fn draw_game_over(list: &mut DrawList, state: &GameState) {
    let mid = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    list.rect(full_screen(), Rgba::BLACK.with_alpha(0.6));
    list.text(
        mid + Vec2::new(0.0, -60.0),
        "Game Over",
        TextStyle::new(40.0, Rgba::WHITE).bold(),
    );
    list.text(
        mid + Vec2::new(0.0, -10.0),
        format!("Score: {}", state.score),
        TextStyle::new(24.0, Rgba::WHITE),
    );
    if state.new_record {
        list.text(
            mid + Vec2::new(0.0, 25.0),
            "🏆 New Record!",
            TextStyle::new(20.0, palette::GOLD).bold(),
        );
    }
    list.text(
        mid + Vec2::new(0.0, 70.0),
        "Click or press R to play again",
        TextStyle::new(16.0, Rgba::WHITE),
    );
    list.text(
        mid + Vec2::new(0.0, 95.0),
        "M for menu",
        TextStyle::new(14.0, Rgba::WHITE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw_list::DrawCmd;
    use crate::sim::{Difficulty, PowerUpKind, SpecialKind};

    fn state(phase: GamePhase) -> GameState {
        let mut state = GameState::new(3, Difficulty::Normal, 0);
        state.phase = phase;
        state
    }

    fn sprite_count(list: &DrawList) -> usize {
        list.count(|cmd| matches!(cmd, DrawCmd::Sprite { .. }))
    }

    #[test]
    fn test_menu_frame() {
        let frame = build_frame(&state(GamePhase::Menu), &Settings::default());
        assert!(frame.is_balanced());
        assert!(frame.has_text("Click to start!"));
        assert!(frame.has_text("Difficulty: NORMAL"));
        assert_eq!(sprite_count(&frame), 0);
        assert!(!frame.has_text("Best Score"));
    }

    #[test]
    fn test_running_hud() {
        let mut s = state(GamePhase::Running);
        s.score = 14;
        s.level = 2;
        s.combo_multiplier = 1.3;
        s.chicken_variant = 9;
        let frame = build_frame(&s, &Settings::default());
        assert!(frame.has_text("Score: 14"));
        assert!(frame.has_text("1.3x COMBO!"));
        assert!(frame.has_text("Level 2 - NORMAL"));
        assert!(frame.has_text("Brown Chicken"));
        assert!(frame.has_text("🔊"));
        assert_eq!(sprite_count(&frame), 1);
        assert!(frame.commands().contains(&DrawCmd::Sprite {
            index: 1,
            center: Vec2::ZERO,
            size: Vec2::new(CHICKEN_WIDTH, CHICKEN_HEIGHT),
        }));
    }

    #[test]
    fn test_power_up_countdown() {
        let mut s = state(GamePhase::Running);
        s.effects.activate(PowerUpKind::Shield, &mut s.chicken);
        let frame = build_frame(&s, &Settings::default());
        assert!(frame.has_text("Shield: 5s"));
    }

    #[test]
    fn test_paused_and_game_over_overlays() {
        let paused = build_frame(&state(GamePhase::Paused), &Settings::default());
        assert!(paused.has_text("PAUSED"));
        assert_eq!(sprite_count(&paused), 1);

        let mut over = state(GamePhase::GameOver);
        over.new_record = true;
        let frame = build_frame(&over, &Settings::default());
        assert!(frame.has_text("Game Over"));
        assert!(frame.has_text("New Record"));
        assert_eq!(sprite_count(&frame), 0);
    }

    #[test]
    fn test_special_pipe_symbols() {
        let mut s = state(GamePhase::Running);
        s.pipes.push(Pipe::new(200.0, 120.0, 200.0, Some(SpecialKind::Golden)));
        let frame = build_frame(&s, &Settings::default());
        assert_eq!(frame.texts().filter(|t| *t == "★").count(), 2);
    }

    #[test]
    fn test_stars_only_at_night() {
        let star_layers = |list: &DrawList| {
            list.count(|cmd| {
                matches!(cmd, DrawCmd::Shadow { blur, .. } if *blur == 3.0)
            })
        };
        let mut s = state(GamePhase::Running);
        s.time_of_day = 0.25;
        let day = build_frame(&s, &Settings::default());
        s.time_of_day = 0.75;
        let night = build_frame(&s, &Settings::default());
        // The HUD adds one 3px shadow of its own
        assert_eq!(star_layers(&day), 1);
        assert_eq!(star_layers(&night), STAR_COUNT + 1);
    }

    #[test]
    fn test_sprite_order() {
        let mut s = state(GamePhase::Running);
        s.jump();
        s.game_over();
        let kinds: Vec<_> = sprites(&s)
            .map(|sp| match sp {
                Sprite::Particle(_) => 'p',
                Sprite::PowerUp(_) => 'u',
                Sprite::Explosion(_) => 'e',
            })
            .collect();
        assert_eq!(kinds.last(), Some(&'e'));
        assert_eq!(kinds.iter().filter(|k| **k == 'p').count(), 5);
    }

    #[test]
    fn test_muted_icon() {
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        let frame = build_frame(&state(GamePhase::Running), &settings);
        assert!(frame.has_text("🔇"));
    }
}
