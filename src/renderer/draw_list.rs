//! Backend-neutral drawing commands
//!
//! A frame is a flat list of canvas-style commands. Transform, alpha and
//! shadow state follow save/restore semantics like a 2D canvas context.

use glam::Vec2;

use crate::Rect;
use crate::sim::Color;

/// Colour with alpha, resolved to CSS by the canvas backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn hex(rgb: u32) -> Self {
        let c = Color::hex(rgb);
        Self::new(c.r, c.g, c.b, 1.0)
    }

    /// From float channels (0-255), clamped
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b), 1.0)
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for Rgba {
    fn from(c: Color) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Vertical gradient from y0 to y1, stops at offsets 0-1
    Linear {
        y0: f32,
        y1: f32,
        stops: Vec<(f32, Rgba)>,
    },
    Radial {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
    /// Vertically centre on the anchor instead of sitting on it
    pub middle: bool,
    pub color: Rgba,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgba) -> Self {
        Self {
            size,
            bold: false,
            align: TextAlign::Center,
            middle: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn middle(mut self) -> Self {
        self.middle = true;
        self
    }

    /// CSS font shorthand
    pub fn font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{}px Arial", weight, self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Scale(f32),
    /// Set global alpha
    Alpha(f32),
    /// Set shadow glow; blur 0 turns it off
    Shadow { color: Rgba, blur: f32 },
    Rect { rect: Rect, paint: Paint },
    StrokeRect { rect: Rect, color: Rgba, width: f32 },
    Circle { center: Vec2, radius: f32, paint: Paint },
    Ellipse { center: Vec2, radii: Vec2, paint: Paint },
    /// Stroked circle outline
    Ring { center: Vec2, radius: f32, width: f32, color: Rgba },
    Polygon { points: Vec<Vec2>, paint: Paint },
    Text { pos: Vec2, text: String, style: TextStyle },
    /// Cached sprite from the sheet, centred on `center`
    Sprite { index: usize, center: Vec2, size: Vec2 },
}

/// Ordered commands for one frame (or one cached sprite)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    pub fn save(&mut self) {
        self.push(DrawCmd::Save);
    }

    pub fn restore(&mut self) {
        self.push(DrawCmd::Restore);
    }

    /// Run `f` inside a save/restore pair
    pub fn layer(&mut self, f: impl FnOnce(&mut DrawList)) {
        self.save();
        f(self);
        self.restore();
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.push(DrawCmd::Translate(offset));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.push(DrawCmd::Rotate(angle));
    }

    pub fn scale(&mut self, factor: f32) {
        self.push(DrawCmd::Scale(factor));
    }

    pub fn alpha(&mut self, alpha: f32) {
        self.push(DrawCmd::Alpha(alpha.clamp(0.0, 1.0)));
    }

    pub fn shadow(&mut self, color: impl Into<Rgba>, blur: f32) {
        self.push(DrawCmd::Shadow {
            color: color.into(),
            blur,
        });
    }

    pub fn rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        self.push(DrawCmd::Rect {
            rect,
            paint: paint.into(),
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: impl Into<Rgba>, width: f32) {
        self.push(DrawCmd::StrokeRect {
            rect,
            color: color.into(),
            width,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        self.push(DrawCmd::Circle {
            center,
            radius: radius.max(0.0),
            paint: paint.into(),
        });
    }

    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, paint: impl Into<Paint>) {
        self.push(DrawCmd::Ellipse {
            center,
            radii: radii.max(Vec2::ZERO),
            paint: paint.into(),
        });
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: impl Into<Rgba>) {
        self.push(DrawCmd::Ring {
            center,
            radius: radius.max(0.0),
            width,
            color: color.into(),
        });
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, paint: impl Into<Paint>) {
        if points.len() >= 3 {
            self.push(DrawCmd::Polygon {
                points,
                paint: paint.into(),
            });
        }
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, style: TextStyle) {
        self.push(DrawCmd::Text {
            pos,
            text: text.into(),
            style,
        });
    }

    pub fn sprite(&mut self, index: usize, center: Vec2, size: Vec2) {
        self.push(DrawCmd::Sprite {
            index,
            center,
            size,
        });
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|cmd| pred(cmd)).count()
    }

    /// Save/restore pairs never go negative and close at the end
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i32;
        for cmd in &self.commands {
            match cmd {
                DrawCmd::Save => depth += 1,
                DrawCmd::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_css_and_clamp() {
        assert_eq!(Rgba::hex(0xFF8000).css(), "rgba(255,128,0,1)");
        assert_eq!(Rgba::from_f32(-4.0, 300.0, 12.4), Rgba::new(0, 255, 12, 1.0));
        assert_eq!(Rgba::WHITE.with_alpha(2.0).a, 1.0);
    }

    #[test]
    fn test_font_shorthand() {
        let style = TextStyle::new(28.0, Rgba::WHITE).bold();
        assert_eq!(style.font(), "bold 28px Arial");
        assert_eq!(TextStyle::new(14.0, Rgba::WHITE).font(), "14px Arial");
    }

    #[test]
    fn test_layer_is_balanced() {
        let mut list = DrawList::new();
        list.layer(|l| {
            l.alpha(0.5);
            l.layer(|l| l.circle(Vec2::ZERO, 3.0, Rgba::WHITE));
        });
        assert!(list.is_balanced());
        assert_eq!(list.len(), 6);

        list.restore();
        assert!(!list.is_balanced());
    }

    #[test]
    fn test_degenerate_shapes() {
        let mut list = DrawList::new();
        list.polygon(vec![Vec2::ZERO, Vec2::X], Rgba::WHITE);
        assert!(list.is_empty());
        list.circle(Vec2::ZERO, -1.0, Rgba::WHITE);
        assert!(matches!(
            list.commands()[0],
            DrawCmd::Circle { radius, .. } if radius == 0.0
        ));
    }

    #[test]
    fn test_texts_lookup() {
        let mut list = DrawList::new();
        list.text(Vec2::ZERO, "Score: 3", TextStyle::new(28.0, Rgba::WHITE));
        assert!(list.has_text("Score"));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Score: 3"]);
    }
}
