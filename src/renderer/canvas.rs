//! Canvas 2D backend (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::draw_list::{DrawCmd, DrawList, Paint};
use super::palette::{SpriteArt, SpriteSheet};
use super::DrawSurface;
use crate::Rect;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Offscreen sprites are rasterised at this multiple of their logical size
const SPRITE_RESOLUTION: f64 = 4.0;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    /// Logical canvas -> backing store pixels
    scale: f64,
    sprites: Vec<HtmlCanvasElement>,
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}

impl CanvasSurface {
    /// Size the backing store for the device pixel ratio and cache every sprite
    pub fn new(canvas: &HtmlCanvasElement, sheet: &SpriteSheet) -> Result<Self, JsValue> {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        canvas.set_width((CANVAS_WIDTH as f64 * dpr) as u32);
        canvas.set_height((CANVAS_HEIGHT as f64 * dpr) as u32);

        let ctx = context_2d(canvas)?;
        let sprites = sheet
            .iter()
            .map(rasterize)
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Canvas ready ({} sprites cached, dpr {})", sprites.len(), dpr);

        Ok(Self {
            ctx,
            scale: dpr,
            sprites,
        })
    }
}

/// Draw one sprite into its own offscreen canvas
fn rasterize(art: &SpriteArt) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width((art.size.x as f64 * SPRITE_RESOLUTION) as u32);
    canvas.set_height((art.size.y as f64 * SPRITE_RESOLUTION) as u32);

    let ctx = context_2d(&canvas)?;
    ctx.scale(SPRITE_RESOLUTION, SPRITE_RESOLUTION)?;
    replay(&ctx, &art.commands, &[]);
    Ok(canvas)
}

fn apply_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) {
    match paint {
        Paint::Solid(color) => ctx.set_fill_style_str(&color.css()),
        Paint::Linear { y0, y1, stops } => {
            let gradient = ctx.create_linear_gradient(0.0, *y0 as f64, 0.0, *y1 as f64);
            for (offset, color) in stops {
                gradient.add_color_stop(*offset, &color.css()).ok();
            }
            ctx.set_fill_style_canvas_gradient(&gradient);
        }
        Paint::Radial {
            center,
            radius,
            inner,
            outer,
        } => {
            let (x, y, r) = (center.x as f64, center.y as f64, *radius as f64);
            match ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
                Ok(gradient) => {
                    gradient.add_color_stop(0.0, &inner.css()).ok();
                    gradient.add_color_stop(1.0, &outer.css()).ok();
                    ctx.set_fill_style_canvas_gradient(&gradient);
                }
                Err(_) => ctx.set_fill_style_str(&inner.css()),
            }
        }
    }
}

fn rect_args(rect: &Rect) -> (f64, f64, f64, f64) {
    let size = rect.size();
    (
        rect.min.x as f64,
        rect.min.y as f64,
        size.x as f64,
        size.y as f64,
    )
}

/// Execute commands against a context. Drawing errors only lose a shape.
fn replay(ctx: &CanvasRenderingContext2d, list: &DrawList, sprites: &[HtmlCanvasElement]) {
    for cmd in list.commands() {
        match cmd {
            DrawCmd::Save => ctx.save(),
            DrawCmd::Restore => ctx.restore(),
            DrawCmd::Translate(v) => {
                ctx.translate(v.x as f64, v.y as f64).ok();
            }
            DrawCmd::Rotate(angle) => {
                ctx.rotate(*angle as f64).ok();
            }
            DrawCmd::Scale(s) => {
                ctx.scale(*s as f64, *s as f64).ok();
            }
            DrawCmd::Alpha(a) => ctx.set_global_alpha(*a as f64),
            DrawCmd::Shadow { color, blur } => {
                ctx.set_shadow_color(&color.css());
                ctx.set_shadow_blur(*blur as f64);
            }
            DrawCmd::Rect { rect, paint } => {
                apply_fill(ctx, paint);
                let (x, y, w, h) = rect_args(rect);
                ctx.fill_rect(x, y, w, h);
            }
            DrawCmd::StrokeRect { rect, color, width } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*width as f64);
                let (x, y, w, h) = rect_args(rect);
                ctx.stroke_rect(x, y, w, h);
            }
            DrawCmd::Circle {
                center,
                radius,
                paint,
            } => {
                apply_fill(ctx, paint);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                    .ok();
                ctx.fill();
            }
            DrawCmd::Ellipse {
                center,
                radii,
                paint,
            } => {
                apply_fill(ctx, paint);
                ctx.begin_path();
                ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x as f64,
                    radii.y as f64,
                    0.0,
                    0.0,
                    TAU,
                )
                .ok();
                ctx.fill();
            }
            DrawCmd::Ring {
                center,
                radius,
                width,
                color,
            } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                    .ok();
                ctx.stroke();
            }
            DrawCmd::Polygon { points, paint } => {
                apply_fill(ctx, paint);
                ctx.begin_path();
                for (i, p) in points.iter().enumerate() {
                    if i == 0 {
                        ctx.move_to(p.x as f64, p.y as f64);
                    } else {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                }
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::Text { pos, text, style } => {
                ctx.set_font(&style.font());
                ctx.set_text_align(style.align.as_str());
                ctx.set_text_baseline(if style.middle { "middle" } else { "alphabetic" });
                ctx.set_fill_style_str(&style.color.css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
            DrawCmd::Sprite {
                index,
                center,
                size,
            } => {
                if let Some(image) = sprites.get(*index) {
                    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                        image,
                        (center.x - size.x / 2.0) as f64,
                        (center.y - size.y / 2.0) as f64,
                        size.x as f64,
                        size.y as f64,
                    )
                    .ok();
                }
            }
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn present(&mut self, frame: &DrawList) {
        let ctx = &self.ctx;
        ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0).ok();
        ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        replay(ctx, frame, &self.sprites);
    }
}
