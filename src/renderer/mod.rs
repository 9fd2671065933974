//! Rendering module
//!
//! The game state is turned into a `DrawList` each frame; a `DrawSurface`
//! backend (Canvas 2D on the web) replays it.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw_list;
pub mod palette;
pub mod scene;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw_list::{DrawCmd, DrawList, Paint, Rgba, TextAlign, TextStyle};
pub use palette::{SpriteArt, SpriteSheet};
pub use scene::{Sprite, build_frame};

/// Render target for a finished frame
pub trait DrawSurface {
    fn present(&mut self, frame: &DrawList);
}

/// Keeps the last frame (tests, headless runs)
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: usize,
    pub last: Option<DrawList>,
}

impl DrawSurface for RecordingSurface {
    fn present(&mut self, frame: &DrawList) {
        self.frames += 1;
        self.last = Some(frame.clone());
    }
}
