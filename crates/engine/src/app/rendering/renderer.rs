use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::tools::{draw_overlay, OverlayData};

use super::{Canvas, Viewport};

/// Owns the window surface and presents one software-rendered frame per call.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Runs `draw_scene` against a fresh canvas. When it hands back overlay
    /// data, the debug panel is layered on a second canvas with an identity
    /// transform. Then the frame is presented.
    pub(crate) fn render_frame<F>(&mut self, draw_scene: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Canvas<'_>) -> Option<OverlayData>,
    {
        let Viewport { width, height } = self.viewport;
        let overlay_data = {
            let mut canvas = Canvas::new(self.pixels.frame_mut(), width, height);
            draw_scene(&mut canvas)
        };
        if let Some(data) = overlay_data.as_ref() {
            let mut canvas = Canvas::new(self.pixels.frame_mut(), width, height);
            draw_overlay(&mut canvas, data);
        }

        self.pixels.render()
    }
}
