use crate::app::Vec2;

use super::text::{glyph_rows, GLYPH_ADVANCE, GLYPH_WIDTH, TEXT_SCALE};
use super::Affine2;

pub type Rgba = [u8; 4];

/// Immediate-mode drawing surface over an RGBA8 frame buffer.
///
/// Coordinates are pixels with y pointing down. A pixel is covered by a shape
/// when its center lies inside the shape after the current transform. Writes
/// outside the frame are clipped. Colors are written as-is, without blending.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    transform: Affine2,
    saved: Vec<Affine2>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
            transform: Affine2::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    pub fn clear(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Unbalanced restores fall back to the identity transform.
    pub fn restore(&mut self) {
        self.transform = self.saved.pop().unwrap_or(Affine2::IDENTITY);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.transform = self.transform.translated(tx, ty);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.transform = self.transform.rotated(radians);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, rect_width: f32, rect_height: f32, color: Rgba) {
        if !(rect_width > 0.0 && rect_height > 0.0) {
            return;
        }
        if self.transform.is_axis_aligned() {
            let origin = self.transform.apply(Vec2 { x, y });
            self.fill_device_rect(origin.x, origin.y, rect_width, rect_height, color);
            return;
        }
        let Some(inverse) = self.transform.inverse() else {
            return;
        };

        let corners = [
            Vec2 { x, y },
            Vec2 {
                x: x + rect_width,
                y,
            },
            Vec2 {
                x,
                y: y + rect_height,
            },
            Vec2 {
                x: x + rect_width,
                y: y + rect_height,
            },
        ]
        .map(|corner| self.transform.apply(corner));
        let min_x = corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let Some((start_x, end_x)) = covered_span(min_x, max_x, self.width) else {
            return;
        };
        let Some((start_y, end_y)) = covered_span(min_y, max_y, self.height) else {
            return;
        };

        for py in start_y..end_y {
            for px in start_x..end_x {
                let local = inverse.apply(Vec2 {
                    x: px as f32 + 0.5,
                    y: py as f32 + 0.5,
                });
                let inside = local.x >= x
                    && local.x < x + rect_width
                    && local.y >= y
                    && local.y < y + rect_height;
                if inside {
                    self.write_pixel(px, py, color);
                }
            }
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)` in local coordinates.
    pub fn fill_text(&mut self, x: f32, y: f32, text: &str, color: Rgba) {
        let scale = TEXT_SCALE as f32;
        let mut pen_x = x;
        for ch in text.chars() {
            for (row_index, row_bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                        continue;
                    }
                    self.fill_rect(
                        pen_x + (col * TEXT_SCALE) as f32,
                        y + row_index as f32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
            pen_x += GLYPH_ADVANCE as f32;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.frame.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn fill_device_rect(&mut self, x: f32, y: f32, rect_width: f32, rect_height: f32, color: Rgba) {
        let Some((start_x, end_x)) = covered_span(x, x + rect_width, self.width) else {
            return;
        };
        let Some((start_y, end_y)) = covered_span(y, y + rect_height, self.height) else {
            return;
        };
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.write_pixel(px, py, color);
            }
        }
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let Some(pixel_offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(end) = byte_offset.checked_add(4) else {
            return;
        };
        if end > self.frame.len() {
            return;
        }
        self.frame[byte_offset..end].copy_from_slice(&color);
    }
}

/// Pixel indices whose centers fall in `[min, max)`, clipped to `[0, limit)`.
fn covered_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let start = (min - 0.5).ceil().max(0.0);
    let end = (max - 0.5).ceil().min(limit as f32);
    if end <= start {
        return None;
    }
    Some((start as u32, end as u32))
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::super::text::GLYPH_HEIGHT;
    use super::*;

    const WHITE: Rgba = [255, 255, 255, 255];
    const RED: Rgba = [255, 0, 0, 255];
    const EMPTY: Rgba = [0, 0, 0, 0];

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    fn count_color(canvas: &Canvas<'_>, color: Rgba) -> usize {
        let mut count = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buffer = frame(4, 3);
        let mut canvas = Canvas::new(&mut buffer, 4, 3);
        canvas.clear(RED);
        assert_eq!(count_color(&canvas, RED), 12);
    }

    #[test]
    fn axis_aligned_rect_covers_exact_pixels() {
        let mut buffer = frame(16, 16);
        let mut canvas = Canvas::new(&mut buffer, 16, 16);
        canvas.fill_rect(2.0, 3.0, 4.0, 2.0, WHITE);

        assert_eq!(count_color(&canvas, WHITE), 8);
        assert_eq!(canvas.pixel(2, 3), Some(WHITE));
        assert_eq!(canvas.pixel(5, 4), Some(WHITE));
        assert_eq!(canvas.pixel(6, 4), Some(EMPTY));
        assert_eq!(canvas.pixel(2, 5), Some(EMPTY));
    }

    #[test]
    fn fractional_rect_uses_pixel_centers() {
        let mut buffer = frame(8, 8);
        let mut canvas = Canvas::new(&mut buffer, 8, 8);
        canvas.fill_rect(0.75, 0.0, 1.0, 1.0, WHITE);

        assert_eq!(canvas.pixel(0, 0), Some(EMPTY));
        assert_eq!(canvas.pixel(1, 0), Some(WHITE));
        assert_eq!(count_color(&canvas, WHITE), 1);
    }

    #[test]
    fn rects_outside_the_frame_are_clipped() {
        let mut buffer = frame(8, 8);
        let mut canvas = Canvas::new(&mut buffer, 8, 8);
        canvas.fill_rect(-4.0, -4.0, 6.0, 6.0, WHITE);
        canvas.fill_rect(100.0, 100.0, 6.0, 6.0, WHITE);

        assert_eq!(count_color(&canvas, WHITE), 4);
    }

    #[test]
    fn non_positive_sizes_draw_nothing() {
        let mut buffer = frame(8, 8);
        let mut canvas = Canvas::new(&mut buffer, 8, 8);
        canvas.fill_rect(1.0, 1.0, 0.0, 4.0, WHITE);
        canvas.fill_rect(1.0, 1.0, 4.0, -2.0, WHITE);
        canvas.fill_rect(1.0, 1.0, f32::NAN, 2.0, WHITE);

        assert_eq!(count_color(&canvas, WHITE), 0);
    }

    #[test]
    fn translated_rect_lands_at_offset() {
        let mut buffer = frame(16, 16);
        let mut canvas = Canvas::new(&mut buffer, 16, 16);
        canvas.translate(8.0, 8.0);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, WHITE);

        assert_eq!(canvas.pixel(8, 8), Some(WHITE));
        assert_eq!(canvas.pixel(9, 9), Some(WHITE));
        assert_eq!(count_color(&canvas, WHITE), 4);
    }

    #[test]
    fn quarter_turn_swaps_rect_extent() {
        let mut buffer = frame(32, 32);
        let mut canvas = Canvas::new(&mut buffer, 32, 32);
        canvas.translate(16.0, 16.0);
        canvas.rotate(FRAC_PI_2);
        canvas.fill_rect(0.0, 0.0, 8.0, 2.0, WHITE);

        // local +x becomes screen +y, local +y becomes screen -x
        assert_eq!(canvas.pixel(15, 20), Some(WHITE));
        assert_eq!(canvas.pixel(14, 23), Some(WHITE));
        assert_eq!(canvas.pixel(16, 20), Some(EMPTY));
        assert_eq!(count_color(&canvas, WHITE), 16);
    }

    #[test]
    fn restore_returns_to_saved_transform() {
        let mut buffer = frame(16, 16);
        let mut canvas = Canvas::new(&mut buffer, 16, 16);
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.rotate(0.3);
        canvas.restore();

        assert_eq!(canvas.transform(), Affine2::IDENTITY);
        canvas.restore();
        assert_eq!(canvas.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn text_draws_inside_its_cell() {
        let mut buffer = frame(64, 32);
        let mut canvas = Canvas::new(&mut buffer, 64, 32);
        canvas.fill_text(2.0, 2.0, "H", WHITE);

        // top-left stroke of H
        assert_eq!(canvas.pixel(2, 2), Some(WHITE));
        // H has a gap in the middle column of the first row
        assert_eq!(canvas.pixel(2 + TEXT_SCALE as u32, 2), Some(EMPTY));
        let glyph_bottom = 2 + (GLYPH_HEIGHT * TEXT_SCALE) as u32;
        for x in 0..64 {
            assert_eq!(canvas.pixel(x, glyph_bottom), Some(EMPTY));
        }
    }

    #[test]
    fn text_beyond_bounds_is_safe() {
        let mut buffer = frame(8, 8);
        let mut canvas = Canvas::new(&mut buffer, 8, 8);
        canvas.fill_text(-20.0, -20.0, "FPS", WHITE);
        canvas.fill_text(64.0, 64.0, "UPS", WHITE);
        assert_eq!(count_color(&canvas, WHITE), 0);
    }

    #[test]
    fn tiny_frames_never_write_out_of_bounds() {
        let mut buffer = frame(1, 1);
        let mut canvas = Canvas::new(&mut buffer, 1, 1);
        canvas.fill_rect(-10.0, -10.0, 40.0, 40.0, WHITE);
        canvas.rotate(0.5);
        canvas.fill_rect(-10.0, -10.0, 40.0, 40.0, RED);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(1, 0), None);
    }
}
