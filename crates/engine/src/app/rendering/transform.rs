use crate::app::Vec2;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// 2D affine transform in canvas convention:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
///
/// Composition is post-multiplied like an HTML canvas context, so
/// `translate` then `rotate` rotates local geometry about the translated
/// origin. Positive angles turn clockwise on screen because y points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translated(self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    pub fn rotated(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            e: self.e,
            f: self.f,
        }
    }

    pub fn apply(&self, point: Vec2) -> Vec2 {
        Vec2 {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    /// Returns `None` for degenerate (non-invertible) transforms.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0 && self.a == 1.0 && self.d == 1.0
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx_eq_vec2(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 0.0001 && (a.y - b.y).abs() < 0.0001
    }

    #[test]
    fn translate_offsets_points() {
        let transform = Affine2::IDENTITY.translated(10.0, -4.0);
        let mapped = transform.apply(Vec2 { x: 1.0, y: 1.0 });
        assert!(approx_eq_vec2(mapped, Vec2 { x: 11.0, y: -3.0 }));
        assert!(transform.is_axis_aligned());
    }

    #[test]
    fn quarter_turn_maps_x_axis_onto_y_axis() {
        let transform = Affine2::IDENTITY.rotated(FRAC_PI_2);
        let mapped = transform.apply(Vec2 { x: 1.0, y: 0.0 });
        assert!(approx_eq_vec2(mapped, Vec2 { x: 0.0, y: 1.0 }));
        assert!(!transform.is_axis_aligned());
    }

    #[test]
    fn rotation_happens_about_translated_origin() {
        let transform = Affine2::IDENTITY.translated(100.0, 50.0).rotated(FRAC_PI_2);
        let mapped = transform.apply(Vec2 { x: 10.0, y: 0.0 });
        assert!(approx_eq_vec2(mapped, Vec2 { x: 100.0, y: 60.0 }));
    }

    #[test]
    fn inverse_round_trips_a_point() {
        let transform = Affine2::IDENTITY.translated(7.0, 3.0).rotated(0.7);
        let inverse = transform.inverse().expect("invertible");
        let point = Vec2 { x: -2.5, y: 9.0 };
        assert!(approx_eq_vec2(inverse.apply(transform.apply(point)), point));
    }
}
