use super::{Canvas, InputSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// A game hosted by the frame driver.
///
/// `update` runs exactly once per presented frame and `render` right after
/// it. Rendering must not change scene state.
pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, input: &InputSnapshot);
    fn render(&self, canvas: &mut Canvas<'_>);
    fn unload(&mut self);
    fn debug_summary(&self) -> Option<String> {
        None
    }
}

/// One iteration of the frame loop: advance the scene, then draw it.
pub fn run_frame(scene: &mut dyn Scene, input: &InputSnapshot, canvas: &mut Canvas<'_>) {
    scene.update(input);
    scene.render(canvas);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingScene {
        calls: RefCell<Vec<&'static str>>,
        updates: u32,
    }

    impl Scene for RecordingScene {
        fn load(&mut self) {
            self.calls.borrow_mut().push("load");
        }

        fn update(&mut self, _input: &InputSnapshot) {
            self.updates += 1;
            self.calls.borrow_mut().push("update");
        }

        fn render(&self, canvas: &mut Canvas<'_>) {
            canvas.clear([self.updates as u8, 0, 0, 255]);
            self.calls.borrow_mut().push("render");
        }

        fn unload(&mut self) {
            self.calls.borrow_mut().push("unload");
        }
    }

    #[test]
    fn run_frame_updates_before_rendering() {
        let mut scene = RecordingScene::default();
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);

        run_frame(&mut scene, &InputSnapshot::empty(), &mut canvas);
        run_frame(&mut scene, &InputSnapshot::empty(), &mut canvas);

        assert_eq!(
            scene.calls.borrow().as_slice(),
            &["update", "render", "update", "render"]
        );
        assert_eq!(canvas.pixel(0, 0), Some([2, 0, 0, 255]));
    }

    #[test]
    fn default_debug_summary_is_none() {
        let scene = RecordingScene::default();
        assert!(scene.debug_summary().is_none());
    }

    #[test]
    fn vec2_length_is_euclidean() {
        assert!((Vec2::new(3.0, 4.0).length() - 5.0).abs() < f32::EPSILON);
        assert_eq!(Vec2::ZERO.length(), 0.0);
    }
}
