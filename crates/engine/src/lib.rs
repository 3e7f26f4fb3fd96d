pub mod app;

pub use app::{
    run_app, run_frame, Affine2, AppError, Canvas, InputAction, InputSnapshot, LoopConfig, Rgba,
    Scene, Vec2,
};
