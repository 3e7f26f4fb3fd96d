mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub(crate) use metrics::LoopMetricsSnapshot;
pub(crate) use rendering::Renderer;
pub use rendering::{Affine2, Canvas, Rgba};
pub use scene::{run_frame, Scene, Vec2};
