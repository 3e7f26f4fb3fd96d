use engine::{Canvas, InputAction, InputSnapshot, Rgba, Scene, Vec2};
use tracing::{debug, info};

use super::tuning::{GameTuning, TilePosition};

include!("types.rs");
include!("systems.rs");
include!("render.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(tuning: GameTuning) -> Box<dyn Scene> {
    Box::new(TileSwordScene::new(tuning))
}
