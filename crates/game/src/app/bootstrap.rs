use engine::{LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay;
use super::tuning::{load_tuning_from_env, TuningError, TUNING_ENV_VAR};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, TuningError> {
    init_tracing();
    info!("=== Tile Sword Startup ===");

    let tuning = load_tuning_from_env()?;
    info!(
        env_var = TUNING_ENV_VAR,
        enemy_count = tuning.enemy_spawn_tiles.len(),
        player_health = tuning.player_health,
        sword_length_px = tuning.sword_length_px,
        "tuning_loaded"
    );

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene: gameplay::build_scene(tuning),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
