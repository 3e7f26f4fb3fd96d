use std::env;
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const TUNING_ENV_VAR: &str = "TILESWORD_TUNING";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TilePosition {
    pub x: f32,
    pub y: f32,
}

impl TilePosition {
    const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Gameplay constants. Every field is optional in the JSON file; missing
/// fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameTuning {
    pub player_spawn_tile: TilePosition,
    pub player_size_px: f32,
    pub player_speed_px: f32,
    pub player_health: f32,
    pub enemy_spawn_tiles: Vec<TilePosition>,
    pub enemy_size_px: f32,
    pub enemy_speed_px: f32,
    pub enemy_health: f32,
    pub contact_damage: f32,
    pub sword_damage: f32,
    pub sword_length_px: f32,
    pub sword_angular_speed: f32,
    pub sword_max_angle: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            player_spawn_tile: TilePosition::new(10.0, 7.0),
            player_size_px: 28.0,
            player_speed_px: 3.0,
            player_health: 5.0,
            enemy_spawn_tiles: vec![TilePosition::new(15.0, 5.0), TilePosition::new(5.0, 10.0)],
            enemy_size_px: 28.0,
            enemy_speed_px: 1.0,
            enemy_health: 3.0,
            contact_damage: 0.02,
            sword_damage: 1.0,
            sword_length_px: 48.0,
            sword_angular_speed: 0.2,
            sword_max_angle: FRAC_PI_2,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TuningError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse tuning file {path} at {field_path}: {source}")]
    Parse {
        path: PathBuf,
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value {field} = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl GameTuning {
    pub(crate) fn validate(&self) -> Result<(), TuningError> {
        ensure_finite("player_spawn_tile.x", self.player_spawn_tile.x)?;
        ensure_finite("player_spawn_tile.y", self.player_spawn_tile.y)?;
        for spawn in &self.enemy_spawn_tiles {
            ensure_finite("enemy_spawn_tiles.x", spawn.x)?;
            ensure_finite("enemy_spawn_tiles.y", spawn.y)?;
        }

        ensure_positive("player_size_px", self.player_size_px)?;
        ensure_non_negative("player_speed_px", self.player_speed_px)?;
        ensure_positive("player_health", self.player_health)?;
        ensure_positive("enemy_size_px", self.enemy_size_px)?;
        ensure_non_negative("enemy_speed_px", self.enemy_speed_px)?;
        ensure_positive("enemy_health", self.enemy_health)?;
        ensure_non_negative("contact_damage", self.contact_damage)?;
        ensure_non_negative("sword_damage", self.sword_damage)?;
        ensure_positive("sword_length_px", self.sword_length_px)?;
        ensure_positive("sword_angular_speed", self.sword_angular_speed)?;
        ensure_positive("sword_max_angle", self.sword_max_angle)?;
        Ok(())
    }
}

/// Reads the tuning file named by `TILESWORD_TUNING`, or returns the defaults
/// when the variable is unset.
pub(crate) fn load_tuning_from_env() -> Result<GameTuning, TuningError> {
    match env::var(TUNING_ENV_VAR) {
        Ok(raw) if raw.trim().is_empty() => load_tuning(None),
        Ok(raw) => load_tuning(Some(Path::new(raw.trim()))),
        Err(env::VarError::NotPresent) => load_tuning(None),
        Err(source) => Err(TuningError::EnvVar {
            var: TUNING_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn load_tuning(path: Option<&Path>) -> Result<GameTuning, TuningError> {
    let Some(path) = path else {
        return Ok(GameTuning::default());
    };

    let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tuning = parse_tuning(&raw, path)?;
    tuning.validate()?;
    Ok(tuning)
}

fn parse_tuning(raw: &str, path: &Path) -> Result<GameTuning, TuningError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameTuning>(&mut deserializer).map_err(|error| {
        let field_path = error.path().to_string();
        TuningError::Parse {
            path: path.to_path_buf(),
            field_path,
            source: error.into_inner(),
        }
    })
}

fn ensure_finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            value,
            reason: "must be greater than zero",
        })
    }
}

fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            value,
            reason: "must not be negative",
        })
    }
}
