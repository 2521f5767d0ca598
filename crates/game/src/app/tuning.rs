use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use arena_engine::{Transform, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const TUNING_PATH_ENV_VAR: &str = "ARENA_TUNING_PATH";

/// Every gameplay constant of the arena. Missing fields fall back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaTuning {
    pub ticks_per_second: u32,
    pub player: PlayerTuning,
    pub abilities: AbilityTuning,
    pub enemies: EnemyTuning,
    pub ally: AllyTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub speed: f32,
    pub invulnerable: bool,
    pub spawn: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbilityTuning {
    pub lightning_cooldown_seconds: f32,
    pub lightning_bolts: usize,
    pub lightning_bolt_speed: f32,
    pub lightning_bolt_lifetime_seconds: f32,
    pub max_freezable_enemies: usize,
    pub frost_range: f32,
    pub frost_half_angle_degrees: f32,
    pub frost_slow_multiplier: f32,
    pub stink_cooldown_seconds: f32,
    pub stink_clouds: usize,
    pub stink_cloud_lifetime_seconds: f32,
    pub slime_cooldown_seconds: f32,
    pub slime_ammo: u32,
    pub slime_speed: f32,
    pub slime_lifetime_seconds: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyTuning {
    pub spawn_interval_seconds: f32,
    pub max_per_spawner: usize,
    pub speed: f32,
    pub score_per_defeat: u32,
    /// Spawned enemies take the position and, when given, the rotation.
    pub spawn_points: Vec<Transform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllyTuning {
    pub cost: u32,
    pub duration_seconds: f32,
    pub speed: f32,
    pub spawn_point: Transform,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            player: PlayerTuning::default(),
            abilities: AbilityTuning::default(),
            enemies: EnemyTuning::default(),
            ally: AllyTuning::default(),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            speed: 6.0,
            invulnerable: false,
            spawn: Vec2::ZERO,
        }
    }
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            lightning_cooldown_seconds: 0.5,
            lightning_bolts: 8,
            lightning_bolt_speed: 20.0,
            lightning_bolt_lifetime_seconds: 1.0,
            max_freezable_enemies: 20,
            frost_range: 5.0,
            frost_half_angle_degrees: 30.0,
            frost_slow_multiplier: 0.4,
            stink_cooldown_seconds: 2.0,
            stink_clouds: 4,
            stink_cloud_lifetime_seconds: 3.0,
            slime_cooldown_seconds: 1.0,
            slime_ammo: 5,
            slime_speed: 12.0,
            slime_lifetime_seconds: 1.5,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            spawn_interval_seconds: 5.0,
            max_per_spawner: 10,
            speed: 3.0,
            score_per_defeat: 10,
            spawn_points: vec![
                Transform::with_rotation(Vec2::new(-12.0, 12.0), -FRAC_PI_4),
                Transform::with_rotation(Vec2::new(12.0, 12.0), -3.0 * FRAC_PI_4),
                Transform::with_rotation(Vec2::new(0.0, -14.0), FRAC_PI_2),
            ],
        }
    }
}

impl Default for AllyTuning {
    fn default() -> Self {
        Self {
            cost: 100,
            duration_seconds: 15.0,
            speed: 5.0,
            spawn_point: Transform::with_rotation(Vec2::new(0.0, -2.0), FRAC_PI_2),
        }
    }
}

#[derive(Debug, Error)]
pub enum TuningError {
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
        source: std::io::Error,
    },
    #[error("failed to parse tuning file {path} at {field_path}: {source}")]
    Parse {
        path: PathBuf,
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value at {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Picks the tuning file: an explicit path wins over `ARENA_TUNING_PATH`.
pub fn resolve_tuning_path(explicit: Option<PathBuf>) -> Result<Option<PathBuf>, TuningError> {
    resolve_tuning_path_from(explicit, env::var(TUNING_PATH_ENV_VAR))
}

fn resolve_tuning_path_from(
    explicit: Option<PathBuf>,
    env_value: Result<String, env::VarError>,
) -> Result<Option<PathBuf>, TuningError> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    match env_value {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(PathBuf::from(value.trim()))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(TuningError::EnvVar {
            var: TUNING_PATH_ENV_VAR,
            source,
        }),
    }
}

/// Loads and validates tuning. `None` means built-in defaults.
pub fn load_tuning(path: Option<&Path>) -> Result<ArenaTuning, TuningError> {
    let tuning = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let tuning = parse_tuning_json(&raw, path)?;
            info!(path = %path.display(), "tuning_loaded");
            tuning
        }
        None => {
            info!("tuning_defaults_used");
            ArenaTuning::default()
        }
    };
    tuning.validate()?;
    Ok(tuning)
}

fn parse_tuning_json(raw: &str, path: &Path) -> Result<ArenaTuning, TuningError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, ArenaTuning>(&mut deserializer).map_err(|error| {
        let field_path = match error.path().to_string() {
            path if path.is_empty() || path == "." => "<root>".to_string(),
            path => path,
        };
        TuningError::Parse {
            path: path.to_path_buf(),
            field_path,
            source: error.into_inner(),
        }
    })
}

impl ArenaTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        require_positive_count("ticks_per_second", self.ticks_per_second as usize)?;

        require_positive_count("player.max_health", self.player.max_health.max(0) as usize)?;
        require_non_negative("player.speed", self.player.speed)?;
        require_finite_point("player.spawn", self.player.spawn)?;

        let abilities = &self.abilities;
        require_non_negative(
            "abilities.lightning_cooldown_seconds",
            abilities.lightning_cooldown_seconds,
        )?;
        require_positive_count("abilities.lightning_bolts", abilities.lightning_bolts)?;
        require_non_negative("abilities.lightning_bolt_speed", abilities.lightning_bolt_speed)?;
        require_non_negative(
            "abilities.lightning_bolt_lifetime_seconds",
            abilities.lightning_bolt_lifetime_seconds,
        )?;
        require_positive_count(
            "abilities.max_freezable_enemies",
            abilities.max_freezable_enemies,
        )?;
        require_non_negative("abilities.frost_range", abilities.frost_range)?;
        require_non_negative(
            "abilities.frost_half_angle_degrees",
            abilities.frost_half_angle_degrees,
        )?;
        if abilities.frost_half_angle_degrees > 180.0 {
            return Err(invalid(
                "abilities.frost_half_angle_degrees",
                "must not exceed 180",
            ));
        }
        require_non_negative(
            "abilities.frost_slow_multiplier",
            abilities.frost_slow_multiplier,
        )?;
        require_non_negative(
            "abilities.stink_cooldown_seconds",
            abilities.stink_cooldown_seconds,
        )?;
        require_positive_count("abilities.stink_clouds", abilities.stink_clouds)?;
        require_non_negative(
            "abilities.stink_cloud_lifetime_seconds",
            abilities.stink_cloud_lifetime_seconds,
        )?;
        require_non_negative(
            "abilities.slime_cooldown_seconds",
            abilities.slime_cooldown_seconds,
        )?;
        require_non_negative("abilities.slime_speed", abilities.slime_speed)?;
        require_non_negative(
            "abilities.slime_lifetime_seconds",
            abilities.slime_lifetime_seconds,
        )?;

        let enemies = &self.enemies;
        require_non_negative("enemies.spawn_interval_seconds", enemies.spawn_interval_seconds)?;
        if enemies.spawn_interval_seconds == 0.0 {
            return Err(invalid("enemies.spawn_interval_seconds", "must be greater than 0"));
        }
        require_positive_count("enemies.max_per_spawner", enemies.max_per_spawner)?;
        require_non_negative("enemies.speed", enemies.speed)?;
        for point in &enemies.spawn_points {
            require_finite_transform("enemies.spawn_points", *point)?;
        }

        require_non_negative("ally.duration_seconds", self.ally.duration_seconds)?;
        require_non_negative("ally.speed", self.ally.speed)?;
        require_finite_transform("ally.spawn_point", self.ally.spawn_point)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive_count(field: &'static str, value: usize) -> Result<(), TuningError> {
    if value == 0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if !value.is_finite() {
        return Err(invalid(field, format!("expected finite number, got {value}")));
    }
    if value < 0.0 {
        return Err(invalid(field, format!("expected non-negative number, got {value}")));
    }
    Ok(())
}

fn require_finite_point(field: &'static str, point: Vec2) -> Result<(), TuningError> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(invalid(field, "coordinates must be finite"));
    }
    Ok(())
}

fn require_finite_transform(field: &'static str, transform: Transform) -> Result<(), TuningError> {
    require_finite_point(field, transform.position)?;
    if transform.rotation_radians.is_some_and(|rotation| !rotation.is_finite()) {
        return Err(invalid(field, "rotation must be finite"));
    }
    Ok(())
}
