use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use arena_engine::{FixedStepper, LoopConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{ArenaSession, LoggedAllyBadge, LoggedCountdown};
use super::script::{parse_script, ScriptCommand, ScriptError};
use super::tuning::{load_tuning, resolve_tuning_path, ArenaTuning, TuningError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub tuning_path: Option<PathBuf>,
    /// Frame length fed to the fixed-step loop. Defaults to one tick per frame.
    pub frame_ms: Option<u64>,
    pub script_path: PathBuf,
}

pub struct AppWiring {
    pub config: LoopConfig,
    pub frame_dt: Duration,
    pub commands: Vec<ScriptCommand>,
    pub session: ArenaSession,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: ScriptError,
    },
    #[error("failed to encode tuning: {0}")]
    EncodeTuning(#[source] serde_json::Error),
}

pub fn build_app(options: LaunchOptions) -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Arena Startup ===");
    wire_app(options)
}

pub fn wire_app(options: LaunchOptions) -> Result<AppWiring, BootstrapError> {
    let tuning = resolve_and_load_tuning(options.tuning_path)?;
    let raw = fs::read_to_string(&options.script_path).map_err(|source| {
        BootstrapError::ReadScript {
            path: options.script_path.clone(),
            source,
        }
    })?;
    let commands = parse_script(&raw).map_err(|source| BootstrapError::Script {
        path: options.script_path.clone(),
        source,
    })?;

    let config = LoopConfig {
        target_tps: tuning.ticks_per_second,
        ..LoopConfig::default()
    };
    let frame_dt = match options.frame_ms {
        Some(ms) => Duration::from_millis(ms.max(1)),
        None => FixedStepper::new(&config).fixed_dt(),
    };
    let session = ArenaSession::new(&tuning)
        .with_cooldown_display(Box::new(LoggedCountdown))
        .with_summon_indicator(Box::new(LoggedAllyBadge));
    info!(
        commands = commands.len(),
        target_tps = config.target_tps,
        frame_ms = frame_dt.as_secs_f64() * 1000.0,
        "app_wired"
    );

    Ok(AppWiring {
        config,
        frame_dt,
        commands,
        session,
    })
}

/// Effective tuning as pretty JSON, defaults filled in.
pub fn resolved_tuning_json(tuning_path: Option<PathBuf>) -> Result<String, BootstrapError> {
    let tuning = resolve_and_load_tuning(tuning_path)?;
    serde_json::to_string_pretty(&tuning).map_err(BootstrapError::EncodeTuning)
}

fn resolve_and_load_tuning(explicit: Option<PathBuf>) -> Result<ArenaTuning, BootstrapError> {
    let path = resolve_tuning_path(explicit)?;
    Ok(load_tuning(path.as_deref())?)
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
