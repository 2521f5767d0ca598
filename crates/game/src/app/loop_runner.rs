use std::process::ExitCode;
use std::time::Duration;

use arena_engine::{FixedStepper, InputCollector, LoopConfig};
use serde::Serialize;
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;
use super::gameplay::{ArenaSession, SessionSummary};
use super::script::ScriptCommand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub frames: u64,
    pub ticks: u64,
    pub dropped_backlog_ms: u64,
}

#[derive(Debug, Serialize)]
struct RunReport {
    replay: ReplayStats,
    session: SessionSummary,
}

/// Feeds script commands through the fixed-step loop. Input commands are
/// buffered for the next tick; direct commands apply to the session at once.
pub fn replay(
    commands: &[ScriptCommand],
    session: &mut ArenaSession,
    config: &LoopConfig,
    frame_dt: Duration,
) -> ReplayStats {
    let mut stepper = FixedStepper::new(config);
    let mut input = InputCollector::new();
    let mut stats = ReplayStats::default();

    for command in commands {
        match *command {
            ScriptCommand::Press(action) => input.handle_action(action, true),
            ScriptCommand::Release(action) => input.handle_action(action, false),
            ScriptCommand::Tap(action) => {
                input.handle_action(action, true);
                input.handle_action(action, false);
            }
            ScriptCommand::Wait(frames) => {
                for _ in 0..frames {
                    let frame = stepper.advance_frame(frame_dt, &mut input, session);
                    stats.frames += 1;
                    stats.ticks += u64::from(frame.ticks_run);
                    stats.dropped_backlog_ms += frame.dropped_backlog.as_millis() as u64;
                }
            }
            ScriptCommand::Face(direction) => session.face(direction),
            ScriptCommand::Defeat(id) => {
                if !session.defeat_enemy(id) {
                    warn!(enemy = id.0, "defeat_target_not_active");
                }
            }
            ScriptCommand::Hit(amount) => {
                let outcome = session.damage_player(amount);
                info!(amount, outcome = ?outcome, "player_hit");
            }
            ScriptCommand::Score(points) => session.add_score(points),
        }
    }

    stats
}

pub fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        frame_dt,
        commands,
        mut session,
    } = app;

    let stats = replay(&commands, &mut session, &config, frame_dt);
    info!(frames = stats.frames, ticks = stats.ticks, "replay_finished");

    let report = RunReport {
        replay: stats,
        session: session.summary(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "summary_encode_failed");
            ExitCode::FAILURE
        }
    }
}
