use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use arena_game::app::bootstrap::{self, LaunchOptions};
use arena_game::app::loop_runner;
use tracing::error;

#[derive(Debug, PartialEq)]
enum CliCommand {
    Help,
    Run(LaunchOptions),
    PrintTuning { tuning_path: Option<PathBuf> },
}

fn main() -> ExitCode {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match command {
        CliCommand::Help => {
            println!("{}", usage_text());
            ExitCode::SUCCESS
        }
        CliCommand::Run(options) => match bootstrap::build_app(options) {
            Ok(app) => loop_runner::run(app),
            Err(err) => {
                error!(error = %err, "startup_failed");
                ExitCode::FAILURE
            }
        },
        CliCommand::PrintTuning { tuning_path } => {
            bootstrap::init_tracing();
            match bootstrap::resolved_tuning_json(tuning_path) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "tuning_load_failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        return Ok(CliCommand::Help);
    }

    let mut tuning_path = None;
    let mut frame_ms = None;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--tuning" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --tuning".to_string())?;
                tuning_path = Some(PathBuf::from(value));
                index += 2;
            }
            "--frame-ms" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --frame-ms".to_string())?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --frame-ms value '{value}' (expected u64)"))?;
                if parsed == 0 {
                    return Err("--frame-ms must be greater than zero".to_string());
                }
                frame_ms = Some(parsed);
                index += 2;
            }
            "-h" | "--help" => return Ok(CliCommand::Help),
            _ => break,
        }
    }

    let Some(subcommand) = args.get(index) else {
        return Err(format!("missing subcommand\n\n{}", usage_text()));
    };
    let rest = &args[index + 1..];
    match subcommand.as_str() {
        "run" => {
            let [script] = rest else {
                return Err("run expects exactly one <script> path".to_string());
            };
            Ok(CliCommand::Run(LaunchOptions {
                tuning_path,
                frame_ms,
                script_path: PathBuf::from(script),
            }))
        }
        "print-tuning" => {
            if !rest.is_empty() {
                return Err("print-tuning takes no arguments".to_string());
            }
            Ok(CliCommand::PrintTuning { tuning_path })
        }
        other => Err(format!("unknown subcommand '{other}'\n\n{}", usage_text())),
    }
}

fn usage_text() -> String {
    [
        "arena_game - headless arena runner",
        "",
        "Usage:",
        "  arena_game [--tuning <path>] [--frame-ms <u64>] run <script>",
        "  arena_game [--tuning <path>] print-tuning",
        "",
        "Script commands (one per line, '#' starts a comment):",
        "  press|release|tap <up|down|left|right|fire|switch|summon>",
        "  wait <frames>",
        "  face <x> <y>",
        "  defeat <entity id>",
        "  hit <damage>",
        "  score <points>",
        "",
        "Defaults:",
        "  --tuning $ARENA_TUNING_PATH, then built-in tuning",
        "  --frame-ms one fixed tick",
    ]
    .join("\n")
}
