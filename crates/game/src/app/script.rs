//! Headless command scripts: one command per line, `#` comments.

use arena_engine::{EntityId, InputAction, Vec2};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Press(InputAction),
    Release(InputAction),
    /// Press and release before the next tick.
    Tap(InputAction),
    /// Advance this many frames.
    Wait(u32),
    Face(Vec2),
    Defeat(EntityId),
    Hit(i32),
    Score(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: unknown action '{action}' (expected up, down, left, right, fire, switch or summon)")]
    UnknownAction { line: usize, action: String },
    #[error("line {line}: '{command}' expects {expected}")]
    WrongArity {
        line: usize,
        command: String,
        expected: &'static str,
    },
    #[error("line {line}: invalid value '{value}' (expected {expected})")]
    InvalidValue {
        line: usize,
        value: String,
        expected: &'static str,
    },
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        commands.push(parse_line(index + 1, trimmed)?);
    }
    Ok(commands)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptCommand, ScriptError> {
    let mut parts = text.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();
    let arity = |expected: &'static str, count: usize| {
        if args.len() == count {
            Ok(())
        } else {
            Err(ScriptError::WrongArity {
                line,
                command: command.to_string(),
                expected,
            })
        }
    };

    match command {
        "press" | "release" | "tap" => {
            arity("one action", 1)?;
            let action = parse_action(line, args[0])?;
            Ok(match command {
                "press" => ScriptCommand::Press(action),
                "release" => ScriptCommand::Release(action),
                _ => ScriptCommand::Tap(action),
            })
        }
        "wait" => {
            arity("a frame count", 1)?;
            Ok(ScriptCommand::Wait(parse_value(line, args[0], "frame count")?))
        }
        "face" => {
            arity("x and y", 2)?;
            let x: f32 = parse_value(line, args[0], "finite number")?;
            let y: f32 = parse_value(line, args[1], "finite number")?;
            if !x.is_finite() || !y.is_finite() {
                return Err(ScriptError::InvalidValue {
                    line,
                    value: format!("{} {}", args[0], args[1]),
                    expected: "finite number",
                });
            }
            Ok(ScriptCommand::Face(Vec2::new(x, y)))
        }
        "defeat" => {
            arity("an entity id", 1)?;
            Ok(ScriptCommand::Defeat(EntityId(parse_value(
                line,
                args[0],
                "entity id",
            )?)))
        }
        "hit" => {
            arity("a damage amount", 1)?;
            Ok(ScriptCommand::Hit(parse_value(line, args[0], "damage amount")?))
        }
        "score" => {
            arity("a point amount", 1)?;
            Ok(ScriptCommand::Score(parse_value(line, args[0], "point amount")?))
        }
        other => Err(ScriptError::UnknownCommand {
            line,
            command: other.to_string(),
        }),
    }
}

fn parse_action(line: usize, token: &str) -> Result<InputAction, ScriptError> {
    match token {
        "up" => Ok(InputAction::MoveUp),
        "down" => Ok(InputAction::MoveDown),
        "left" => Ok(InputAction::MoveLeft),
        "right" => Ok(InputAction::MoveRight),
        "fire" => Ok(InputAction::Fire),
        "switch" => Ok(InputAction::SwitchAbility),
        "summon" => Ok(InputAction::SummonAlly),
        other => Err(ScriptError::UnknownAction {
            line,
            action: other.to_string(),
        }),
    }
}

fn parse_value<T: std::str::FromStr>(
    line: usize,
    token: &str,
    expected: &'static str,
) -> Result<T, ScriptError> {
    token.parse::<T>().map_err(|_| ScriptError::InvalidValue {
        line,
        value: token.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script_ignores_blank_and_comment_lines() {
        let content = r#"
            # hold fire for a second
            press fire

            wait 60
            # let go
            release fire
        "#;
        assert_eq!(
            parse_script(content).expect("script"),
            vec![
                ScriptCommand::Press(InputAction::Fire),
                ScriptCommand::Wait(60),
                ScriptCommand::Release(InputAction::Fire),
            ]
        );
    }

    #[test]
    fn parse_script_reads_every_command_kind() {
        let content = "tap switch\nface 0 1\ndefeat 4\nhit 25\nscore 100\npress left";
        assert_eq!(
            parse_script(content).expect("script"),
            vec![
                ScriptCommand::Tap(InputAction::SwitchAbility),
                ScriptCommand::Face(Vec2::new(0.0, 1.0)),
                ScriptCommand::Defeat(EntityId(4)),
                ScriptCommand::Hit(25),
                ScriptCommand::Score(100),
                ScriptCommand::Press(InputAction::MoveLeft),
            ]
        );
    }

    #[test]
    fn errors_carry_the_source_line_number() {
        let content = "press fire\n\n# note\njump\n";
        assert_eq!(
            parse_script(content),
            Err(ScriptError::UnknownCommand {
                line: 4,
                command: "jump".to_string()
            })
        );
    }

    #[test]
    fn wrong_argument_count_is_reported() {
        let error = parse_script("wait").expect_err("missing frames");
        assert!(matches!(error, ScriptError::WrongArity { line: 1, .. }));
        assert_eq!(error.to_string(), "line 1: 'wait' expects a frame count");
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            parse_script("press jump"),
            Err(ScriptError::UnknownAction { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("wait soon"),
            Err(ScriptError::InvalidValue { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("face NaN 0"),
            Err(ScriptError::InvalidValue { line: 1, .. })
        ));
    }
}
