use std::sync::Arc;

use rewind_core::{
    command_for_key, Command, FocusTarget, Key, PlaybackSpeed, SnapshotSource, TradingDate,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{Cli, NavigateArgs};
use crate::error::CliError;

use super::{build_controller, controller_config};

const HELP: &str = "\
commands:
  left | right          previous / next day   (also ArrowLeft, ArrowRight)
  up | down             previous / next month (also ArrowUp, ArrowDown)
  space | play | pause  toggle / start / stop playback
  home | end            first day / today
  date YYYY-MM-DD       jump to a date
  speed MS              playback delay in milliseconds
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineCommand {
    Controller(Command),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<LineCommand>, CliError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let key = match head.to_ascii_lowercase().as_str() {
        "left" | "h" => Some(Key::ArrowLeft),
        "right" | "l" => Some(Key::ArrowRight),
        "up" | "k" => Some(Key::ArrowUp),
        "down" | "j" => Some(Key::ArrowDown),
        "space" => Some(Key::Space),
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        _ => Key::from_name(head),
    };
    if let Some(key) = key {
        return Ok(command_for_key(key, FocusTarget::Document).map(LineCommand::Controller));
    }

    let command = match head.to_ascii_lowercase().as_str() {
        "play" => LineCommand::Controller(Command::Play),
        "pause" => LineCommand::Controller(Command::Pause),
        "today" => LineCommand::Controller(Command::GoToToday),
        "date" => {
            let raw = argument
                .ok_or_else(|| CliError::Command(String::from("date needs YYYY-MM-DD")))?;
            LineCommand::Controller(Command::GoToDate(TradingDate::parse(raw)?))
        }
        "speed" => {
            let raw = argument
                .ok_or_else(|| CliError::Command(String::from("speed needs milliseconds")))?;
            LineCommand::Controller(Command::SetSpeed(raw.parse::<PlaybackSpeed>()?))
        }
        "help" | "?" => LineCommand::Help,
        "quit" | "exit" | "q" => LineCommand::Quit,
        other => return Err(CliError::Command(format!("unknown command '{other}', try 'help'"))),
    };
    Ok(Some(command))
}

/// Reads line commands from stdin and forwards them to a spawned controller
/// until `quit` or end of input.
pub async fn run(
    cli: &Cli,
    args: &NavigateArgs,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), CliError> {
    let config = controller_config(&args.range, args.speed_ms)?;
    let controller = build_controller(cli, config, source)?;
    let (handle, task) = controller.spawn();

    handle.send(Command::GoToToday).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(LineCommand::Controller(command))) => handle.send(command).await?,
            Ok(Some(LineCommand::Help)) => eprintln!("{HELP}"),
            Ok(Some(LineCommand::Quit)) => break,
            Ok(None) => {}
            Err(error) => eprintln!("error: {error}"),
        }
    }

    drop(handle);
    task.await
        .map_err(|error| CliError::Command(format!("controller task failed: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_words_and_dom_names_map_alike() {
        let word = parse_line("left").expect("parse");
        let dom = parse_line("ArrowLeft").expect("parse");

        assert_eq!(word, Some(LineCommand::Controller(Command::PreviousDay)));
        assert_eq!(word, dom);
    }

    #[test]
    fn date_and_speed_take_arguments() {
        assert_eq!(
            parse_line("date 2023-12-10").expect("parse"),
            Some(LineCommand::Controller(Command::GoToDate(
                TradingDate::parse("2023-12-10").expect("date")
            )))
        );
        assert_eq!(
            parse_line("speed 500").expect("parse"),
            Some(LineCommand::Controller(Command::SetSpeed(
                PlaybackSpeed::from_millis(500).expect("speed")
            )))
        );
        assert!(parse_line("speed").is_err());
    }

    #[test]
    fn blank_lines_are_ignored_and_unknown_words_rejected() {
        assert_eq!(parse_line("   ").expect("parse"), None);
        assert!(parse_line("rewind").is_err());
        assert_eq!(parse_line("q").expect("parse"), Some(LineCommand::Quit));
    }
}
