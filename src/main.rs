//! Headless driver: runs a command script against a session and prints the
//! resulting board.

use anyhow::{bail, Context, Result};
use blockfall::{Command, GameConfig, GameEvent, GameState, Snapshot};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Play a scripted falling-block session without a screen.
#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about)]
struct Args {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for piece generation (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Steps separated by spaces or commas:
    /// left, right, down, rotate, pause, restart, wait:<ms>
    #[arg(long, default_value = "")]
    script: String,

    /// Extra time to run after the script ends, in milliseconds
    #[arg(long, default_value_t = 0)]
    run_ms: u64,

    /// Start paused instead of resuming before the script
    #[arg(long)]
    paused: bool,

    /// Print the final snapshot and events as JSON
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Save the effective config to the platform config dir and exit
    #[arg(long)]
    write_config: bool,
}

/// One step of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Apply(Command),
    Wait(Duration),
}

fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| -> Result<Step> {
            if let Some(ms) = token.strip_prefix("wait:") {
                let ms: u64 = ms
                    .parse()
                    .with_context(|| format!("invalid wait duration: {token}"))?;
                return Ok(Step::Wait(Duration::from_millis(ms)));
            }
            match token.parse::<Command>() {
                Ok(command) => Ok(Step::Apply(command)),
                Err(e) => bail!(e),
            }
        })
        .collect()
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    snapshot: &'a Snapshot,
    events: &'a [GameEvent],
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env().add_directive("blockfall=info".parse()?);
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .with_context(|| format!("log path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GameConfig::load()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.log_file.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    if args.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let steps = parse_script(&args.script)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, steps = steps.len(), "running script");

    let mut game = GameState::new(config, seed).context("invalid game config")?;
    if !args.paused {
        game.apply(Command::TogglePause);
    }

    let mut events = game.drain_events();
    for step in steps {
        match step {
            Step::Apply(command) => {
                if !game.apply(command) {
                    tracing::debug!(?command, "command had no effect");
                }
            }
            Step::Wait(dt) => game.advance(dt),
        }
        events.extend(game.drain_events());
    }
    game.advance(Duration::from_millis(args.run_ms));
    events.extend(game.drain_events());

    let snapshot = game.snapshot();
    if args.json {
        let report = Report {
            seed,
            snapshot: &snapshot,
            events: &events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", snapshot.to_text());
        println!(
            "score: {}  elapsed: {}ms{}",
            snapshot.score,
            snapshot.elapsed_ms,
            if snapshot.game_over { "  GAME OVER" } else { "" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let steps = parse_script("left, rotate wait:300\ndown").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Apply(Command::MoveLeft),
                Step::Apply(Command::Rotate),
                Step::Wait(Duration::from_millis(300)),
                Step::Apply(Command::MoveDown),
            ]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(parse_script("wait:soon").is_err());
        assert!(parse_script("left jump").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["blockfall", "--seed", "7", "--script", "left", "--json"])
            .unwrap();
        assert_eq!(args.seed, Some(7));
        assert!(args.json);
        assert!(!args.paused);
    }
}
