use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use serde_json::Value;

use mapscriber::host::{HitArea, HostCall, RecordingHost};
use mapscriber::input::InputEvent;
use mapscriber::mode::builtin::{SimpleSelectMode, StaticMode, TraceLog, Traced};
use mapscriber::mode::{ModeRegistry, SwitchOptions};
use mapscriber::{Config, Dispatcher};

#[derive(Parser, Debug)]
#[command(name = "mapscriber")]
#[command(version, about = "Replay map editor input against the gesture dispatcher")]
struct Cli {
    /// JSON-lines script of input events and directives to replay
    #[arg(long, short = 'r', value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Config file to use instead of ~/.config/mapscriber/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mode to start in (overrides interaction.default_mode)
    #[arg(long, short = 'm', value_name = "NAME")]
    mode: Option<String>,

    /// Ignore touch events
    #[arg(long, action = ArgAction::SetTrue)]
    no_touch: bool,
}

/// Script lines that drive the replay rather than the dispatcher.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Directive {
    /// Place a hit-testable feature on the map
    Feature(HitArea),
    /// Dispatch by event name with an untyped payload
    Fire {
        name: String,
        #[serde(default)]
        event: Value,
    },
    ChangeMode {
        mode: String,
        #[serde(default)]
        options: Value,
        #[serde(default)]
        silent: bool,
    },
}

const DIRECTIVES: [&str; 3] = ["feature", "fire", "change_mode"];

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let Some(script) = cli.replay.as_deref() else {
        println!("mapscriber: Replay map editor input against the gesture dispatcher");
        println!();
        println!("Usage:");
        println!("  mapscriber --replay <FILE>    Replay a JSON-lines input script");
        println!("  mapscriber --help             Show help");
        println!();
        println!("Config file: ~/.config/mapscriber/config.toml");
        return Ok(());
    };

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(mode) = cli.mode {
        config.interaction.default_mode = mode;
    }
    if cli.no_touch {
        config.interaction.touch_enabled = false;
    }

    replay(script, &config)
}

fn replay(script: &Path, config: &Config) -> Result<()> {
    let contents = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;

    let trace = TraceLog::default();
    let registry = builtin_registry(&trace)?;
    let host = RecordingHost::new(config.style.overlay_layers.clone());
    let mut dispatcher = Dispatcher::new(host, registry, config)?;

    dispatcher.start()?;
    dispatcher.add_event_listeners();
    log::info!("Replaying {}", script.display());

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(&mut dispatcher, line)
            .with_context(|| format!("{}:{}", script.display(), index + 1))?;
        flush(&mut dispatcher, &trace)?;
    }

    dispatcher.remove_event_listeners();
    flush(&mut dispatcher, &trace)?;
    Ok(())
}

fn builtin_registry(trace: &TraceLog) -> Result<ModeRegistry> {
    let mut registry = ModeRegistry::new();

    let log = trace.clone();
    registry.register("static", move |_| Traced::new("static", StaticMode, log.clone()))?;

    let log = trace.clone();
    registry.register("simple_select", move |options| {
        Traced::new(
            "simple_select",
            SimpleSelectMode::from_options(options),
            log.clone(),
        )
    })?;

    Ok(registry)
}

fn run_line(dispatcher: &mut Dispatcher<RecordingHost>, line: &str) -> Result<()> {
    let value: Value = serde_json::from_str(line).context("Invalid JSON")?;
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

    if !DIRECTIVES.contains(&kind) {
        let event: InputEvent =
            serde_json::from_value(value).context("Unrecognized input event")?;
        dispatcher.handle(event)?;
        return Ok(());
    }

    match serde_json::from_value(value).context("Malformed directive")? {
        Directive::Feature(area) => dispatcher.host_mut().add_feature(area),
        Directive::Fire { name, event } => {
            dispatcher.fire(&name, event)?;
        }
        Directive::ChangeMode {
            mode,
            options,
            silent,
        } => {
            let switch = SwitchOptions { silent };
            dispatcher.change_mode(&mode, options, switch)?;
        }
    }
    Ok(())
}

/// Prints mode callbacks and notifications recorded since the last flush.
fn flush(dispatcher: &mut Dispatcher<RecordingHost>, trace: &TraceLog) -> Result<()> {
    for entry in trace.borrow_mut().drain(..) {
        println!("{}", serde_json::to_string(&entry)?);
    }
    for call in dispatcher.host_mut().take_calls() {
        if let HostCall::Notify(notification) = call {
            println!("{}", serde_json::to_string(&notification)?);
        }
    }
    Ok(())
}
