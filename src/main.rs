use ahk_chord::chord::Chord;
use ahk_chord::client::{ChannelCapture, LogNotifier};
use ahk_chord::config::load_settings;
use ahk_chord::{Action, ChordManager, Command, Condition, InputToken, Settings, TextInjector};
use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(version, about = "Type keys on stdin, one per line, and watch them walk a demo chord tree.")]
struct Args {
    /// Settings files (YAML or TOML), merged left to right
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    configs: Vec<PathBuf>,

    /// Name of the hotkey shown at the start of every key path
    #[arg(long, default_value = "#Space")]
    trigger: String,

    /// Log resolution details
    #[arg(long, short)]
    verbose: bool,
}

/// Prints injected text instead of typing it.
struct StdoutInjector;

impl TextInjector for StdoutInjector {
    fn send_text(&self, text: &str) -> anyhow::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "> {text}")?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let settings = if args.configs.is_empty() {
        Settings::default()
    } else {
        load_settings(&args.configs).context("Failed to load settings")?
    };

    let chord = demo_chord(&settings)?;
    println!("{chord}");

    let (capture, sender) = ChannelCapture::new();
    let capture = Arc::new(capture);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let key = line.trim();
            if key.is_empty() {
                continue;
            }
            if sender.send(InputToken::raw(key)).is_err() {
                break;
            }
        }
    });

    let manager = ChordManager::new(capture.clone(), StdoutInjector, LogNotifier).with_settings(&settings);
    while !capture.is_closed() {
        match manager.trigger(&args.trigger, &chord) {
            Ok(outcome) => info!("{outcome}"),
            Err(e) => error!("{e:#}"),
        }
    }
    Ok(())
}

fn demo_chord(settings: &Settings) -> anyhow::Result<Chord> {
    let mut web = Chord::with_settings(settings)?;
    web.add_actions([
        Action::new("g", "https://www.google.com").with_description("Google"),
        Action::new("y", "https://www.youtube.com").with_description("YouTube"),
        Action::new("0-9", "https://news.ycombinator.com").with_description("Any digit"),
    ])?;

    let mut chord = Chord::with_settings(settings)?;
    chord.add_actions([
        Action::new("c", "calc").with_description("Send 'calc'"),
        Action::new("w", web).with_description("Web shortcuts"),
        Action::new("t", Command::callback(print_time)).with_description("Print the time"),
        Action::new("F*", Command::callback(|| Err(anyhow::anyhow!("function keys are not bound"))))
            .with_description("Fails on purpose"),
        Action::new("o", "odd second")
            .with_condition(Condition::predicate(|| Condition::from(unix_secs() % 2 == 1)))
            .with_description("Only on odd seconds"),
        Action::new("^x", 3.5).with_description("Ctrl+x, either side"),
    ])?;
    Ok(chord)
}

fn print_time() -> anyhow::Result<()> {
    println!("> {}s since epoch", unix_secs());
    Ok(())
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
