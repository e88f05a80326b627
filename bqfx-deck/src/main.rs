//! BQFX Deck (bqfx-deck) - Main entry point
//!
//! Runs the deck engine behind a minimal line-oriented console standing in
//! for a presentation layer: it validates raw input, drives the engine's
//! public operations, and renders engine events as they arrive.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bqfx_common::config::DeckConfig;
use bqfx_common::events::DeckEvent;
use bqfx_common::{Effect, Song};
use bqfx_deck::engine::DeckEngine;

/// Command-line arguments for bqfx-deck
#[derive(Parser, Debug)]
#[command(name = "bqfx-deck")]
#[command(about = "DJ queue console deck for BQFX")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BQFX_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = DeckConfig::resolve(args.config.as_deref())?;

    // Initialize tracing
    let default_filter = format!(
        "bqfx_deck={level},bqfx_common={level}",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting BQFX deck (tick interval {}ms)",
        config.tick_interval_ms
    );

    let engine = Arc::new(DeckEngine::new(&config));

    // Render engine events independently of the command loop
    let mut events = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => render_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("event stream lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    println!("BQFX deck console — type 'help' for commands");
    run_console(&engine).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Read console commands until EOF, 'quit', or ctrl-c
async fn run_console(engine: &Arc<DeckEngine>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                return Ok(());
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_command(engine, line.trim()).await {
                            return Ok(());
                        }
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Dispatch one console command; returns false when the console should exit
async fn handle_command(engine: &Arc<DeckEngine>, line: &str) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" => print_help(),
        "add" => add_song(engine, rest).await,
        "play" => match engine.play_next().await {
            // The PlaybackStarted event renders the confirmation
            Ok(_) => {}
            Err(e) => println!("cannot play: {}", e),
        },
        "push" => match rest.parse::<Effect>() {
            Ok(effect) => {
                let active = engine.push_effect(effect).await;
                println!("active effects: {}", format_effects(&active));
            }
            Err(e) => println!("{}", e),
        },
        "pop" => match engine.pop_effect().await {
            Ok(effect) => println!("removed {}", effect),
            Err(e) => println!("cannot pop: {}", e),
        },
        "queue" => {
            let queue = engine.queue_snapshot().await;
            if queue.is_empty() {
                println!("queue is empty");
            }
            for (index, entry) in queue.iter().enumerate() {
                println!("{:>2}. {}", index + 1, entry.song);
            }
        }
        "fx" => {
            let active = engine.active_effects().await;
            println!("active effects: {}", format_effects(&active));
        }
        "history" => {
            let history = engine.history_snapshot().await;
            if history.is_empty() {
                println!("nothing played yet");
            }
            for (index, song) in history.iter().enumerate() {
                println!("{:>2}. {}", index + 1, song);
            }
        }
        "status" => {
            println!("{}", engine.now_playing_label().await);
            println!("progress: {:.0}%", engine.progress().await * 100.0);
        }
        "quit" | "exit" => return false,
        other => println!("unknown command '{}', try 'help'", other),
    }
    true
}

/// Parse `add <title> [; artist [; duration]]` and enqueue the song
async fn add_song(engine: &Arc<DeckEngine>, rest: &str) {
    if rest.is_empty() {
        println!("usage: add <title> [; artist [; duration]]");
        return;
    }

    let mut parts = rest.splitn(3, ';');
    let title = parts.next().unwrap_or("");
    let artist = parts.next();
    let duration_raw = parts.next().unwrap_or("");

    match Song::from_input(title, artist, duration_raw) {
        Ok(song) => {
            engine.enqueue(song).await;
        }
        Err(e) => println!("{}", e),
    }
}

/// Render one engine event on the console
fn render_event(event: &DeckEvent) {
    match event {
        DeckEvent::SongEnqueued {
            song, queue_len, ..
        } => {
            println!("added {} ({} in queue)", song, queue_len);
        }
        DeckEvent::PlaybackStarted { song, .. } => {
            println!("now playing: {}", song);
        }
        DeckEvent::PlaybackProgress {
            elapsed_secs,
            duration_secs,
            progress,
            ..
        } => {
            println!(
                "  [{:>3.0}%] {}s / {}s",
                progress * 100.0,
                elapsed_secs,
                duration_secs
            );
        }
        DeckEvent::PlaybackFinished { .. } => {
            println!("song finished");
        }
        DeckEvent::EffectPushed {
            effect,
            active_effects,
            ..
        } => {
            println!("stacked {} -> {}", effect, format_effects(active_effects));
        }
        DeckEvent::EffectPopped {
            effect,
            active_effects,
            ..
        } => {
            println!("removed {} -> {}", effect, format_effects(active_effects));
        }
        // Queue snapshots are pulled on demand with the 'queue' command
        DeckEvent::QueueChanged { .. } => {}
    }
}

fn format_effects(effects: &[Effect]) -> String {
    if effects.is_empty() {
        return "none".to_string();
    }
    effects
        .iter()
        .map(Effect::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}

fn print_help() {
    let names = Effect::ALL
        .iter()
        .map(Effect::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    println!("commands:");
    println!("  add <title> [; artist [; duration]]   enqueue a song");
    println!("  play                                  play the next queued song");
    println!("  push <effect>                         stack an effect ({})", names);
    println!("  pop                                   remove the last stacked effect");
    println!("  fx                                    show active effects");
    println!("  queue                                 show pending songs");
    println!("  history                               show played songs");
    println!("  status                                show playback state");
    println!("  quit                                  exit");
}
