// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::Result;
use crossterm::event::Event;
use scalescope::config::{validate_config, ConfigEvent, ConfigWatcher, Settings};
use scalescope::midi::{list_sources, print_sources, MidiInput, NoteTracker};
use scalescope::music::{
    ChordLocator, ConnectionTable, HarmonicGraph, Note, PitchClassSet, ScaleCatalog,
};
use scalescope::ui::{App, FpsCounter, KeyAction, UiState};
use std::env;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Scalescope - Real-time scale finder for MIDI input");
    println!();
    println!("Usage: scalescope [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-sources          List available MIDI sources (inputs)");
    println!("  --source <N>            Connect to MIDI source N");
    println!("  --config <PATH>         Load settings from PATH and reload it on change");
    println!("  --monitor <N>           Headless mode: print matches from source N");
    println!("  --help                  Show this help message");
    println!();
    println!("With no options, Scalescope connects to the configured (or first)");
    println!("MIDI source and starts the viewer. Press 'q' to quit, '?' for keys.");
}

fn init_tracing() {
    // Silent unless RUST_LOG asks for output; log lines go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn monitor_input(source: usize) -> Result<()> {
    println!("Connecting to MIDI source {}...", source);
    let input = MidiInput::new(source)?;
    let locator = ChordLocator::new(ScaleCatalog::standard());
    let mut tracker = NoteTracker::new();

    println!(
        "Monitoring '{}' (press Ctrl+C to stop)...",
        input.source_name()
    );
    println!();

    let mut last_held = PitchClassSet::EMPTY;
    loop {
        // Check for incoming messages
        for msg in input.recv_all() {
            tracker.apply(&msg);
        }

        let held = tracker.sounding_pitch_classes();
        if held != last_held {
            last_held = held;
            if held.is_empty() {
                println!("(nothing held)");
            } else {
                let result = locator.locate(held);
                println!("{}  ->  {} possibilities", held, result.total_matches());
                for (id, ts) in result.iter() {
                    if ts.is_empty() {
                        continue;
                    }
                    if let Some(family) = locator.catalog().family(id) {
                        let names: Vec<String> = ts
                            .iter()
                            .map(|&t| Note::from_pitch_class(t).to_string())
                            .collect();
                        println!("  {:<15} {}", family.label(), names.join(" "));
                    }
                }
            }
        }

        // Small sleep to prevent busy-waiting
        thread::sleep(Duration::from_millis(1));
    }
}

fn run(source_override: Option<usize>, config_path: Option<PathBuf>) -> Result<()> {
    // Fall back to a scalescope.yaml next to the binary's working directory
    let config_path = config_path.or_else(|| {
        let default = PathBuf::from("scalescope.yaml");
        default.exists().then_some(default)
    });

    let mut settings = match &config_path {
        Some(path) => validate_config(path)?,
        None => Settings::default(),
    };

    let catalog = ScaleCatalog::standard();
    let graph = HarmonicGraph::build(&catalog, &ConnectionTable::standard())?;
    let locator = ChordLocator::new(catalog);
    tracing::info!(
        "Harmonic graph built: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let sources = list_sources();
    if sources.is_empty() {
        anyhow::bail!("No MIDI sources available. Connect a MIDI device and try again.");
    }
    let source = source_override
        .or_else(|| settings.midi.resolve_source(&sources))
        .unwrap_or(0);
    let input = MidiInput::new(source)?;

    let watcher = match &config_path {
        Some(path) => Some(ConfigWatcher::new(path, None)?),
        None => None,
    };

    let mut tracker = NoteTracker::new();
    let mut fps = FpsCounter::new();

    let mut app = App::new()?;
    app.set_frame_rate(settings.display.frame_rate);

    let mut state = UiState::new(locator.catalog(), &graph, &settings.display);
    state.source_name = input.source_name().to_string();

    while app.is_running() {
        // Keyboard input; the poll timeout paces the frame
        if let Some(Event::Key(key)) = app.poll_event()? {
            if app.handle_key(key.code, key.modifiers, &mut state) == KeyAction::ClearNotes {
                tracker.clear();
            }
        }

        // Drain incoming MIDI
        for msg in input.recv_all() {
            if settings.midi.channel.map_or(true, |ch| msg.channel() == Some(ch)) {
                tracker.apply(&msg);
            }
        }
        state.pedal = tracker.pedal_down();
        state.keys_down = tracker.keys_down();

        let held = tracker.sounding_pitch_classes();
        if held != state.held {
            state.held = held;
            state.matches = locator.locate(held);
            state.highlighted = graph.highlight(&state.matches);
        }

        // Settings file changes
        if let Some(watcher) = &watcher {
            for event in watcher.recv_all() {
                match event {
                    ConfigEvent::Reloaded(new_settings) => {
                        settings = *new_settings;
                        app.set_frame_rate(settings.display.frame_rate);
                        state.apply_display(&settings.display);
                        state.set_status("Configuration reloaded");
                    }
                    ConfigEvent::Error(message) => {
                        tracing::warn!("Config reload failed: {}", message);
                        state.set_status(format!("Config error: {}", message));
                    }
                }
            }
        }

        state.clear_expired_status();
        state.fps = fps.tick();

        app.draw(&state, locator.catalog(), &graph)?;
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    // Modes that bypass the viewer
    if args.len() >= 2 {
        match args[1].as_str() {
            "--list-sources" => {
                print_sources();
                return Ok(());
            }
            "--monitor" => {
                if args.len() < 3 {
                    eprintln!("Error: --monitor requires a source number");
                    eprintln!("Use --list-sources to see available sources");
                    std::process::exit(1);
                }
                let source: usize = args[2]
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid source number: {}", args[2]))?;
                return monitor_input(source);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => {}
        }
    }

    // Viewer options
    let mut source_override: Option<usize> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--source" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --source requires a source number");
                    eprintln!("Use --list-sources to see available sources");
                    std::process::exit(1);
                }
                let source: usize = args[i + 1]
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid source number: {}", args[i + 1]))?;
                source_override = Some(source);
                i += 2;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
    }

    run(source_override, config_path)
}
