//! Headless runner: loads the start room from a level directory, plays an
//! optional input script at the fixed tick rate and reports what happened.
//!
//! Usage:
//!   figjam <level-dir> [--settings figjam.json] [--script input.json] [--ticks N]
//!   RUST_LOG=debug figjam levels --fast

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use figjam::level::DirLevelSource;
use figjam::platform::{FixedStep, InputScript, SystemClock};
use figjam::sim::GameEvent;
use figjam::{Game, Settings};

#[derive(Parser)]
#[command(name = "figjam")]
#[command(about = "Run the platformer simulation headless")]
struct Args {
    /// Directory holding the level files
    #[arg(default_value = ".")]
    levels: PathBuf,

    /// JSON settings file; defaults are used if missing
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON input script to replay
    #[arg(long)]
    script: Option<PathBuf>,

    /// Ticks to run (default: the script's length, or ten seconds)
    #[arg(long)]
    ticks: Option<u64>,

    /// Run as fast as possible instead of at the tick rate
    #[arg(long)]
    fast: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let script = match &args.script {
        Some(path) => InputScript::load(path)
            .with_context(|| format!("loading input script {}", path.display()))?,
        None => InputScript::default(),
    };
    let ticks = args
        .ticks
        .or_else(|| script.last_tick().map(|t| t + 1))
        .unwrap_or((10.0 / settings.tick_seconds).round() as u64);

    let mut pacer = FixedStep::new(settings.tick_seconds);
    let mut game = Game::new(settings, DirLevelSource::new(args.levels.clone()))
        .with_context(|| format!("starting from {}", args.levels.display()))?;
    log::info!("Figjam starting in {} for {ticks} ticks", game.world.room.name);

    let clock = SystemClock;
    let mut sounds = BTreeMap::new();
    let mut effects = 0usize;
    let mut rooms = vec![game.world.room.name.clone()];
    for tick in 0..ticks {
        if !args.fast {
            pacer.wait(&clock);
        }
        for event in game.step(&script.events_for(tick)) {
            log::trace!("tick {tick}: {event:?}");
            match event {
                GameEvent::Sound(sound) => *sounds.entry(format!("{sound:?}")).or_insert(0) += 1,
                GameEvent::Effect { .. } => effects += 1,
            }
        }
        if rooms.last() != Some(&game.world.room.name) {
            rooms.push(game.world.room.name.clone());
        }
    }

    let world = &game.world;
    println!("=== {} ticks ===", world.frame);
    println!("  Rooms:    {}", rooms.join(" -> "));
    println!("  Player:   {} hp at {}", world.player.hitpoints, world.player.position);
    println!("  Enemies:  {}", world.enemy_count());
    println!("  Effects:  {effects}");
    for (sound, count) in &sounds {
        println!("  {sound:<14}{count}");
    }
    Ok(())
}
