#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Tile Defence simulation.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tile_defence_core::{Command, EnemyKind, EntityKind, Event, SoundCue, SpawnPlan};
use tile_defence_system_bootstrap::{Bootstrap, Layout, DEFAULT_LAYOUT, DEFAULT_TARGET_HEALTH};
use tile_defence_world::{apply, query, Field, RuleBook};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless Tile Defence simulation", long_about = None)]
struct CliArgs {
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 3_000)]
    ticks: u64,
    /// Seed for movement tie-breaks.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML rule book overriding the built-in stats.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// ASCII map file; the built-in map is used when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Enemy kind released by every spawner.
    #[arg(long, value_enum, default_value_t = EnemyArg::Normal)]
    enemy: EnemyArg,
    /// Enemies released by each spawner.
    #[arg(long, default_value_t = 10)]
    enemies: u32,
    /// Ticks between releases.
    #[arg(long, default_value_t = 90)]
    interval: u64,
    /// Ticks before the first release.
    #[arg(long, default_value_t = 30)]
    delay: u64,
    /// Starting health of the target.
    #[arg(long, default_value_t = DEFAULT_TARGET_HEALTH)]
    target_health: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EnemyArg {
    Normal,
    Smaller,
    Tanker,
    Boss,
}

impl From<EnemyArg> for EnemyKind {
    fn from(value: EnemyArg) -> Self {
        match value {
            EnemyArg::Normal => Self::Normal,
            EnemyArg::Smaller => Self::Smaller,
            EnemyArg::Tanker => Self::Tanker,
            EnemyArg::Boss => Self::Boss,
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    ticks: u64,
    destroyed: usize,
    detonations: usize,
    sounds: usize,
}

/// Entry point for the Tile Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let rules = match &args.rules {
        Some(path) => RuleBook::load(path)
            .with_context(|| format!("loading rule book {}", path.display()))?,
        None => RuleBook::default(),
    };
    let source = match &args.layout {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading layout {}", path.display()))?,
        None => DEFAULT_LAYOUT.to_owned(),
    };
    let layout = Layout::parse(&source).context("parsing layout")?;

    let bootstrap = Bootstrap::new(
        SpawnPlan {
            enemy: EnemyKind::from(args.enemy),
            initial_delay: args.delay,
            interval: args.interval,
            count: args.enemies,
        },
        args.target_health,
    );

    let mut field = Field::new(rules, args.seed);
    let mut events = Vec::new();
    bootstrap.populate(&mut field, &layout, &mut events);
    events.clear();

    let summary = run(&mut field, args.ticks, &mut events);
    let outcome = if query::is_defeated(&field) {
        "defeated"
    } else {
        "held"
    };
    info!(
        ticks = summary.ticks,
        destroyed = summary.destroyed,
        detonations = summary.detonations,
        sounds = summary.sounds,
        credit = query::credit(&field),
        outcome,
        "simulation finished"
    );
    println!(
        "{outcome} after {} ticks: {} enemies destroyed, {} detonations, credit {}",
        summary.ticks,
        summary.destroyed,
        summary.detonations,
        query::credit(&field)
    );
    Ok(())
}

fn run(field: &mut Field, ticks: u64, events: &mut Vec<Event>) -> Summary {
    let mut summary = Summary::default();
    for _ in 0..ticks {
        apply(field, Command::Tick, events);
        summary.ticks += 1;

        for event in events.drain(..) {
            match event {
                Event::EntityDestroyed { kind, .. } if kind.is_enemy() => summary.destroyed += 1,
                Event::Detonated { .. } => summary.detonations += 1,
                Event::SoundRequested { cue, .. } => {
                    play(&cue);
                    summary.sounds += 1;
                }
                _ => {}
            }
        }

        if query::is_defeated(field) || is_cleared(field) {
            break;
        }
    }
    summary
}

fn is_cleared(field: &Field) -> bool {
    query::count(field, EntityKind::Spawner) == 0 && query::enemy_count(field) == 0
}

fn play(cue: &SoundCue) {
    debug!(cue = cue.as_str(), "sound requested");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
