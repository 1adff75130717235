//! Headless infiltration runner
//!
//! Plays a seeded run on autopilot: walk the shortest path toward the
//! gateway every turn, wipe logs when detection runs high, and report how far
//! the intruder got.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use rogue_signal::abilities::{AbilityCategory, AbilityId};
use rogue_signal::grid::find_path;
use rogue_signal::simulation::{RunOutcome, RunSnapshot, RunState, TurnEvent};
use rogue_signal::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "infiltrate_sim")]
#[command(about = "Run a seeded Rogue Signal infiltration on autopilot")]
struct Args {
    /// Random seed for the run
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum turns before giving up
    #[arg(long, default_value_t = 2000)]
    turns: u64,

    /// Balance overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Summary printed at the end of a run
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    outcome: RunOutcome,
    kills: usize,
    bosses: usize,
    levels_cleared: u32,
    patches_identified: Vec<&'static str>,
    loadout: Vec<LoadoutLine>,
    final_state: RunSnapshot,
}

#[derive(Serialize)]
struct LoadoutLine {
    name: &'static str,
    category: AbilityCategory,
    description: &'static str,
}

impl LoadoutLine {
    fn of(id: AbilityId) -> Self {
        let def = id.def();
        Self {
            name: def.name,
            category: id.category(),
            description: def.description,
        }
    }
}

/// Detection level at which the autopilot reaches for the log wiper
const WIPE_AT: i32 = 70;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rogue_signal=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => match RunConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config '{}': {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => RunConfig::default(),
    };

    let mut run = match RunState::new(config, seed) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Cannot start run: {}", e);
            std::process::exit(2);
        }
    };

    let mut kills = 0;
    let mut bosses = 0;
    let mut levels_cleared = 0;
    let mut patches_identified = Vec::new();
    let mut processed = 0;

    while !run.is_over() && processed < args.turns {
        let report = match autopilot_step(&mut run) {
            Ok(report) => report,
            Err(e) => {
                tracing::debug!(error = %e, "autopilot action refused, waiting");
                match run.wait() {
                    Ok(report) => report,
                    Err(_) => break,
                }
            }
        };
        if report.turn_processed {
            processed += 1;
        }
        for event in &report.events {
            match event {
                TurnEvent::SentinelDestroyed { .. } => kills += 1,
                TurnEvent::BossSpawned { .. } => bosses += 1,
                TurnEvent::LevelAdvanced { .. } | TurnEvent::RunCompleted => levels_cleared += 1,
                TurnEvent::PatchUsed {
                    effect,
                    discovered: true,
                    ..
                } => patches_identified.push(effect.name()),
                _ => {}
            }
        }
    }

    let summary = RunSummary {
        seed,
        outcome: run.outcome,
        kills,
        bosses,
        levels_cleared,
        patches_identified,
        loadout: run
            .intruder
            .loadout
            .equipped()
            .iter()
            .map(|id| LoadoutLine::of(*id))
            .collect(),
        final_state: run.snapshot(),
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        }
    } else {
        print_text(&summary);
    }
}

/// One autopilot decision
fn autopilot_step(
    run: &mut RunState,
) -> std::result::Result<rogue_signal::TurnReport, rogue_signal::CommandError> {
    if run.detection_level() >= WIPE_AT && run.intruder.loadout.contains(AbilityId::LogWiper) {
        if let Ok(report) = run.use_ability(AbilityId::LogWiper, None) {
            return Ok(report);
        }
    }

    let Some(gateway) = run.gateway() else {
        return run.wait();
    };
    match find_path(&run.map, run.intruder.pos, gateway) {
        Some(path) if path.len() >= 2 => {
            let next = path[1];
            let from = run.intruder.pos;
            run.attempt_move(next.x - from.x, next.y - from.y)
        }
        _ => run.wait(),
    }
}

fn print_text(summary: &RunSummary) {
    let state = &summary.final_state;
    println!("=== ROGUE SIGNAL: seed {} ===", summary.seed);
    println!("Outcome:        {:?}", summary.outcome);
    println!("Level:          {} ({})", state.level, state.level_name);
    println!("Turns:          {}", state.turn);
    println!("Levels cleared: {}", summary.levels_cleared);
    println!("Integrity:      {}", state.integrity);
    println!("Heat:           {}", state.heat);
    println!("Detection:      {}%", state.detection);
    println!("Kills:          {}", summary.kills);
    println!("Bosses seen:    {}", summary.bosses);
    if !summary.patches_identified.is_empty() {
        println!("Patches:        {}", summary.patches_identified.join(", "));
    }
    println!("Loadout:");
    for line in &summary.loadout {
        println!("  {:<16} {:<10} {}", line.name, format!("{:?}", line.category), line.description);
    }
}
