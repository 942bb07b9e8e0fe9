//! Headless Battle Runner
//!
//! Runs an AI vs AI battle on the demo roster and prints the narration, or
//! the full event log as JSON lines.

use clap::Parser;
use gauge_battle::battle::{demo_roster, mirror_roster, BattleOutcome, BattleState};
use gauge_battle::core::{BalanceConfig, Result};
use serde::Serialize;

/// Headless Battle Runner - AI vs AI gauge battles
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI battle and print its narration or event log")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before giving up
    #[arg(long, default_value_t = gauge_battle::battle::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Balance config TOML (defaults apply when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Units per team for a mirror match instead of the demo roster
    #[arg(long)]
    mirror: Option<u32>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Final summary line
#[derive(Serialize)]
struct BattleResult {
    winner: Option<String>,
    ticks: u64,
    events: usize,
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => BalanceConfig::load(path)?,
        None => BalanceConfig::default(),
    };
    let roster = match args.mirror {
        Some(per_team) => mirror_roster(per_team),
        None => demo_roster(),
    };

    let mut state = BattleState::new(roster, config, seed)?;
    let text = args.format != "json";
    if args.format != "json" && args.format != "text" {
        eprintln!("Unknown format '{}', defaulting to text", args.format);
    }

    while !state.is_over() && state.tick < args.max_ticks {
        let mut report = state.run_tick();
        while let Some(narration) = report.narration.take() {
            if text {
                println!("[{:>5}] {}", state.tick, narration.text);
            }
            report = state.acknowledge(narration.token)?;
        }
    }

    let result = BattleResult {
        winner: match state.outcome {
            BattleOutcome::Ongoing => None,
            BattleOutcome::Winner(team) => Some(team.to_string()),
        },
        ticks: state.tick,
        events: state.battle_log.len(),
        seed,
    };

    if text {
        println!();
        match &result.winner {
            Some(winner) => println!("{} wins after {} ticks", winner, result.ticks),
            None => println!("No winner after {} ticks", result.ticks),
        }
        println!("Seed: {}", result.seed);
    } else {
        for event in &state.battle_log {
            match event.to_json_line() {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("Failed to serialize event: {}", e),
            }
        }
        match serde_json::to_string(&result) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        }
    }

    Ok(())
}
