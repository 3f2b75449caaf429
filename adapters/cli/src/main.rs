#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that boots the Delve experience.
//!
//! The adapter is the host side of the engine boundary: it polls the
//! keyboard for one [`delve_core::Intent`] per tick, feeds it to the turn
//! engine, and draws the returned read-only world view. Nothing here reaches
//! into engine internals; the single live world state and the seeded rng
//! stream are owned by the frame loop in [`frontend`].

mod frontend;

use anyhow::Context;
use clap::Parser;
use delve_core::{EngineConfig, WELCOME_BANNER};
use delve_system_turns::TurnEngine;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Command-line options for the Delve terminal client.
#[derive(Debug, Parser)]
#[command(name = "delve", about = "Grid-based dungeon encounter in the terminal")]
struct Args {
    /// Seed for the run's random stream; omit for a fresh one. The chosen
    /// seed is always logged so a run can be replayed later.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the Delve terminal client.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(seed, "{WELCOME_BANNER}");

    let engine = TurnEngine::new(EngineConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let world = engine
        .new_run(&mut rng)
        .context("generating the first level")?;

    frontend::run(&engine, world, rng)
}
