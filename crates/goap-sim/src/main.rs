//! Headless woodcutter simulation.
//!
//! Drives a [`GoapAgent`] through a scripted world: the axe breaks mid-job
//! and a wolf shows up while the agent is at the tree, forcing re-planning
//! and a goal switch before the fire is lit.
//!
//! # Environment
//!
//! - `GOAP_*`: planner and runner settings (see `GoapConfig::from_env`)
//! - `SIM_MAX_TICKS`: simulation length (default 200)
//! - `RUST_LOG`: log filter (default `info`)
//!
//! ```bash
//! RUST_LOG=goap=debug cargo run -p goap-sim
//! ```
mod domain;
mod world;

use std::sync::Arc;

use anyhow::{Result, bail};
use goap::{FactValue, GoapAgent, GoapConfig};
use world::{Event, SimWorld};

const DEFAULT_MAX_TICKS: u64 = 200;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GoapConfig::from_env();
    let max_ticks = std::env::var("SIM_MAX_TICKS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);
    tracing::info!("Starting woodcutter simulation ({} ticks max)", max_ticks);
    tracing::debug!("Config: {:?}", config);

    let library = Arc::new(domain::library()?);
    let mut world = SimWorld::new(Arc::clone(&library), domain::start(), events());
    let mut agent = GoapAgent::new(Arc::clone(&library), config);
    for goal in domain::goals() {
        agent.add_goal(goal);
    }
    for tree in domain::memory().iter() {
        agent.remember(tree);
    }

    while world.tick() < max_ticks {
        world.advance();
        let live = world.state().clone();
        let state = agent.tick(&live, &mut world);
        tracing::debug!("[t={}] runner {}", world.tick(), state);

        if world.state().get("warm") == Some(&FactValue::Bool(true)) {
            tracing::info!(
                "Fire lit at t={} after {} completed jobs: {}",
                world.tick(),
                world.completed_jobs(),
                world.state()
            );
            return Ok(());
        }
    }

    bail!(
        "agent did not get warm within {} ticks (final state {})",
        max_ticks,
        world.state()
    )
}

fn events() -> Vec<Event> {
    vec![
        Event {
            at: 9,
            label: "the axe handle snaps",
            apply: |state| state.with("has_axe", false),
        },
        Event {
            at: 14,
            label: "a wolf appears at the tree line",
            apply: |state| state.with("wolf_nearby", true),
        },
        Event {
            at: 24,
            label: "the wolf wanders off",
            apply: |state| state.with("wolf_nearby", false),
        },
    ]
}
