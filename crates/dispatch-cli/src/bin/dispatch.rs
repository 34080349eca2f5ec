//! Drone delivery planner.
//!
//! Usage:
//!   cargo run -p dispatch-cli --bin dispatch -- plan --input request.json
//!   cargo run -p dispatch-cli --bin dispatch -- simulate --capacity-kg 5 --flight-hours 2 --route "0,0 3,4 0,0"
//!   cargo run -p dispatch-cli --bin dispatch -- demo --scenario random --orders 40

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dispatch_cli::sim::scenario_by_name;
use dispatch_cli::{parse_route, Config, PlanReport, PlanRequest, Scene, SimulationReport};
use dispatch_core::{plan, simulate, Drone, OrderIds};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan drone delivery trips from a depot")]
struct Args {
    /// Print compact JSON instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan trips for a JSON request
    Plan {
        /// Request file, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Replay the battery over an explicit route
    Simulate {
        #[arg(long, default_value = "SIM")]
        drone_id: String,
        #[arg(long)]
        capacity_kg: f64,
        #[arg(long)]
        flight_hours: f64,
        /// Route points as "x,y x,y ..."
        #[arg(long)]
        route: String,
    },
    /// Plan a built-in scenario
    Demo {
        /// capacity-split, autonomy, obstacle or random
        #[arg(long, default_value = "random")]
        scenario: String,
        /// Order count for the random scenario
        #[arg(long, default_value_t = 25)]
        orders: usize,
        /// Seed for the random scenario (defaults to DISPATCH_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env();
    let args = Args::parse();

    let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    let directives = config.log_directives(rust_log.as_deref());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.join(","))
        .with_context(|| format!("Invalid log directives '{}'", directives.join(",")))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let pretty = config.pretty && !args.compact;

    match args.command {
        Command::Plan { input } => {
            let text = read_input(&input)?;
            let scene = PlanRequest::from_json(&text)?
                .into_scene(input.clone(), &mut OrderIds::new())
                .with_context(|| format!("Invalid request in {input}"))?;
            run_plan(&scene, pretty)
        }
        Command::Simulate {
            drone_id,
            capacity_kg,
            flight_hours,
            route,
        } => {
            let drone = Drone::new(drone_id, capacity_kg, flight_hours)?;
            let route = parse_route(&route)?;
            let sim = simulate(&drone, &route)?;
            tracing::info!(
                "Simulated {} legs, completed: {}",
                sim.steps.len(),
                sim.completed
            );
            print_json(&SimulationReport::new(&drone, &sim), pretty)
        }
        Command::Demo {
            scenario,
            orders,
            seed,
        } => {
            let seed = seed.unwrap_or(config.seed);
            let scene = scenario_by_name(&scenario, &mut OrderIds::new(), orders, seed)?;
            run_plan(&scene, pretty)
        }
    }
}

fn run_plan(scene: &Scene, pretty: bool) -> Result<()> {
    tracing::info!(
        "Planning '{}': {} drones, {} orders, {} obstacles",
        scene.name,
        scene.drones.len(),
        scene.orders.len(),
        scene.obstacles.len()
    );
    let trips = plan(&scene.drones, &scene.orders, &scene.obstacles)?;
    let report = PlanReport::from_trips(scene.name.clone(), &trips)?;
    print_json(&report, pretty)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read request from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
