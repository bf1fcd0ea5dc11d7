//! Gatesim - Logic Circuit Simulator
//!
//! Loads a netlist, applies input stimuli and prints the settled outputs.
//!
//! # Usage
//!
//! ```bash
//! gatesim adder.gs --set a=1 --set b=1
//! gatesim adder.gs --table
//! RUST_LOG=gatesim_core=debug gatesim adder.gs --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use gatesim_core::{
    dsl,
    engine::truth_table,
    error::{GatesimError, Result},
    PropagationConfig, Scene, Signal, DEFAULT_FRAME_TIME,
};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Digital logic circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Set an input pin before evaluating (NAME=0|1|x), repeatable
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    stimuli: Vec<String>,

    /// Print the truth table over all inputs instead of the outputs
    #[arg(short, long, conflicts_with = "json")]
    table: bool,

    /// Print the scene snapshot as JSON
    #[arg(short, long)]
    json: bool,

    /// Propagation pass budget per round
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "gatesim=debug,gatesim_core=debug"
    } else {
        "gatesim=warn,gatesim_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse and build the circuit
    let ast = dsl::parse_file(&args.circuit_file)?;
    let mut scene = Scene::from_ast(&ast)?;
    debug!(
        nodes = scene.len(),
        connections = scene.connection_count(),
        "circuit loaded"
    );

    if let Some(max_passes) = args.max_passes {
        scene.set_config(PropagationConfig::new().with_max_passes(max_passes));
    }

    let stimuli = args
        .stimuli
        .iter()
        .map(|s| parse_stimulus(&scene, s))
        .collect::<Result<Vec<_>>>()?;
    scene.set_inputs(&stimuli)?;

    let report = scene.run(DEFAULT_FRAME_TIME);
    if !report.converged {
        warn!(pinned = report.pinned.len(), "circuit did not settle");
    }

    if args.table {
        print!("{}", truth_table(&scene)?);
    } else if args.json {
        println!("{}", scene.snapshot().to_json()?);
    } else {
        for id in scene.output_pins() {
            let name = scene
                .get_node(id)
                .and_then(|n| n.label())
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string());
            println!("{} = {}", name, scene.output_value(id)?);
        }
    }

    Ok(())
}

/// Resolve `NAME=VALUE` against the scene's input pins.
fn parse_stimulus(scene: &Scene, text: &str) -> Result<(gatesim_core::NodeId, Signal)> {
    let (name, value) = text.split_once('=').ok_or_else(|| {
        GatesimError::invalid_value(text, 0, "expected NAME=VALUE")
    })?;
    let id = scene
        .find_by_label(name.trim())
        .ok_or_else(|| GatesimError::UndefinedName {
            name: name.trim().to_string(),
            line: 0,
        })?;
    let signal = Signal::from_symbol(value.trim())
        .ok_or_else(|| GatesimError::invalid_value(value, 0, "expected 0, 1 or x"))?;
    Ok((id, signal))
}
