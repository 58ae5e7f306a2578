//! Nodal - DC solver for resistive netlists.
//!
//! Reads a netlist, solves it with Modified Nodal Analysis and writes one
//! `<node> <voltage>` line per non-ground node.
//!
//! # Usage
//!
//! ```bash
//! nodal circuit.net -o voltages.txt
//! nodal circuit.net --policy reduced --dump-system -v
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use nodal_core::{
    circuit::Circuit,
    error::{NodalError, Result},
    netlist,
    solver::DEFAULT_PIVOT_TOLERANCE,
    Simulator, SolverConfig, StampPolicy,
};

/// Voltage source stamping policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Full MNA with one current unknown per source
    Full,
    /// Ground-referenced; every source must have a grounded terminal
    Reduced,
}

impl From<Policy> for StampPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Full => StampPolicy::Full,
            Policy::Reduced => StampPolicy::Reduced,
        }
    }
}

/// Resistive network DC solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    input: PathBuf,

    /// Where to write node voltages (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Voltage source stamping policy
    #[arg(long, value_enum, default_value_t = Policy::Full)]
    policy: Policy,

    /// Relative pivot tolerance for singularity detection
    #[arg(long, default_value_t = DEFAULT_PIVOT_TOLERANCE)]
    pivot_tolerance: f64,

    /// Print the assembled G matrix and I vector to stderr
    #[arg(long)]
    dump_system: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = SolverConfig::new()
        .with_policy(args.policy.into())
        .with_pivot_tolerance(args.pivot_tolerance);

    // Parse the netlist file
    let netlist = netlist::parse_file(&args.input)?;

    // Index nodes and build the simulator
    let simulator = Simulator::with_config(Circuit::from_netlist(netlist), config);

    let system = simulator.assemble()?;
    if args.dump_system {
        eprint!("{system}");
    }

    let solution = simulator.solve_system(&system)?;

    match &args.output {
        Some(path) => solution.write_file(path)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            solution
                .write_to(&mut lock)
                .and_then(|_| lock.flush())
                .map_err(|e| NodalError::FileWriteError {
                    path: "<stdout>".to_string(),
                    source: e,
                })?;
        }
    }

    Ok(())
}
