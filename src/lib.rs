//! # Nodal Core
//!
//! A netlist-to-linear-system compiler for resistive DC networks.
//!
//! This library provides:
//! - A parser for a line-oriented resistor / voltage-source netlist
//! - Deterministic indexing of non-ground nodes
//! - Modified Nodal Analysis (MNA) matrix assembly
//! - A dense LU solver that reports singular systems instead of returning
//!   garbage
//!
//! ## Architecture
//!
//! Data flows strictly one way: text → elements → (G, I) → x → named
//! voltages.
//!
//! - [`netlist`] - Netlist parser
//! - [`circuit`] - Node indexing and connectivity diagnostics
//! - [`solver`] - MNA assembly, linear solve, and result mapping
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! nodal divider.net -o divider.out
//! ```
//!
//! ### Library
//!
//! ```
//! use nodal_core::{solve_netlist, SolverConfig};
//!
//! let text = "R:R1 a gnd R=10\nR:R2 a b R=10\nVsrc:V1 b gnd U=5\n";
//! let solution = solve_netlist(text, &SolverConfig::default()).unwrap();
//! assert_eq!(solution.voltage("b"), Some(5.0));
//! ```
//!
//! ## Netlist Conventions
//!
//! The node `gnd` is the zero-volt reference and never gets an unknown.
//! A voltage source with one grounded terminal holds the other terminal at
//! its value; a floating source enforces `V(node_b) - V(node_a) = value`.

use std::path::Path;

pub mod circuit;
pub mod error;
pub mod netlist;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Circuit, NodeIndex, GROUND};
pub use error::{ErrorCategory, NodalError, Result};
pub use netlist::{Element, Netlist};
pub use solver::{Simulator, Solution, SolverConfig, StampPolicy};

/// Run the whole pipeline on netlist text.
pub fn solve_netlist(text: &str, config: &SolverConfig) -> Result<Solution> {
    let netlist = netlist::parse(text)?;
    let circuit = Circuit::from_netlist(netlist);
    Simulator::with_config(circuit, config.clone()).run()
}

/// Solve a netlist file and write the voltages to `output`.
///
/// The output file is only created once the full solution exists.
pub fn solve_file(input: &Path, output: &Path, config: &SolverConfig) -> Result<Solution> {
    let netlist = netlist::parse_file(input)?;
    let circuit = Circuit::from_netlist(netlist);
    let solution = Simulator::with_config(circuit, config.clone()).run()?;
    solution.write_file(output)?;
    log::info!(
        "wrote {} node voltages to {}",
        solution.len(),
        output.display()
    );
    Ok(solution)
}
