//! Main solver interface.

use crate::circuit::{unreachable_nodes, Circuit};
use crate::error::Result;

use super::mna::{assemble, MnaSystem, StampPolicy};
use super::solution::Solution;
use super::DEFAULT_PIVOT_TOLERANCE;

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// How voltage sources are stamped.
    pub policy: StampPolicy,
    /// Relative pivot threshold for singularity detection.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            policy: StampPolicy::default(),
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stamping policy.
    pub fn with_policy(mut self, policy: StampPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the relative pivot tolerance.
    ///
    /// A pivot no larger than `tolerance` times its column's largest entry makes
    /// the system singular.
    /// Raising it flags ill-conditioned networks earlier; lowering it lets
    /// extreme resistance ratios through.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }
}

/// DC solver for one circuit.
///
/// Each call to [`Simulator::run`] assembles and solves a fresh system; no
/// state carries over between calls.
pub struct Simulator {
    circuit: Circuit,
    config: SolverConfig,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SolverConfig::default())
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(circuit: Circuit, config: SolverConfig) -> Self {
        Self { circuit, config }
    }

    /// Get a reference to the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Get the active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Build `G` and `I` without solving.
    pub fn assemble(&self) -> Result<MnaSystem> {
        assemble(&self.circuit, self.config.policy)
    }

    /// Assemble, solve, and map the result back to node names.
    pub fn run(&self) -> Result<Solution> {
        let system = self.assemble()?;
        self.solve_system(&system)
    }

    /// Solve an already assembled system of this circuit.
    pub fn solve_system(&self, system: &MnaSystem) -> Result<Solution> {
        let unreachable = unreachable_nodes(&self.circuit)?;
        if !unreachable.is_empty() {
            log::warn!("nodes with no path to ground: {}", unreachable.join(", "));
        }

        let x = system.solve(self.config.pivot_tolerance)?;
        log::debug!("solved {} unknowns", x.len());
        Solution::from_system(system, &x, &self.circuit.index)
    }
}
