//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for DC analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations G x = I where:
//! - x contains node voltages and voltage source currents
//! - G is the conductance/coefficient matrix
//! - I is the excitation vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ C   0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C connect voltage sources to nodes
//! - v is the vector of node voltages
//! - j is the vector of voltage source currents
//! - e is the vector of voltage source values
//!
//! Under [`StampPolicy::Reduced`] the `B`/`C` blocks are absent and each
//! grounded source pins its node's row instead.

mod lu;
mod mna;
mod simulator;
mod solution;

pub use lu::{solve_dense, LuDecomposition, SingularPivot};
pub use mna::{assemble, MnaSystem, StampPolicy};
pub use simulator::{Simulator, SolverConfig};
pub use solution::{format_voltage, Solution};

/// Default relative pivot tolerance.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;
