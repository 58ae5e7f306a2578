//! MNA matrix assembly.

use std::fmt;

use crate::circuit::{Circuit, Placement, Terminal};
use crate::error::{NodalError, Result};
use crate::netlist::{Resistor, VoltageSource};

use super::lu::LuDecomposition;

/// How voltage sources enter the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StampPolicy {
    /// Full MNA: one auxiliary current unknown per source, dimension `n + m`.
    #[default]
    Full,
    /// Ground-referenced: dimension `n`, each source pins its node's row.
    /// Rejects floating sources.
    Reduced,
}

impl fmt::Display for StampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampPolicy::Full => write!(f, "full"),
            StampPolicy::Reduced => write!(f, "reduced"),
        }
    }
}

/// Assembled MNA system `G x = I`.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    /// Conductance matrix G (row-major)
    pub a: Vec<f64>,
    /// Excitation vector I
    pub z: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// Number of node-voltage unknowns; auxiliary rows start here
    pub num_nodes: usize,
    /// Policy the system was built with
    pub policy: StampPolicy,
    /// Name of every unknown, for diagnostics
    labels: Vec<String>,
    /// Source owning each auxiliary row, in row order
    sources: Vec<String>,
}

impl MnaSystem {
    /// Create a zeroed system.
    pub fn new(num_nodes: usize, num_branches: usize, policy: StampPolicy) -> Self {
        let size = num_nodes + num_branches;
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            size,
            num_nodes,
            policy,
            labels: (0..size).map(|i| format!("x{i}")).collect(),
            sources: Vec::with_capacity(num_branches),
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// One row of G.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.a[row * self.size..(row + 1) * self.size]
    }

    /// Name of the unknown at `index`: a node identifier or `I(<source>)`.
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Names of the sources with an auxiliary row, in row order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Stamp a conductance between two terminals.
    /// For a conductance g between nodes a and b:
    ///   G[a,a] += g
    ///   G[b,b] += g
    ///   G[a,b] -= g
    ///   G[b,a] -= g
    /// A grounded terminal contributes no row or column.
    pub fn stamp_conductance(&mut self, placement: Placement, g: f64) {
        match placement {
            Placement::Internal { a, b } => {
                self.add(a, a, g);
                self.add(b, b, g);
                self.add(a, b, -g);
                self.add(b, a, -g);
            }
            Placement::Grounded { node, .. } => self.add(node, node, g),
            Placement::Shorted => {}
        }
    }

    /// Stamp a voltage source with its own branch row `br`.
    ///
    /// Floating: `V[b] - V[a] = E`. Grounded: the non-ground terminal is
    /// held at `E`, with the branch current's sign following which terminal
    /// is grounded.
    pub fn stamp_voltage_source(&mut self, placement: Placement, br: usize, voltage: f64) {
        match placement {
            Placement::Internal { a, b } => {
                self.add(br, a, -1.0);
                self.add(br, b, 1.0);
                self.add(a, br, -1.0);
                self.add(b, br, 1.0);
                self.z[br] = voltage;
            }
            Placement::Grounded { node, ground } => {
                let sign = grounded_sign(ground);
                self.add(br, node, sign);
                self.add(node, br, sign);
                self.z[br] = sign * voltage;
            }
            // Rejected before stamping; an empty row leaves the system singular.
            Placement::Shorted => {}
        }
    }

    /// Replace a node's row with the constraint `V[node] = E`.
    ///
    /// Without a current unknown the source cannot enter that node's KCL
    /// equation, so the row becomes the voltage constraint itself. Adding
    /// `E` to `I` alone would leave a current balance with no source in it.
    /// Must run after every conductance has been stamped.
    pub fn pin_node(&mut self, node: usize, ground: Terminal, voltage: f64) {
        let sign = grounded_sign(ground);
        let size = self.size;
        self.a[node * size..(node + 1) * size].fill(0.0);
        self.set(node, node, sign);
        self.z[node] = sign * voltage;
    }

    /// Factor and solve the system.
    ///
    /// A vanishing pivot is reported against the unknown it belongs to.
    pub fn solve(&self, pivot_tolerance: f64) -> Result<Vec<f64>> {
        let lu = LuDecomposition::factor(&self.a, self.size, pivot_tolerance)
            .map_err(|p| NodalError::singular(self.label(p.column)))?;
        lu.solve(&self.z)
    }
}

fn grounded_sign(ground: Terminal) -> f64 {
    match ground {
        Terminal::A => -1.0,
        Terminal::B => 1.0,
    }
}

impl fmt::Display for MnaSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "G ({0}x{0}, {1} policy):", self.size, self.policy)?;
        for row in 0..self.size {
            write!(f, "  {:>10} |", self.labels[row])?;
            for value in self.row(row) {
                write!(f, " {value:>12.6}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "I:")?;
        for (label, value) in self.labels.iter().zip(&self.z) {
            writeln!(f, "  {label:>10} | {value:>12.6}")?;
        }
        Ok(())
    }
}

fn check_resistor(r: &Resistor) -> Result<f64> {
    if r.resistance_ohms > 0.0 {
        Ok(r.conductance())
    } else {
        Err(NodalError::NonPositiveResistance {
            name: r.name.clone(),
            line: r.line,
            value: r.resistance_ohms,
        })
    }
}

fn shorted(v: &VoltageSource) -> NodalError {
    NodalError::ShortedSource {
        name: v.name.clone(),
        line: v.line,
    }
}

/// Stamp every resistor into the node block of the system.
fn stamp_resistors(circuit: &Circuit, system: &mut MnaSystem) -> Result<()> {
    for r in circuit.resistors() {
        let g = check_resistor(r)?;
        let placement = circuit.index.placement(&r.nodes)?;
        if placement == Placement::Shorted {
            log::warn!("resistor '{}' at line {} has both terminals on ground", r.name, r.line);
        }
        system.stamp_conductance(placement, g);
    }
    Ok(())
}

/// Assemble `G` and `I` for a circuit under the given policy.
pub fn assemble(circuit: &Circuit, policy: StampPolicy) -> Result<MnaSystem> {
    let n = circuit.num_nodes();
    let system = match policy {
        StampPolicy::Full => assemble_full(circuit, n)?,
        StampPolicy::Reduced => assemble_reduced(circuit, n)?,
    };
    log::debug!("assembled {0}x{0} system ({1} policy)", system.size, policy);
    Ok(system)
}

fn node_labels(circuit: &Circuit, system: &mut MnaSystem) {
    for (i, name) in circuit.index.iter() {
        system.labels[i] = name.to_string();
    }
}

fn assemble_full(circuit: &Circuit, n: usize) -> Result<MnaSystem> {
    let mut system = MnaSystem::new(n, circuit.num_sources(), StampPolicy::Full);
    node_labels(circuit, &mut system);
    stamp_resistors(circuit, &mut system)?;

    for (k, v) in circuit.voltage_sources().enumerate() {
        let placement = circuit.index.placement(&v.nodes)?;
        if placement == Placement::Shorted {
            return Err(shorted(v));
        }
        let br = n + k;
        system.labels[br] = format!("I({})", v.name);
        system.sources.push(v.name.clone());
        system.stamp_voltage_source(placement, br, v.volts);
    }

    Ok(system)
}

fn assemble_reduced(circuit: &Circuit, n: usize) -> Result<MnaSystem> {
    let mut system = MnaSystem::new(n, 0, StampPolicy::Reduced);
    node_labels(circuit, &mut system);

    // Reject unsupported sources before any matrix work.
    let mut pins: Vec<Option<&VoltageSource>> = vec![None; n];
    let mut order = Vec::new();
    for v in circuit.voltage_sources() {
        let (node, ground) = match circuit.index.placement(&v.nodes)? {
            Placement::Grounded { node, ground } => (node, ground),
            Placement::Internal { .. } => {
                return Err(NodalError::FloatingSource {
                    name: v.name.clone(),
                    line: v.line,
                })
            }
            Placement::Shorted => return Err(shorted(v)),
        };
        if let Some(first) = pins[node] {
            return Err(NodalError::ConflictingSources {
                node: system.labels[node].clone(),
                first: first.name.clone(),
                second: v.name.clone(),
            });
        }
        pins[node] = Some(v);
        order.push((node, ground, v.volts));
    }

    stamp_resistors(circuit, &mut system)?;
    for (node, ground, volts) in order {
        system.pin_node(node, ground, volts);
    }

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn circuit(text: &str) -> Circuit {
        Circuit::from_netlist(netlist::parse(text).unwrap())
    }

    #[test]
    fn test_resistor_stamps() {
        let c = circuit("R:R1 a gnd R=2\nR:R2 a b R=4\nR:R3 gnd b R=5");
        let s = assemble(&c, StampPolicy::Full).unwrap();
        assert_eq!(s.size, 2);
        assert_relative_eq!(s.get(0, 0), 0.5 + 0.25);
        assert_relative_eq!(s.get(1, 1), 0.25 + 0.2);
        assert_relative_eq!(s.get(0, 1), -0.25);
        assert_relative_eq!(s.get(1, 0), -0.25);
        assert!(s.z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_stamping_is_order_independent() {
        let forward = circuit("R:R1 a gnd R=2\nR:R2 a b R=4\nR:R3 b gnd R=5");
        let reverse = circuit("R:R1 b gnd R=5\nR:R2 b a R=4\nR:R3 a gnd R=2");
        let f = assemble(&forward, StampPolicy::Full).unwrap();
        let r = assemble(&reverse, StampPolicy::Full).unwrap();
        // Same nodes, swapped indices.
        assert_abs_diff_eq!(f.get(0, 0), r.get(1, 1), epsilon = 1e-15);
        assert_abs_diff_eq!(f.get(1, 1), r.get(0, 0), epsilon = 1e-15);
        assert_abs_diff_eq!(f.get(0, 1), r.get(1, 0), epsilon = 1e-15);
    }

    #[test]
    fn test_grounded_source_stamps() {
        let c = circuit("R:R1 a gnd R=1\nR:R2 b gnd R=1\nVsrc:V1 a gnd U=3\nVsrc:V2 gnd b V=7");
        let s = assemble(&c, StampPolicy::Full).unwrap();
        assert_eq!(s.size, 4);
        // V1: b is ground
        assert_eq!(s.get(2, 0), 1.0);
        assert_eq!(s.get(0, 2), 1.0);
        assert_eq!(s.z[2], 3.0);
        // V2: a is ground
        assert_eq!(s.get(3, 1), -1.0);
        assert_eq!(s.get(1, 3), -1.0);
        assert_eq!(s.z[3], -7.0);
        assert_eq!(s.label(3), "I(V2)");
    }

    #[test]
    fn test_floating_source_stamps() {
        let c = circuit("R:R1 a gnd R=1\nR:R2 b gnd R=1\nVsrc:V1 a b U=2");
        let s = assemble(&c, StampPolicy::Full).unwrap();
        assert_eq!(s.get(2, 0), -1.0);
        assert_eq!(s.get(2, 1), 1.0);
        assert_eq!(s.get(0, 2), -1.0);
        assert_eq!(s.get(1, 2), 1.0);
        assert_eq!(s.z[2], 2.0);
    }

    #[test]
    fn test_rejects_non_positive_resistance() {
        for value in ["0", "-5"] {
            let c = circuit(&format!("R:R1 a gnd R=1\nR:Rbad a gnd R={value}"));
            let err = assemble(&c, StampPolicy::Full).unwrap_err();
            match err {
                NodalError::NonPositiveResistance { name, line, .. } => {
                    assert_eq!(name, "Rbad");
                    assert_eq!(line, 2);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_rejects_shorted_source() {
        let c = circuit("R:R1 a gnd R=1\nVsrc:V1 gnd gnd U=1");
        assert!(matches!(
            assemble(&c, StampPolicy::Full),
            Err(NodalError::ShortedSource { .. })
        ));
    }

    #[test]
    fn test_reduced_pins_node_rows() {
        let c = circuit("R:R1 a gnd R=10\nR:R2 a b R=10\nVsrc:V1 b gnd U=5");
        let s = assemble(&c, StampPolicy::Reduced).unwrap();
        assert_eq!(s.size, 2);
        assert_eq!(s.row(1), &[0.0, 1.0]);
        assert_eq!(s.z[1], 5.0);
        assert_relative_eq!(s.get(0, 0), 0.2);
    }

    #[test]
    fn test_reduced_rejects_floating_source() {
        let c = circuit("R:R1 a gnd R=1\nR:R2 b gnd R=1\nVsrc:Vf a b U=2");
        match assemble(&c, StampPolicy::Reduced).unwrap_err() {
            NodalError::FloatingSource { name, line } => {
                assert_eq!(name, "Vf");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reduced_rejects_double_pin() {
        let c = circuit("R:R1 a gnd R=1\nVsrc:V1 a gnd U=1\nVsrc:V2 gnd a U=2");
        assert!(matches!(
            assemble(&c, StampPolicy::Reduced),
            Err(NodalError::ConflictingSources { .. })
        ));
    }

    #[test]
    fn test_display_dump() {
        let c = circuit("R:R1 a gnd R=10\nVsrc:V1 a gnd U=5");
        let dump = assemble(&c, StampPolicy::Full).unwrap().to_string();
        assert!(dump.starts_with("G (2x2, full policy):"));
        assert!(dump.contains("I(V1)"));
        assert!(dump.contains("5.000000"));
    }
}
