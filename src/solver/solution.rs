//! Mapping solved unknowns back to node names.

use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;

use super::mna::MnaSystem;
use crate::circuit::{is_ground, NodeIndex};
use crate::error::{NodalError, Result};

/// Node voltages (and, when available, source currents) of a solved circuit.
///
/// Voltages are keyed by node identifier in [`NodeIndex`] order. Ground is
/// never a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    voltages: IndexMap<String, f64>,
    source_currents: IndexMap<String, f64>,
}

impl Solution {
    /// Build from a solution vector of a system assembled over `index`.
    ///
    /// Entries past `index.len()` are auxiliary source currents; `sources`
    /// names them in the same order.
    pub fn from_vector(x: &[f64], index: &NodeIndex, sources: &[&str]) -> Result<Self> {
        let expected = index.len() + sources.len();
        if x.len() < expected {
            return Err(NodalError::DimensionMismatch {
                what: "solution vector",
                expected,
                found: x.len(),
            });
        }
        let voltages = index
            .iter()
            .map(|(i, name)| (name.to_string(), x[i]))
            .collect();
        let source_currents = sources
            .iter()
            .zip(x.iter().skip(index.len()))
            .map(|(name, &current)| (name.to_string(), current))
            .collect();
        Ok(Self {
            voltages,
            source_currents,
        })
    }

    /// Build from a solved [`MnaSystem`].
    pub(crate) fn from_system(system: &MnaSystem, x: &[f64], index: &NodeIndex) -> Result<Self> {
        let sources: Vec<&str> = system.sources().iter().map(String::as_str).collect();
        Self::from_vector(x, index, &sources)
    }

    /// Voltage at a node. Ground is always 0.
    pub fn voltage(&self, node: &str) -> Option<f64> {
        if is_ground(node) {
            Some(0.0)
        } else {
            self.voltages.get(node).copied()
        }
    }

    /// Auxiliary current of a voltage source, if the policy solved for it.
    pub fn source_current(&self, name: &str) -> Option<f64> {
        self.source_currents.get(name).copied()
    }

    /// `(node, voltage)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.voltages.iter().map(|(n, &v)| (n.as_str(), v))
    }

    /// Number of non-ground nodes.
    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }

    /// Write `<node> <voltage>` lines.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (node, voltage) in self.iter() {
            out.write_all(output_line(node, voltage).as_bytes())?;
        }
        Ok(())
    }

    /// The output file content as a string.
    pub fn to_output_string(&self) -> String {
        self.iter()
            .map(|(node, voltage)| output_line(node, voltage))
            .collect()
    }

    /// Write the output file in one go.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_output_string()).map_err(|e| NodalError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

fn output_line(node: &str, voltage: f64) -> String {
    format!("{} {}\n", node, format_voltage(voltage))
}

/// Shortest round-trip decimal; integral values keep a trailing `.0`.
pub fn format_voltage(v: f64) -> String {
    if v == 0.0 {
        return "0.0".to_string();
    }
    let mut s = v.to_string();
    if v.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;

    fn index_for(text: &str) -> NodeIndex {
        NodeIndex::from_elements(&netlist::parse(text).unwrap().elements)
    }

    #[test]
    fn test_format_voltage() {
        assert_eq!(format_voltage(5.0), "5.0");
        assert_eq!(format_voltage(2.5), "2.5");
        assert_eq!(format_voltage(-0.0), "0.0");
        assert_eq!(format_voltage(-3.0), "-3.0");
        assert_eq!(format_voltage(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_from_vector() {
        let index = index_for("R:R1 a gnd R=1\nVsrc:V1 gnd b U=2\nR:R2 a b R=1");
        let solution = Solution::from_vector(&[1.0, 2.0, -0.5], &index, &["V1"]).unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.voltage("a"), Some(1.0));
        assert_eq!(solution.voltage("gnd"), Some(0.0));
        assert_eq!(solution.voltage("zz"), None);
        assert_eq!(solution.source_current("V1"), Some(-0.5));
        assert!(solution.iter().all(|(n, _)| n != "gnd"));
    }

    #[test]
    fn test_output_follows_index_order() {
        let index = index_for("R:R1 z gnd R=1\nR:R2 a z R=1");
        let solution = Solution::from_vector(&[1.0, 0.25], &index, &[]).unwrap();
        assert_eq!(solution.to_output_string(), "z 1.0\na 0.25\n");

        let mut buf = Vec::new();
        solution.write_to(&mut buf).unwrap();
        assert_eq!(buf, solution.to_output_string().into_bytes());
    }

    #[test]
    fn test_short_vector_rejected() {
        let index = index_for("R:R1 a gnd R=1\nVsrc:V1 gnd b U=2\nR:R2 a b R=1");
        let err = Solution::from_vector(&[1.0, 2.0], &index, &["V1"]).unwrap_err();
        assert!(matches!(
            err,
            NodalError::DimensionMismatch {
                what: "solution vector",
                expected: 3,
                found: 2,
            }
        ));
    }
}
