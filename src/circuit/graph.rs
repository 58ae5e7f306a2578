//! Parsed circuit ready for matrix assembly.

use super::index::NodeIndex;
use crate::netlist::{Netlist, Resistor, VoltageSource};

/// A netlist together with its node index.
///
/// Both halves are fixed once built; every solve request assembles a fresh
/// matrix from them.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Elements in netlist order
    pub netlist: Netlist,
    /// Matrix index of every non-ground node
    pub index: NodeIndex,
}

impl Circuit {
    /// Build a circuit from a parsed netlist.
    pub fn from_netlist(netlist: Netlist) -> Self {
        let index = NodeIndex::from_elements(&netlist.elements);
        log::debug!(
            "indexed {} non-ground nodes from {} elements",
            index.len(),
            netlist.len()
        );
        Self { netlist, index }
    }

    /// Number of non-ground nodes (`n`).
    pub fn num_nodes(&self) -> usize {
        self.index.len()
    }

    /// Number of voltage sources (`m`).
    pub fn num_sources(&self) -> usize {
        self.netlist.voltage_sources().count()
    }

    pub fn resistors(&self) -> impl Iterator<Item = &Resistor> {
        self.netlist.resistors()
    }

    pub fn voltage_sources(&self) -> impl Iterator<Item = &VoltageSource> {
        self.netlist.voltage_sources()
    }
}
