//! Connectivity diagnostics.

use std::collections::VecDeque;

use super::types::Placement;
use super::Circuit;
use crate::error::Result;

/// Nodes with no path to ground through any element, in index order.
///
/// Such nodes make the MNA matrix singular. The solver reports that on its
/// own; this gives a friendlier list of every affected node up front.
/// Fails with `UnknownNode` if an element names a node the index lacks.
pub fn unreachable_nodes(circuit: &Circuit) -> Result<Vec<&str>> {
    let n = circuit.num_nodes();
    let mut adjacency = vec![Vec::new(); n];
    let mut reached = vec![false; n];
    let mut queue = VecDeque::new();

    for element in &circuit.netlist.elements {
        match circuit.index.placement(element.nodes())? {
            Placement::Internal { a, b } => {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
            Placement::Grounded { node, .. } => {
                if !reached[node] {
                    reached[node] = true;
                    queue.push_back(node);
                }
            }
            Placement::Shorted => {}
        }
    }

    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }

    Ok(circuit
        .index
        .iter()
        .filter(|(i, _)| !reached[*i])
        .map(|(_, name)| name)
        .collect())
}
