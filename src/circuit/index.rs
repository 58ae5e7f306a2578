//! Dense indexing of non-ground nodes.

use indexmap::IndexSet;

use super::types::{is_ground, Placement, Terminal};
use crate::error::{NodalError, Result};
use crate::netlist::Element;

/// Bijection between non-ground node identifiers and `0..n`.
///
/// Indices follow first appearance in the element list (`node_a` before
/// `node_b`), so identical netlists always produce identical indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    nodes: IndexSet<String>,
}

impl NodeIndex {
    /// Index every non-ground node referenced by `elements`.
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        let mut nodes = IndexSet::new();
        for element in elements {
            for node in element.nodes() {
                if !is_ground(node) && !nodes.contains(node.as_str()) {
                    nodes.insert(node.clone());
                }
            }
        }
        Self { nodes }
    }

    /// Number of indexed nodes (`n`).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Matrix index of a node. `None` for ground and unknown identifiers.
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.nodes.get_index_of(node)
    }

    /// Identifier at a matrix index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.nodes.get_index(index).map(String::as_str)
    }

    /// `(index, identifier)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }

    /// Resolve a terminal pair to its [`Placement`].
    pub fn placement(&self, nodes: &[String; 2]) -> Result<Placement> {
        let resolve = |node: &String| -> Result<Option<usize>> {
            if is_ground(node) {
                return Ok(None);
            }
            self.index_of(node)
                .map(Some)
                .ok_or_else(|| NodalError::UnknownNode { node: node.clone() })
        };

        let placement = match (resolve(&nodes[0])?, resolve(&nodes[1])?) {
            (Some(a), Some(b)) => Placement::Internal { a, b },
            (None, Some(node)) => Placement::Grounded {
                node,
                ground: Terminal::A,
            },
            (Some(node), None) => Placement::Grounded {
                node,
                ground: Terminal::B,
            },
            (None, None) => Placement::Shorted,
        };
        Ok(placement)
    }
}
