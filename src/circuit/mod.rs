//! Circuit representation after parsing.
//!
//! This module turns a parsed [`Netlist`](crate::netlist::Netlist) into a
//! [`Circuit`]: the immutable element list plus the [`NodeIndex`] that gives
//! every non-ground node its row in the MNA matrix.

mod graph;
mod index;
mod types;
mod validate;

pub use graph::Circuit;
pub use index::NodeIndex;
pub use types::*;
pub use validate::unreachable_nodes;
