//! Core types for circuit representation.

/// Identifier of the reference node.
pub const GROUND: &str = "gnd";

/// Check whether a node identifier names the reference node.
pub fn is_ground(node: &str) -> bool {
    node == GROUND
}

/// Terminal of a two-terminal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// First node on the netlist line
    A,
    /// Second node on the netlist line
    B,
}

/// Where a two-terminal element sits relative to ground, with each
/// non-ground terminal resolved to its matrix index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Both terminals are non-ground nodes.
    Internal { a: usize, b: usize },
    /// One terminal is ground; `ground` says which one.
    Grounded { node: usize, ground: Terminal },
    /// Both terminals are ground.
    Shorted,
}
