//! Parsed netlist elements.

/// A resistor between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub nodes: [String; 2],
    pub resistance_ohms: f64,
    /// Source line number for error reporting
    pub line: usize,
}

impl Resistor {
    /// Conductance in siemens.
    ///
    /// Only meaningful for positive resistance; the matrix builder rejects
    /// anything else before calling this.
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance_ohms
    }
}

/// An ideal independent voltage source.
///
/// With one terminal on ground the other terminal is held at `volts`.
/// With both terminals off ground, `V(node_b) - V(node_a) = volts`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [String; 2],
    pub volts: f64,
    /// Source line number for error reporting
    pub line: usize,
}

/// One parsed netlist line.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Resistor(Resistor),
    VoltageSource(VoltageSource),
}

impl Element {
    /// The element's name (the part after `R:` / `Vsrc:`).
    pub fn name(&self) -> &str {
        match self {
            Element::Resistor(r) => &r.name,
            Element::VoltageSource(v) => &v.name,
        }
    }

    /// Terminal node identifiers, `[node_a, node_b]`.
    pub fn nodes(&self) -> &[String; 2] {
        match self {
            Element::Resistor(r) => &r.nodes,
            Element::VoltageSource(v) => &v.nodes,
        }
    }

    /// 1-based line the element was read from.
    pub fn line(&self) -> usize {
        match self {
            Element::Resistor(r) => r.line,
            Element::VoltageSource(v) => v.line,
        }
    }
}

/// An ordered, immutable sequence of parsed elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    pub elements: Vec<Element>,
}

impl Netlist {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All resistors, in netlist order.
    pub fn resistors(&self) -> impl Iterator<Item = &Resistor> {
        self.elements.iter().filter_map(|e| match e {
            Element::Resistor(r) => Some(r),
            _ => None,
        })
    }

    /// All voltage sources, in netlist order.
    pub fn voltage_sources(&self) -> impl Iterator<Item = &VoltageSource> {
        self.elements.iter().filter_map(|e| match e {
            Element::VoltageSource(v) => Some(v),
            _ => None,
        })
    }
}
