//! Netlist parser for resistor / voltage-source descriptions.
//!
//! The netlist is line-oriented: one element per line, whitespace-delimited,
//! no header, no comments. Blank lines are skipped.
//!
//! # Grammar
//!
//! ```text
//! netlist    = { line }
//! line       = resistor | source | blank
//! resistor   = "R:" name node node "R=" number
//! source     = "Vsrc:" name node node ("U=" | "V=") number
//! name, node = word_char { word_char }
//! word_char  = letter | digit | '_'
//! ```
//!
//! The node identifier `gnd` is the reference node. Parsing aborts on the
//! first malformed line; no partial netlist is returned.
//!
//! # Example
//!
//! ```text
//! R:R1 a gnd R=10
//! R:R2 a b R=10
//! Vsrc:V1 b gnd U=5
//! ```

mod element;
mod parser;

pub use element::{Element, Netlist, Resistor, VoltageSource};
pub use parser::parse_line;

use crate::error::{NodalError, Result};

/// Parse a whole netlist from a string.
pub fn parse(input: &str) -> Result<Netlist> {
    parse_lines(input.lines())
}

/// Parse a netlist from an iterator of lines.
///
/// Line numbers in errors are 1-based positions in the iterator.
pub fn parse_lines<I, S>(lines: I) -> Result<Netlist>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut elements = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        if let Some(element) = parse_line(idx + 1, line.as_ref())? {
            elements.push(element);
        }
    }
    log::debug!("parsed {} elements", elements.len());
    Ok(Netlist { elements })
}

/// Parse a netlist file.
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| NodalError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
