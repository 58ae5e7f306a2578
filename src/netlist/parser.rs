//! Line parser for the netlist grammar.

use super::element::{Element, Resistor, VoltageSource};
use crate::error::{NodalError, Result};

/// Parse a single netlist line.
///
/// Returns `Ok(None)` for a blank line. `line_no` is only used for error
/// reporting.
pub fn parse_line(line_no: usize, text: &str) -> Result<Option<Element>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let fail = |message: &str| NodalError::parse(line_no, trimmed, message);

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(fail(&format!("expected 4 fields, found {}", tokens.len())));
    }

    let (prefix, name) = tokens[0]
        .split_once(':')
        .ok_or_else(|| fail("missing element prefix"))?;
    let name = identifier(name).ok_or_else(|| fail("invalid element name"))?;
    let node_a = identifier(tokens[1]).ok_or_else(|| fail("invalid node identifier"))?;
    let node_b = identifier(tokens[2]).ok_or_else(|| fail("invalid node identifier"))?;
    let (key, value) = tokens[3]
        .split_once('=')
        .ok_or_else(|| fail("expected <key>=<number>"))?;
    let value = number(value).ok_or_else(|| fail("invalid number"))?;

    let nodes = [node_a.to_string(), node_b.to_string()];
    match (prefix, key) {
        ("R", "R") => Ok(Some(Element::Resistor(Resistor {
            name: name.to_string(),
            nodes,
            resistance_ohms: value,
            line: line_no,
        }))),
        ("Vsrc", "U" | "V") => Ok(Some(Element::VoltageSource(VoltageSource {
            name: name.to_string(),
            nodes,
            volts: value,
            line: line_no,
        }))),
        ("R", _) => Err(fail("resistor value must be R=<number>")),
        ("Vsrc", _) => Err(fail("source value must be U=<number> or V=<number>")),
        _ => Err(fail("unknown element prefix")),
    }
}

fn identifier(s: &str) -> Option<&str> {
    let valid = !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some(s)
}

/// Decimal number; sign and magnitude are checked by the matrix builder.
fn number(s: &str) -> Option<f64> {
    let starts_ok = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+');
    if !starts_ok {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
