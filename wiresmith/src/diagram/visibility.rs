//! Wire colour statistics and a readability pass for crowded diagrams.

use serde::Serialize;
use std::collections::BTreeMap;

use super::schema::{path, Diagram};

/// Counts of wires per colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WireSummary {
    pub total: usize,
    pub colors: BTreeMap<String, usize>,
}

pub fn summarize(diagram: &Diagram) -> WireSummary {
    let mut colors = BTreeMap::new();
    for conn in &diagram.connections {
        *colors.entry(conn.color.clone()).or_insert(0) += 1;
    }
    WireSummary {
        total: diagram.connections.len(),
        colors,
    }
}

/// Colours that render poorly on the simulator canvas and what to use instead.
fn visible_color(color: &str) -> &str {
    match color {
        "gold" => "yellow",
        "cyan" => "blue",
        // Blue is taken by the cyan remap above.
        "blue" => "green",
        other => other,
    }
}

/// Rewrite wire colours and routes so every wire is easy to pick out.
///
/// Multi-step routes collapse to one fixed dog-leg, single-step routes to a
/// direct junction. Parts and endpoints are untouched.
pub fn simplify_for_visibility(diagram: &Diagram) -> Diagram {
    let mut out = diagram.clone();
    for conn in &mut out.connections {
        conn.color = visible_color(&conn.color).to_string();
        conn.path = if conn.path.len() > 1 {
            path(&["h20", "v20", "*", "v-10", "h-10"])
        } else {
            path(&["*"])
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::schema::{Connection, PathStep, PinRef};

    fn wire(color: &str, steps: &[&str]) -> Connection {
        Connection::new(PinRef::new("a", "1"), PinRef::new("b", "2"), color, path(steps))
    }

    #[test]
    fn test_summarize_counts_colors() {
        let mut d = Diagram::default();
        d.connections = vec![
            wire("black", &["v1"]),
            wire("black", &["v1"]),
            wire("gold", &["v1"]),
        ];
        let summary = summarize(&d);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.colors.get("black"), Some(&2));
        assert_eq!(summary.colors.get("gold"), Some(&1));
    }

    #[test]
    fn test_simplify_for_visibility() {
        let mut d = Diagram::default();
        d.connections = vec![
            wire("gold", &["v10", "*", "v-5"]),
            wire("cyan", &["v10"]),
            wire("blue", &[]),
            wire("red", &["v1", "h1"]),
        ];
        let fixed = simplify_for_visibility(&d);
        let colors: Vec<_> = fixed.connections.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["yellow", "blue", "green", "red"]);
        assert_eq!(fixed.connections[0].path.len(), 5);
        assert_eq!(fixed.connections[1].path, vec![PathStep::Junction]);
        assert_eq!(fixed.connections[2].path, vec![PathStep::Junction]);
    }
}
