//! Connectivity view of a diagram
//!
//! Parts become graph nodes and every wire becomes an undirected edge
//! carrying its pin names. Used to check that every part ended up wired and
//! to sanity-check diagrams coming back from an oracle.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::schema::Diagram;

/// Edge weight: the two pin names joined by one wire.
#[derive(Debug, Clone)]
pub struct WireEdge {
    pub source_pin: String,
    pub target_pin: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct Netlist {
    graph: UnGraph<String, WireEdge>,
    indices: HashMap<String, NodeIndex>,
    /// Wires whose endpoints name a part that is not in the diagram.
    dangling: Vec<String>,
}

impl Netlist {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut indices = HashMap::new();

        for part in &diagram.parts {
            let idx = graph.add_node(part.id.clone());
            indices.insert(part.id.clone(), idx);
        }

        let mut dangling = Vec::new();
        for conn in &diagram.connections {
            let a = indices.get(&conn.source.part_id);
            let b = indices.get(&conn.target.part_id);
            match (a, b) {
                (Some(&a), Some(&b)) => {
                    graph.add_edge(
                        a,
                        b,
                        WireEdge {
                            source_pin: conn.source.pin.clone(),
                            target_pin: conn.target.pin.clone(),
                            color: conn.color.clone(),
                        },
                    );
                }
                _ => dangling.push(format!("{} -> {}", conn.source, conn.target)),
            }
        }

        Self {
            graph,
            indices,
            dangling,
        }
    }

    pub fn part_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn wire_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Parts with no wire at all, in diagram order.
    pub fn unconnected_parts(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges(idx).next().is_none())
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    /// Ids of parts sharing at least one wire with `part_id`.
    pub fn neighbors(&self, part_id: &str) -> Vec<&str> {
        let Some(&idx) = self.indices.get(part_id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn is_connected_to(&self, a: &str, b: &str) -> bool {
        match (self.indices.get(a), self.indices.get(b)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Pin names on `part_id` that have a wire attached.
    pub fn used_pins(&self, part_id: &str) -> Vec<&str> {
        let Some(&idx) = self.indices.get(part_id) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|edge| {
                let w = edge.weight();
                // Undirected edges: work out which end belongs to this part.
                let (sa, _) = self.graph.edge_endpoints(edge.id()).unwrap_or((idx, idx));
                if sa == idx {
                    w.source_pin.as_str()
                } else {
                    w.target_pin.as_str()
                }
            })
            .collect()
    }

    pub fn dangling_wires(&self) -> &[String] {
        &self.dangling
    }
}
