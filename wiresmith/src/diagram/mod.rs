//! Diagram document model
//!
//! - `schema`: the serializable `diagram.json` types
//! - `netlist`: a petgraph connectivity view over a diagram
//! - `visibility`: wire colour statistics and route simplification

pub mod netlist;
pub mod schema;
pub mod visibility;

pub use netlist::Netlist;
pub use schema::*;
pub use visibility::{simplify_for_visibility, summarize, WireSummary};
