//! Component wiring rules
//!
//! `classify` maps a part type onto a `ComponentCategory`; `rules` turns a
//! categorised part into the wires that connect it to the microcontroller.

pub mod classify;
pub mod rules;

pub use classify::{
    catalogue_group, classify, display_name, ClassificationRule, ComponentCategory, RULES,
};
pub use rules::wire_part;
