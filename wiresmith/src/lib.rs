//! Wiresmith - wiring synthesis for Wokwi circuit diagrams
//!
//! Give it a list of placed parts (one microcontroller plus peripherals) and
//! it allocates MCU pins, picks wire colours and routes, adds current-limiting
//! resistors where needed and emits a `diagram.json` the Wokwi simulator can
//! load.
//!
//! # Quick Start
//!
//! ```no_run
//! use wiresmith::{parse_parts, SynthesisOptions, WiresmithCore};
//!
//! let parts = parse_parts(r#"[
//!     {"type": "wokwi-arduino-uno", "id": "mcu", "top": 200, "left": 200},
//!     {"type": "wokwi-led", "id": "led1", "top": 80, "left": 350}
//! ]"#).unwrap();
//!
//! let synthesis = WiresmithCore::synthesize(&parts, &SynthesisOptions::default());
//! println!("{}", synthesis.to_json().unwrap());
//! ```
//!
//! # Features
//!
//! - **Pin allocation**: per-family pin pools for Uno, Mega, Nano and ESP32
//! - **Wiring rules**: displays, SD cards, buttons, LEDs, sensors, servos and more
//! - **Safety pass**: series resistors in front of LEDs and buzzers
//! - **Optional oracle**: a local Ollama model may rewrite the draft

pub mod core;
pub mod diagram;
pub mod layout;
pub mod mcu;
pub mod oracle;
pub mod routing;
pub mod safety;
pub mod wiring;

// Re-export main types
pub use core::{
    load_parts, parse_parts, DiagramSource, OracleConfig, Synthesis, SynthesisOptions,
    WiresmithCore, WiresmithError,
};
pub use diagram::{Connection, Diagram, Document, Netlist, Part, PathStep, PinRef};
pub use layout::{auto_place, progressive_steps};
pub use mcu::{McuFamily, PinAllocator, PinWarning};
pub use oracle::{DiagramOracle, OllamaOracle, OracleError};
pub use routing::WireRouter;
pub use safety::insert_safety_resistors;
pub use wiring::{classify, ComponentCategory};

/// Parse a parts list and synthesize it with default options (convenience wrapper).
pub fn generate_diagram(parts_json: &str) -> Result<Document, WiresmithError> {
    let parts = parse_parts(parts_json)?;
    Ok(WiresmithCore::synthesize(&parts, &SynthesisOptions::default()).document)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Connection, Diagram, Document, McuFamily, Part, PinRef, Synthesis, SynthesisOptions,
        WiresmithCore, WiresmithError,
    };
}
