//! Simple synthesis example: wire a parts list and print the diagram.

use std::path::Path;
use wiresmith::prelude::*;

fn main() -> Result<(), WiresmithError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/weather_station.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_synthesis [path/to/parts.json]");
        std::process::exit(1);
    }

    let parts = wiresmith::load_parts(path)?;
    let synthesis = WiresmithCore::synthesize(&parts, &SynthesisOptions::default());

    if let Some(error) = synthesis.document.error() {
        eprintln!("Synthesis failed: {}", error);
        std::process::exit(1);
    }

    for id in &synthesis.inserted_resistors {
        eprintln!("Added series resistor {}", id);
    }
    for warning in &synthesis.warnings {
        eprintln!("Warning: {}", warning);
    }

    println!("{}", synthesis.to_json()?);
    Ok(())
}
