//! Automatic placement and step-by-step builds.
//!
//! `auto_place` puts the microcontroller at a fixed centre and fans the
//! other parts out around it. `progressive_steps` then synthesizes the
//! circuit one part at a time, so the diagram can be inspected as it grows.

use std::collections::HashSet;

use crate::core::{Synthesis, SynthesisOptions, WiresmithCore};
use crate::diagram::Part;
use crate::mcu::McuFamily;
use crate::wiring::display_name;

pub const MCU_TOP: f64 = 200.0;
pub const MCU_LEFT: f64 = 200.0;
pub const DEFAULT_MCU_TYPE: &str = "wokwi-arduino-uno";
pub const DEFAULT_MCU_ID: &str = "mcu";

/// `(top, left)` offsets from the MCU for the first eight peripherals.
const SPACING: [(i64, i64); 8] = [
    (-120, 150),
    (120, 150),
    (-50, 250),
    (50, 250),
    (-120, -150),
    (120, -150),
    (0, 300),
    (0, -200),
];

/// Offset of the `index`-th peripheral from the MCU.
///
/// Past the fixed slots, parts go on rings around the MCU: eight per ring
/// at 45 degree steps, each ring 50 further out than the last.
pub fn slot_offset(index: usize) -> (i64, i64) {
    if let Some(&offset) = SPACING.get(index) {
        return offset;
    }
    let angle = ((index * 45) % 360) as f64;
    let radius = 200.0 + (index / 8) as f64 * 50.0;
    let rad = angle.to_radians();
    ((radius * rad.sin()) as i64, (radius * rad.cos()) as i64)
}

/// Place the MCU first at the centre and every other part around it.
///
/// When no part is a microcontroller a default Arduino Uno is added. Only
/// `top` and `left` are changed; everything else on a part is kept.
pub fn auto_place(parts: &[Part]) -> Vec<Part> {
    let mcu_index = parts
        .iter()
        .position(|p| McuFamily::detect(&p.part_type).is_some());

    let mcu = match mcu_index {
        Some(i) => parts[i].clone(),
        None => {
            let id = free_mcu_id(parts);
            tracing::info!("No microcontroller given, adding {} as {}", DEFAULT_MCU_TYPE, id);
            Part::new(DEFAULT_MCU_TYPE, id)
        }
    };

    let mut placed = Vec::with_capacity(parts.len() + 1);
    placed.push(mcu.at(MCU_TOP, MCU_LEFT));

    let others = parts
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != mcu_index)
        .map(|(_, p)| p);
    for (i, part) in others.enumerate() {
        let (dt, dl) = slot_offset(i);
        placed.push(part.clone().at(MCU_TOP + dt as f64, MCU_LEFT + dl as f64));
    }
    placed
}

/// `mcu`, or `mcu1`, `mcu2`, ... when the caller already uses that id.
fn free_mcu_id(parts: &[Part]) -> String {
    let taken: HashSet<&str> = parts.iter().map(|p| p.id.as_str()).collect();
    if !taken.contains(DEFAULT_MCU_ID) {
        return DEFAULT_MCU_ID.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", DEFAULT_MCU_ID, n))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_else(|| DEFAULT_MCU_ID.to_string())
}

/// Human-readable position of `part` relative to the MCU centre.
pub fn describe_position(part: &Part) -> String {
    let dt = (part.top - MCU_TOP) as i64;
    let dl = (part.left - MCU_LEFT) as i64;

    let vertical = match dt {
        0 => None,
        d if d < 0 => Some(format!("{}px above", -d)),
        d => Some(format!("{}px below", d)),
    };
    let horizontal = match dl {
        0 => None,
        d if d < 0 => Some(format!("{}px left", -d)),
        d => Some(format!("{}px right", d)),
    };

    match (vertical, horizontal) {
        (None, None) => "centre".to_string(),
        (Some(v), Some(h)) => format!("{} and {} of the MCU", v, h),
        (Some(one), None) | (None, Some(one)) => format!("{} of the MCU", one),
    }
}

/// Synthesize every prefix of the auto-placed part list.
///
/// Step 1 is the bare MCU; step `n` holds the MCU and the first `n - 1`
/// peripherals.
pub fn progressive_steps(parts: &[Part], options: &SynthesisOptions) -> Vec<Synthesis> {
    let placed = auto_place(parts);
    (1..=placed.len())
        .map(|n| {
            tracing::debug!("Progressive step {} of {}", n, placed.len());
            WiresmithCore::synthesize(&placed[..n], options)
        })
        .collect()
}

/// Plain-text build notes for one progressive step.
///
/// `part` is the part that step `number` added. Lists its position, the
/// wires that touch it and any series resistors placed in front of it.
pub fn step_instructions(number: usize, step: &Synthesis, part: &Part) -> String {
    let mut out = format!(
        "STEP {}: {} {} ({})\n",
        number,
        if number == 1 { "Place" } else { "Add" },
        display_name(&part.part_type),
        part.id
    );
    out.push_str(&format!("Position: {}\n", describe_position(part)));

    let Some(diagram) = step.diagram() else {
        if let Some(error) = step.document.error() {
            out.push_str(&format!("Not wired: {}\n", error));
        }
        return out;
    };

    let resistors: Vec<&str> = step
        .inserted_resistors
        .iter()
        .map(String::as_str)
        .filter(|r| diagram.connections_for(r).any(|c| c.touches(&part.id)))
        .collect();

    let wires: Vec<_> = diagram
        .connections
        .iter()
        .filter(|c| c.touches(&part.id) || resistors.iter().any(|r| c.touches(r)))
        .collect();
    if !wires.is_empty() {
        out.push_str("Connections:\n");
        for c in wires {
            out.push_str(&format!("  {} -> {} ({})\n", c.source, c.target, c.color));
        }
    }

    for r in &resistors {
        let value = diagram
            .part(r)
            .and_then(|p| p.attrs.get("value"))
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        out.push_str(&format!("Safety resistor {}: {} ohm in series\n", r, value));
    }
    out
}
