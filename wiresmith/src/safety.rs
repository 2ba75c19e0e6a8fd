//! Series resistor insertion
//!
//! LEDs and piezo buzzers driven straight from a GPIO pull more current
//! than the pin should source. This pass finds those parts, adds a resistor
//! next to each and reroutes the driving wire through it:
//!
//! ```text
//! mcu:2 ──────── led1:A
//!
//! becomes
//!
//! mcu:2 ─── R1:1  R1:2 ─── led1:A
//! ```
//!
//! Parts that already have a resistor wired to them, or that were protected
//! by an earlier pass, are left alone.

use serde_json::Value;
use std::collections::HashSet;

use crate::diagram::{path, Connection, Part, PinRef};
use crate::wiring::{classify, ComponentCategory};

pub const RESISTOR_TYPE: &str = "wokwi-resistor";
pub const LED_RESISTOR_OHMS: u32 = 220;
pub const BUZZER_RESISTOR_OHMS: u32 = 100;
/// Where a new resistor sits relative to the part it protects.
pub const RESISTOR_OFFSET_TOP: f64 = 30.0;
pub const RESISTOR_OFFSET_LEFT: f64 = -50.0;

/// The pin that needs current limiting and the resistor value for it.
fn protection_for(category: ComponentCategory) -> Option<(&'static str, u32)> {
    match category {
        ComponentCategory::Led => Some(("A", LED_RESISTOR_OHMS)),
        ComponentCategory::Buzzer => Some(("2", BUZZER_RESISTOR_OHMS)),
        _ => None,
    }
}

/// Result of one insertion pass.
#[derive(Debug, Clone, Default)]
pub struct Insertion {
    pub parts: Vec<Part>,
    pub connections: Vec<Connection>,
    /// Ids of the resistors that were added.
    pub added: Vec<String>,
}

pub fn insert_safety_resistors(parts: Vec<Part>, connections: Vec<Connection>) -> Insertion {
    let resistor_ids: HashSet<String> = parts
        .iter()
        .filter(|p| classify(&p.part_type) == ComponentCategory::Resistor)
        .map(|p| p.id.clone())
        .collect();
    let mut taken_ids: HashSet<String> = parts.iter().map(|p| p.id.clone()).collect();

    let mut parts = parts;
    let mut connections = connections;
    let mut new_parts = Vec::new();
    let mut added = Vec::new();
    let mut next_index = 1usize;

    for part in parts.iter_mut() {
        let Some((pin_name, ohms)) = protection_for(classify(&part.part_type)) else {
            continue;
        };
        if part.protected {
            continue;
        }
        if has_resistor(&connections, &part.id, &resistor_ids) {
            tracing::debug!("{} already has a series resistor", part.id);
            part.protected = true;
            continue;
        }

        let protected_pin = part.pin(pin_name);
        let Some(slot) = connections
            .iter()
            .position(|c| c.other_end(&protected_pin).is_some())
        else {
            tracing::debug!("{} has no driving wire on {}", part.id, pin_name);
            continue;
        };

        let resistor_id = next_resistor_id(&mut taken_ids, &mut next_index);
        let resistor = Part::new(RESISTOR_TYPE, resistor_id.clone())
            .at(part.top + RESISTOR_OFFSET_TOP, part.left + RESISTOR_OFFSET_LEFT)
            .with_attr("value", Value::String(ohms.to_string()));

        let original = connections.remove(slot);
        let driver = original
            .other_end(&protected_pin)
            .cloned()
            .unwrap_or_else(|| original.source.clone());
        let into_resistor = Connection::new(
            driver,
            PinRef::new(&resistor_id, "1"),
            original.color.clone(),
            original.path.clone(),
        );
        let into_part = Connection::new(
            PinRef::new(&resistor_id, "2"),
            protected_pin,
            original.color,
            path(&["h10", "*", "h-5"]),
        );
        connections.insert(slot, into_part);
        connections.insert(slot, into_resistor);

        tracing::info!("added {} ({} ohm) in front of {}", resistor_id, ohms, part.id);
        part.protected = true;
        added.push(resistor_id);
        new_parts.push(resistor);
    }

    parts.extend(new_parts);
    Insertion {
        parts,
        connections,
        added,
    }
}

fn has_resistor(connections: &[Connection], part_id: &str, resistor_ids: &HashSet<String>) -> bool {
    connections.iter().any(|c| {
        (c.source.part_id == part_id && resistor_ids.contains(&c.target.part_id))
            || (c.target.part_id == part_id && resistor_ids.contains(&c.source.part_id))
    })
}

fn next_resistor_id(taken: &mut HashSet<String>, next_index: &mut usize) -> String {
    loop {
        let candidate = format!("R{}", next_index);
        *next_index += 1;
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::PathStep;

    fn led_circuit() -> (Vec<Part>, Vec<Connection>) {
        let parts = vec![
            Part::new("wokwi-arduino-uno", "mcu").at(200.0, 200.0),
            Part::new("wokwi-led", "led1").at(80.0, 350.0),
        ];
        let connections = vec![
            Connection::new(
                PinRef::new("mcu", "2"),
                PinRef::new("led1", "A"),
                "red",
                path(&["v-47", "h3", "*"]),
            ),
            Connection::new(
                PinRef::new("mcu", "GND.1"),
                PinRef::new("led1", "C"),
                "black",
                path(&["v-12", "*", "v4"]),
            ),
        ];
        (parts, connections)
    }

    #[test]
    fn test_led_gets_220_ohm_resistor() {
        let (parts, connections) = led_circuit();
        let out = insert_safety_resistors(parts, connections);

        assert_eq!(out.added, vec!["R1"]);
        assert_eq!(out.parts.len(), 3);
        let r1 = &out.parts[2];
        assert_eq!(r1.part_type, RESISTOR_TYPE);
        assert_eq!(r1.top, 110.0);
        assert_eq!(r1.left, 300.0);
        assert_eq!(r1.attrs.get("value"), Some(&Value::String("220".into())));
        assert!(out.parts[1].protected);

        let wires: Vec<_> = out
            .connections
            .iter()
            .map(|c| (c.source.to_string(), c.target.to_string(), c.color.as_str()))
            .collect();
        assert_eq!(
            wires,
            vec![
                ("mcu:2".to_string(), "R1:1".to_string(), "red"),
                ("R1:2".to_string(), "led1:A".to_string(), "red"),
                ("mcu:GND.1".to_string(), "led1:C".to_string(), "black"),
            ]
        );
        assert_eq!(out.connections[0].path, path(&["v-47", "h3", "*"]));
        assert_eq!(
            out.connections[1].path,
            vec![PathStep::Horizontal(10), PathStep::Junction, PathStep::Horizontal(-5)]
        );
    }

    #[test]
    fn test_buzzer_gets_100_ohm_on_signal_pin() {
        let parts = vec![
            Part::new("wokwi-arduino-uno", "mcu"),
            Part::new("wokwi-buzzer", "bz1"),
        ];
        let connections = vec![
            Connection::new(PinRef::new("mcu", "GND.1"), PinRef::new("bz1", "1"), "black", vec![]),
            Connection::new(PinRef::new("mcu", "2"), PinRef::new("bz1", "2"), "purple", vec![]),
        ];
        let out = insert_safety_resistors(parts, connections);
        assert_eq!(out.added, vec!["R1"]);
        assert_eq!(out.parts[2].attrs.get("value"), Some(&Value::String("100".into())));
        assert_eq!(out.connections[0].target.to_string(), "bz1:1");
        assert_eq!(out.connections[1].target.to_string(), "R1:1");
        assert_eq!(out.connections[2].target.to_string(), "bz1:2");
    }

    #[test]
    fn test_second_pass_is_noop() {
        let (parts, connections) = led_circuit();
        let first = insert_safety_resistors(parts, connections);
        let second = insert_safety_resistors(first.parts.clone(), first.connections.clone());
        assert!(second.added.is_empty());
        assert_eq!(second.parts.len(), first.parts.len());
        assert_eq!(second.connections, first.connections);
    }

    #[test]
    fn test_existing_resistor_detected_without_marker() {
        // Same shape as a diagram loaded from disk, where the marker is not serialized.
        let (parts, connections) = led_circuit();
        let first = insert_safety_resistors(parts, connections);
        let reloaded: Vec<Part> = first
            .parts
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.protected = false;
                p
            })
            .collect();
        let second = insert_safety_resistors(reloaded, first.connections);
        assert!(second.added.is_empty());
        assert!(second.parts[1].protected);
    }

    #[test]
    fn test_resistor_ids_skip_taken() {
        let parts = vec![
            Part::new("wokwi-arduino-uno", "mcu"),
            Part::new("wokwi-led", "R1"),
            Part::new("wokwi-led", "led2"),
        ];
        let connections = vec![
            Connection::new(PinRef::new("mcu", "2"), PinRef::new("R1", "A"), "red", vec![]),
            Connection::new(PinRef::new("mcu", "3"), PinRef::new("led2", "A"), "red", vec![]),
        ];
        let out = insert_safety_resistors(parts, connections);
        assert_eq!(out.added, vec!["R2", "R3"]);
    }

    #[test]
    fn test_unwired_led_left_alone() {
        let parts = vec![
            Part::new("wokwi-arduino-uno", "mcu"),
            Part::new("wokwi-led", "led1"),
        ];
        let out = insert_safety_resistors(parts, vec![]);
        assert!(out.added.is_empty());
        assert_eq!(out.parts.len(), 2);
        assert!(!out.parts[1].protected);
    }
}
