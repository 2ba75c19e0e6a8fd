//! Microcontroller families and pin allocation
//!
//! A diagram is built around exactly one microcontroller. Its family is
//! recognised from the Wokwi part type and decides which pin inventory the
//! allocator hands out.

pub mod allocator;
pub mod boards;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagram::Part;

pub use allocator::{PinAllocator, PinPool, PinWarning};
pub use boards::{BoardProfile, SpiPins};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McuFamily {
    ArduinoUno,
    ArduinoMega,
    ArduinoNano,
    Esp32,
}

impl McuFamily {
    pub const ALL: [McuFamily; 4] = [
        McuFamily::ArduinoUno,
        McuFamily::ArduinoMega,
        McuFamily::ArduinoNano,
        McuFamily::Esp32,
    ];

    /// Recognise a microcontroller from its part type (case-insensitive).
    ///
    /// The more specific names are checked first: an "arduino-mega" is a
    /// Mega, not a generic Arduino.
    pub fn detect(part_type: &str) -> Option<Self> {
        let t = part_type.to_lowercase();
        if t.contains("esp32") {
            Some(McuFamily::Esp32)
        } else if t.contains("mega") {
            Some(McuFamily::ArduinoMega)
        } else if t.contains("nano") {
            Some(McuFamily::ArduinoNano)
        } else if t.contains("arduino") || t.contains("uno") {
            Some(McuFamily::ArduinoUno)
        } else {
            None
        }
    }

    pub fn profile(&self) -> &'static BoardProfile {
        match self {
            McuFamily::ArduinoUno => &boards::ARDUINO_UNO,
            McuFamily::ArduinoMega => &boards::ARDUINO_MEGA,
            McuFamily::ArduinoNano => &boards::ARDUINO_NANO,
            McuFamily::Esp32 => &boards::ESP32_DEVKIT,
        }
    }

    /// Fresh allocator for one synthesis run.
    pub fn allocator(&self) -> PinAllocator {
        PinAllocator::new(self.profile())
    }
}

impl fmt::Display for McuFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

/// First part in `parts` that is a recognised microcontroller.
pub fn find_mcu(parts: &[Part]) -> Option<(&Part, McuFamily)> {
    parts
        .iter()
        .find_map(|p| McuFamily::detect(&p.part_type).map(|family| (p, family)))
}
