//! Component classification
//!
//! Part types are free-form catalogue keys ("wokwi-led", "board-ssd1306"),
//! so the wiring category is picked by keyword. The rules are an ordered
//! table: the first row whose keywords match (and whose exclusions don't)
//! wins, and anything left over is `Unknown`. Order matters, e.g. "oled"
//! must be tested before "led".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mcu::McuFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    OledDisplay,
    TftDisplay,
    SdCard,
    PushButton,
    Buzzer,
    Led,
    LightSensor,
    Resistor,
    TemperatureSensor,
    Servo,
    Ultrasonic,
    Potentiometer,
    Unknown,
}

impl ComponentCategory {
    /// Coarse catalogue group, as shown to users.
    pub fn group(&self) -> &'static str {
        match self {
            ComponentCategory::OledDisplay | ComponentCategory::TftDisplay => "Display",
            ComponentCategory::PushButton | ComponentCategory::Potentiometer => "Input",
            ComponentCategory::Buzzer => "Audio Output",
            ComponentCategory::Led => "Output",
            ComponentCategory::LightSensor
            | ComponentCategory::TemperatureSensor
            | ComponentCategory::Ultrasonic => "Sensor",
            ComponentCategory::Resistor => "Passive Component",
            ComponentCategory::Servo => "Actuator",
            ComponentCategory::SdCard | ComponentCategory::Unknown => "Other",
        }
    }

    /// Whether a series resistor is spliced in front of this part.
    pub fn needs_series_resistor(&self) -> bool {
        matches!(self, ComponentCategory::Led | ComponentCategory::Buzzer)
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentCategory::OledDisplay => "I2C OLED display",
            ComponentCategory::TftDisplay => "SPI TFT display",
            ComponentCategory::SdCard => "SD card",
            ComponentCategory::PushButton => "push button",
            ComponentCategory::Buzzer => "buzzer",
            ComponentCategory::Led => "LED",
            ComponentCategory::LightSensor => "light sensor",
            ComponentCategory::Resistor => "resistor",
            ComponentCategory::TemperatureSensor => "temperature/humidity sensor",
            ComponentCategory::Servo => "servo",
            ComponentCategory::Ultrasonic => "ultrasonic sensor",
            ComponentCategory::Potentiometer => "potentiometer",
            ComponentCategory::Unknown => "generic component",
        };
        write!(f, "{}", s)
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: ComponentCategory,
    pub keywords: &'static [&'static str],
    pub excludes: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, lowered_type: &str) -> bool {
        self.keywords.iter().any(|k| lowered_type.contains(k))
            && !self.excludes.iter().any(|x| lowered_type.contains(x))
    }
}

pub const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: ComponentCategory::OledDisplay,
        keywords: &["ssd1306", "oled"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::TftDisplay,
        keywords: &["ili9341", "tft"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::SdCard,
        keywords: &["microsd", "sd-card", "sdcard", "sd_card"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::PushButton,
        keywords: &["pushbutton", "button"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Buzzer,
        keywords: &["buzzer", "piezo"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Led,
        keywords: &["led"],
        // Addressable rings and matrices need a data line, not a series resistor.
        excludes: &["led-ring", "led-matrix"],
    },
    ClassificationRule {
        category: ComponentCategory::LightSensor,
        keywords: &["photoresistor", "ldr"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Resistor,
        keywords: &["resistor"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::TemperatureSensor,
        keywords: &["dht", "temperature", "humidity"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Servo,
        keywords: &["servo"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Ultrasonic,
        keywords: &["ultrasonic", "hc-sr04"],
        excludes: &[],
    },
    ClassificationRule {
        category: ComponentCategory::Potentiometer,
        keywords: &["potentiometer", "slide-pot"],
        excludes: &[],
    },
];

pub fn classify(part_type: &str) -> ComponentCategory {
    let lowered = part_type.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(ComponentCategory::Unknown)
}

/// Catalogue group for any part type, microcontrollers included.
pub fn catalogue_group(part_type: &str) -> &'static str {
    if McuFamily::detect(part_type).is_some() {
        return "Microcontroller";
    }
    classify(part_type).group()
}

/// Human-readable name for a catalogue key: "wokwi-microsd-card" -> "Microsd Card".
pub fn display_name(part_type: &str) -> String {
    let stripped = part_type
        .strip_prefix("wokwi-")
        .or_else(|| part_type.strip_prefix("board-"))
        .unwrap_or(part_type);
    stripped
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
