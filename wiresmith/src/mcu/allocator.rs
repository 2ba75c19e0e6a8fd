//! Per-run pin allocator.
//!
//! One `PinAllocator` is built at the start of a synthesis call and threaded
//! through every wiring rule. Digital, analog and PWM requests share a single
//! used-pin set, so a pin listed in two pools is still handed out only once.
//! Grounds are dealt round-robin and never run out. When a pool is empty
//! the board's fallback pin is returned and a warning is recorded.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::boards::{BoardProfile, SpiPins};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPool {
    Digital,
    Analog,
    Pwm,
}

impl fmt::Display for PinPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinPool::Digital => write!(f, "digital"),
            PinPool::Analog => write!(f, "analog"),
            PinPool::Pwm => write!(f, "PWM"),
        }
    }
}

/// Something the allocator had to paper over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PinWarning {
    /// The pool ran dry and `fallback` was handed out again.
    PinExhausted { pool: PinPool, fallback: String },
}

impl fmt::Display for PinWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinWarning::PinExhausted { pool, fallback } => {
                write!(f, "{} pins exhausted, reusing pin {}", pool, fallback)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PinAllocator {
    board: &'static BoardProfile,
    digital_cursor: usize,
    analog_cursor: usize,
    pwm_cursor: usize,
    ground_cursor: usize,
    used: HashSet<&'static str>,
    warnings: Vec<PinWarning>,
}

impl PinAllocator {
    pub fn new(board: &'static BoardProfile) -> Self {
        Self {
            board,
            digital_cursor: 0,
            analog_cursor: 0,
            pwm_cursor: 0,
            ground_cursor: 0,
            used: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    pub fn board(&self) -> &'static BoardProfile {
        self.board
    }

    pub fn next_digital(&mut self) -> String {
        self.take(PinPool::Digital)
    }

    pub fn next_analog(&mut self) -> String {
        self.take(PinPool::Analog)
    }

    pub fn next_pwm(&mut self) -> String {
        self.take(PinPool::Pwm)
    }

    /// Next ground pin, cycling through the board's ground set.
    pub fn ground(&mut self) -> String {
        let grounds = self.board.grounds;
        let pin = grounds[self.ground_cursor % grounds.len()];
        self.ground_cursor += 1;
        pin.to_string()
    }

    pub fn power_5v(&self) -> Option<&'static str> {
        self.board.power_5v
    }

    pub fn power_3v3(&self) -> Option<&'static str> {
        self.board.power_3v3
    }

    pub fn i2c_sda(&self) -> &'static str {
        self.board.i2c_sda
    }

    pub fn i2c_scl(&self) -> &'static str {
        self.board.i2c_scl
    }

    pub fn spi_pins(&self) -> SpiPins {
        self.board.spi
    }

    pub fn warnings(&self) -> &[PinWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<PinWarning> {
        self.warnings
    }

    fn take(&mut self, pool: PinPool) -> String {
        let (pins, cursor, fallback) = match pool {
            PinPool::Digital => (
                self.board.digital,
                &mut self.digital_cursor,
                self.board.fallback_digital,
            ),
            PinPool::Analog => (
                self.board.analog,
                &mut self.analog_cursor,
                self.board.fallback_analog,
            ),
            PinPool::Pwm => (self.board.pwm, &mut self.pwm_cursor, self.board.fallback_pwm),
        };

        while *cursor < pins.len() {
            let pin = pins[*cursor];
            *cursor += 1;
            if self.used.insert(pin) {
                return pin.to_string();
            }
        }

        tracing::warn!(
            "{} out of {} pins, falling back to {}",
            self.board.name,
            pool,
            fallback
        );
        self.warnings.push(PinWarning::PinExhausted {
            pool,
            fallback: fallback.to_string(),
        });
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcu::boards::{ARDUINO_UNO, ESP32_DEVKIT};

    #[test]
    fn test_digital_pins_in_order() {
        let mut alloc = PinAllocator::new(&ARDUINO_UNO);
        assert_eq!(alloc.next_digital(), "2");
        assert_eq!(alloc.next_digital(), "3");
        assert_eq!(alloc.next_digital(), "4");
        assert!(alloc.warnings().is_empty());
    }

    #[test]
    fn test_pwm_and_digital_never_collide() {
        let mut alloc = PinAllocator::new(&ARDUINO_UNO);
        assert_eq!(alloc.next_pwm(), "3");
        assert_eq!(alloc.next_digital(), "2");
        // "3" is already taken by the PWM request.
        assert_eq!(alloc.next_digital(), "4");

        let mut esp = PinAllocator::new(&ESP32_DEVKIT);
        let a = esp.next_digital();
        let b = esp.next_pwm();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ground_round_robin() {
        let mut alloc = PinAllocator::new(&ARDUINO_UNO);
        let got: Vec<String> = (0..7).map(|_| alloc.ground()).collect();
        assert_eq!(
            got,
            vec!["GND.1", "GND.2", "GND.3", "GND.1", "GND.2", "GND.3", "GND.1"]
        );
    }

    #[test]
    fn test_exhaustion_falls_back_and_warns() {
        let mut alloc = PinAllocator::new(&ARDUINO_UNO);
        for _ in 0..ARDUINO_UNO.analog.len() {
            alloc.next_analog();
        }
        assert_eq!(alloc.next_analog(), "A0");
        assert_eq!(alloc.next_analog(), "A0");
        assert_eq!(alloc.warnings().len(), 2);
        assert_eq!(
            alloc.warnings()[0],
            PinWarning::PinExhausted {
                pool: PinPool::Analog,
                fallback: "A0".to_string()
            }
        );
    }

    #[test]
    fn test_unique_until_exhausted() {
        let mut alloc = PinAllocator::new(&ARDUINO_UNO);
        let mut seen = HashSet::new();
        for _ in 0..ARDUINO_UNO.digital.len() {
            assert!(seen.insert(alloc.next_digital()));
        }
        assert!(alloc.warnings().is_empty());
        alloc.next_digital();
        assert_eq!(alloc.warnings().len(), 1);
    }

    #[test]
    fn test_bus_and_rail_lookups() {
        let alloc = PinAllocator::new(&ESP32_DEVKIT);
        assert_eq!(alloc.i2c_sda(), "21");
        assert_eq!(alloc.i2c_scl(), "22");
        assert_eq!(alloc.spi_pins().mosi, "23");
        assert_eq!(alloc.power_3v3(), Some("3V3"));
        assert_eq!(alloc.power_5v(), Some("5V"));
    }

    #[test]
    fn test_warning_display() {
        let w = PinWarning::PinExhausted {
            pool: PinPool::Pwm,
            fallback: "3".to_string(),
        };
        assert_eq!(w.to_string(), "PWM pins exhausted, reusing pin 3");
    }
}
