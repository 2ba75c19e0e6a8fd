//! Wire path templates
//!
//! Wokwi draws a wire literally along its list of moves, so several wires
//! between the same two parts would sit on top of each other if they all
//! took the same route. The router derives a base offset from the relative
//! position of the two parts and bends it eight slightly different ways.
//! The result is purely cosmetic.

use crate::diagram::{Part, PathStep};

/// Scale applied to the vertical distance between two parts.
const VERTICAL_SCALE: f64 = 0.3;
/// Scale applied to the horizontal distance between two parts.
const HORIZONTAL_SCALE: f64 = 0.2;
/// Largest base offset in either direction, keeps far-apart parts from
/// producing huge detours.
const MAX_OFFSET: i64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKey {
    Power,
    PowerAlt,
    Analog1,
    Analog2,
    Digital1,
    Digital2,
    DigitalAlt1,
    DigitalAlt2,
}

impl PathKey {
    pub const ALL: [PathKey; 8] = [
        PathKey::Power,
        PathKey::PowerAlt,
        PathKey::Analog1,
        PathKey::Analog2,
        PathKey::Digital1,
        PathKey::Digital2,
        PathKey::DigitalAlt1,
        PathKey::DigitalAlt2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PathKey::Power => "power",
            PathKey::PowerAlt => "power_alt",
            PathKey::Analog1 => "analog1",
            PathKey::Analog2 => "analog2",
            PathKey::Digital1 => "digital1",
            PathKey::Digital2 => "digital2",
            PathKey::DigitalAlt1 => "digital_alt1",
            PathKey::DigitalAlt2 => "digital_alt2",
        }
    }
}

/// The eight route variants between one MCU and one peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePaths {
    pub power: Vec<PathStep>,
    pub power_alt: Vec<PathStep>,
    pub analog1: Vec<PathStep>,
    pub analog2: Vec<PathStep>,
    pub digital1: Vec<PathStep>,
    pub digital2: Vec<PathStep>,
    pub digital_alt1: Vec<PathStep>,
    pub digital_alt2: Vec<PathStep>,
}

impl WirePaths {
    pub fn get(&self, key: PathKey) -> &[PathStep] {
        match key {
            PathKey::Power => &self.power,
            PathKey::PowerAlt => &self.power_alt,
            PathKey::Analog1 => &self.analog1,
            PathKey::Analog2 => &self.analog2,
            PathKey::Digital1 => &self.digital1,
            PathKey::Digital2 => &self.digital2,
            PathKey::DigitalAlt1 => &self.digital_alt1,
            PathKey::DigitalAlt2 => &self.digital_alt2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WireRouter;

impl WireRouter {
    pub fn new() -> Self {
        Self
    }

    /// Base (vertical, horizontal) offset from `mcu` to `part`.
    pub fn offsets(&self, mcu: &Part, part: &Part) -> (i64, i64) {
        let v = ((part.top - mcu.top) * VERTICAL_SCALE) as i64;
        let h = ((part.left - mcu.left) * HORIZONTAL_SCALE) as i64;
        (
            v.clamp(-MAX_OFFSET, MAX_OFFSET),
            h.clamp(-MAX_OFFSET, MAX_OFFSET),
        )
    }

    pub fn route(&self, mcu: &Part, part: &Part) -> WirePaths {
        let (v, h) = self.offsets(mcu, part);
        use PathStep::{Horizontal as H, Junction as J, Vertical as V};

        WirePaths {
            power: vec![V(v), J, V(fdiv(-v, 2))],
            power_alt: vec![V(v - 10), J, V(fdiv(-v, 2) + 5)],
            analog1: vec![V(v - 20), H(fdiv(h, 2)), J, V(fdiv(-v, 3))],
            analog2: vec![V(v - 25), H(fdiv(h, 3)), J, V(fdiv(-v, 4))],
            digital1: vec![V(v - 30), H(fdiv(h, 4)), J, H(fdiv(-h, 8)), V(fdiv(-v, 5))],
            digital2: vec![V(v - 35), H(fdiv(h, 5)), J, H(fdiv(-h, 10)), V(fdiv(-v, 6))],
            digital_alt1: vec![H(fdiv(h, 2)), V(v - 40), J, V(fdiv(-v, 7))],
            digital_alt2: vec![H(fdiv(h, 3)), V(v - 45), J, H(fdiv(-h, 6)), V(fdiv(-v, 8))],
        }
    }
}

/// Floor division; positive divisors only.
fn fdiv(n: i64, d: i64) -> i64 {
    n.div_euclid(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::schema::path;

    #[test]
    fn test_offsets_scale_and_truncate() {
        let router = WireRouter::new();
        let mcu = Part::new("wokwi-arduino-uno", "mcu").at(200.0, 200.0);
        let led = Part::new("wokwi-led", "led1").at(80.0, 350.0);
        // (80-200)*0.3 = -36, (350-200)*0.2 = 30
        assert_eq!(router.offsets(&mcu, &led), (-36, 30));
    }

    #[test]
    fn test_offsets_clamped() {
        let router = WireRouter::new();
        let mcu = Part::new("wokwi-arduino-uno", "mcu");
        let far = Part::new("wokwi-led", "led1").at(10_000.0, -10_000.0);
        assert_eq!(router.offsets(&mcu, &far), (150, -150));
    }

    #[test]
    fn test_route_templates() {
        let router = WireRouter::new();
        let mcu = Part::new("wokwi-arduino-uno", "mcu").at(200.0, 200.0);
        let led = Part::new("wokwi-led", "led1").at(80.0, 350.0);
        let paths = router.route(&mcu, &led);

        assert_eq!(paths.power, path(&["v-36", "*", "v18"]));
        assert_eq!(paths.power_alt, path(&["v-46", "*", "v23"]));
        assert_eq!(paths.analog1, path(&["v-56", "h15", "*", "v12"]));
        assert_eq!(paths.digital1, path(&["v-66", "h7", "*", "h-4", "v7"]));
    }

    #[test]
    fn test_floor_division_rounds_down() {
        assert_eq!(fdiv(-7, 2), -4);
        assert_eq!(fdiv(7, 2), 3);
        assert_eq!(fdiv(-30, 8), -4);
    }

    #[test]
    fn test_variants_are_distinct() {
        let router = WireRouter::new();
        let mcu = Part::new("wokwi-arduino-uno", "mcu").at(0.0, 0.0);
        let part = Part::new("wokwi-led", "led1").at(300.0, 300.0);
        let paths = router.route(&mcu, &part);
        for (i, a) in PathKey::ALL.iter().enumerate() {
            for b in &PathKey::ALL[i + 1..] {
                assert_ne!(paths.get(*a), paths.get(*b), "{} == {}", a.name(), b.name());
            }
        }
    }
}
