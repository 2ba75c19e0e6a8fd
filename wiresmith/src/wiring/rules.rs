//! Per-category wiring rules
//!
//! Each rule asks the allocator for MCU pins in a fixed order and ties them
//! to the peripheral's Wokwi pin names. Wires always run MCU -> peripheral.
//! Colours follow the usual convention (red power, black ground) and every
//! wire of one part takes a different router path.

use crate::diagram::{Connection, Part, PinRef};
use crate::mcu::PinAllocator;
use crate::routing::{PathKey, WirePaths, WireRouter};

use super::classify::{classify, ComponentCategory};

pub mod colors {
    pub const POWER: &str = "red";
    pub const GROUND: &str = "black";
    pub const SDA: &str = "gold";
    pub const SCL: &str = "cyan";
    pub const MOSI: &str = "green";
    pub const MISO: &str = "orange";
    pub const SCK: &str = "gray";
    pub const CHIP_SELECT: &str = "violet";
    pub const RESET: &str = "purple";
    pub const DATA_COMMAND: &str = "#8f4814";
    pub const SD_CHIP_SELECT: &str = "blue";
    pub const BUTTON: &str = "green";
    pub const BUZZER: &str = "purple";
    pub const LED: &str = "red";
    pub const DATA: &str = "blue";
    pub const PWM: &str = "orange";
    pub const TRIGGER: &str = "blue";
    pub const ECHO: &str = "green";
    pub const ANALOG: &str = "green";
    pub const GENERIC: &str = "gray";
}

/// Which supply rail a part would rather run from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rail {
    Prefer5v,
    Prefer3v3,
}

/// Collects the wires of one peripheral.
struct PartWiring<'a> {
    mcu_id: &'a str,
    part_id: &'a str,
    paths: WirePaths,
    wires: Vec<Connection>,
}

impl<'a> PartWiring<'a> {
    fn new(mcu: &'a Part, part: &'a Part, router: &WireRouter) -> Self {
        Self {
            mcu_id: &mcu.id,
            part_id: &part.id,
            paths: router.route(mcu, part),
            wires: Vec::new(),
        }
    }

    fn wire(&mut self, mcu_pin: &str, part_pin: &str, color: &str, key: PathKey) {
        self.wires.push(Connection::new(
            PinRef::new(self.mcu_id, mcu_pin),
            PinRef::new(self.part_id, part_pin),
            color,
            self.paths.get(key).to_vec(),
        ));
    }

    fn ground(&mut self, alloc: &mut PinAllocator, part_pin: &str) {
        let pin = alloc.ground();
        self.wire(&pin, part_pin, colors::GROUND, PathKey::Power);
    }

    fn supply(&mut self, alloc: &PinAllocator, rail: Rail, part_pin: &str) {
        let pin = match rail {
            Rail::Prefer5v => alloc.power_5v().or(alloc.power_3v3()),
            Rail::Prefer3v3 => alloc.power_3v3().or(alloc.power_5v()),
        };
        match pin {
            Some(pin) => self.wire(pin, part_pin, colors::POWER, PathKey::PowerAlt),
            None => tracing::debug!("{} has no supply rail for {}", self.mcu_id, self.part_id),
        }
    }

    fn finish(self) -> Vec<Connection> {
        self.wires
    }
}

/// Wire one non-MCU part to the MCU.
///
/// Never fails: an unrecognised part gets a ground and one generic signal.
pub fn wire_part(
    part: &Part,
    mcu: &Part,
    alloc: &mut PinAllocator,
    router: &WireRouter,
) -> Vec<Connection> {
    let category = classify(&part.part_type);
    tracing::debug!("wiring {} ({}) as {}", part.id, part.part_type, category);

    let mut w = PartWiring::new(mcu, part, router);

    match category {
        ComponentCategory::OledDisplay => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer3v3, "VCC");
            w.wire(alloc.i2c_sda(), "SDA", colors::SDA, PathKey::Analog1);
            w.wire(alloc.i2c_scl(), "SCL", colors::SCL, PathKey::Analog2);
        }
        ComponentCategory::TftDisplay => {
            let spi = alloc.spi_pins();
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let cs = alloc.next_digital();
            let rst = alloc.next_digital();
            let dc = alloc.next_digital();
            w.wire(&cs, "CS", colors::CHIP_SELECT, PathKey::Digital1);
            w.wire(&rst, "RST", colors::RESET, PathKey::Digital2);
            w.wire(&dc, "D/C", colors::DATA_COMMAND, PathKey::DigitalAlt1);
            w.wire(spi.mosi, "MOSI", colors::MOSI, PathKey::Analog1);
            w.wire(spi.miso, "MISO", colors::MISO, PathKey::Analog2);
            w.wire(spi.sck, "SCK", colors::SCK, PathKey::DigitalAlt2);
        }
        ComponentCategory::SdCard => {
            let spi = alloc.spi_pins();
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let cs = alloc.next_digital();
            w.wire(&cs, "CS", colors::SD_CHIP_SELECT, PathKey::Digital1);
            // The Wokwi card names its data lines from the card's side.
            w.wire(spi.mosi, "DI", colors::MOSI, PathKey::Analog1);
            w.wire(spi.miso, "DO", colors::MISO, PathKey::Analog2);
            w.wire(spi.sck, "SCK", colors::SCK, PathKey::Digital2);
        }
        ComponentCategory::PushButton => {
            let sig = alloc.next_digital();
            w.wire(&sig, "1.l", colors::BUTTON, PathKey::Digital1);
            w.ground(alloc, "2.l");
        }
        ComponentCategory::Buzzer => {
            w.ground(alloc, "1");
            let sig = alloc.next_digital();
            w.wire(&sig, "2", colors::BUZZER, PathKey::Digital1);
        }
        ComponentCategory::Led => {
            let anode = alloc.next_digital();
            w.wire(&anode, "A", colors::LED, PathKey::Digital1);
            w.ground(alloc, "C");
        }
        ComponentCategory::Resistor => {
            // A loose resistor has no obvious place in the circuit; hang it
            // between two GPIOs so it is at least visibly connected.
            let a = alloc.next_digital();
            let b = alloc.next_digital();
            w.wire(&a, "1", "yellow", PathKey::Digital1);
            w.wire(&b, "2", "orange", PathKey::Digital2);
        }
        ComponentCategory::TemperatureSensor => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let data = alloc.next_digital();
            w.wire(&data, "SDA", colors::DATA, PathKey::Digital1);
        }
        ComponentCategory::Servo => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "V+");
            let pwm = alloc.next_pwm();
            w.wire(&pwm, "PWM", colors::PWM, PathKey::Digital1);
        }
        ComponentCategory::Ultrasonic => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let trig = alloc.next_digital();
            let echo = alloc.next_digital();
            w.wire(&trig, "TRIG", colors::TRIGGER, PathKey::Digital1);
            w.wire(&echo, "ECHO", colors::ECHO, PathKey::Digital2);
        }
        ComponentCategory::Potentiometer => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let sig = alloc.next_analog();
            w.wire(&sig, "SIG", colors::ANALOG, PathKey::Analog1);
        }
        ComponentCategory::LightSensor => {
            w.ground(alloc, "GND");
            w.supply(alloc, Rail::Prefer5v, "VCC");
            let sig = alloc.next_analog();
            w.wire(&sig, "AO", colors::ANALOG, PathKey::Analog1);
        }
        ComponentCategory::Unknown => {
            w.ground(alloc, "GND");
            let sig = alloc.next_digital();
            w.wire(&sig, "SIG", colors::GENERIC, PathKey::Digital1);
        }
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcu::McuFamily;

    fn run(family: McuFamily, mcu_type: &str, part_type: &str) -> Vec<Connection> {
        let mcu = Part::new(mcu_type, "mcu").at(200.0, 200.0);
        let part = Part::new(part_type, "p1").at(80.0, 350.0);
        let mut alloc = family.allocator();
        wire_part(&part, &mcu, &mut alloc, &WireRouter::new())
    }

    fn pairs(wires: &[Connection]) -> Vec<(String, String)> {
        wires
            .iter()
            .map(|c| (c.source.to_string(), c.target.to_string()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_oled_on_esp32() {
        let wires = run(McuFamily::Esp32, "board-esp32-devkit-c-v4", "board-ssd1306");
        assert_eq!(
            pairs(&wires),
            vec![
                pair("mcu:GND.1", "p1:GND"),
                pair("mcu:3V3", "p1:VCC"),
                pair("mcu:21", "p1:SDA"),
                pair("mcu:22", "p1:SCL"),
            ]
        );
        let colors: Vec<_> = wires.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["black", "red", "gold", "cyan"]);
    }

    #[test]
    fn test_oled_wires_take_distinct_paths() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "board-ssd1306");
        for (i, a) in wires.iter().enumerate() {
            for b in &wires[i + 1..] {
                assert_ne!(a.path, b.path);
            }
        }
    }

    #[test]
    fn test_tft_on_mega() {
        let wires = run(McuFamily::ArduinoMega, "wokwi-arduino-mega", "wokwi-ili9341");
        assert_eq!(
            pairs(&wires),
            vec![
                pair("mcu:GND.1", "p1:GND"),
                pair("mcu:5V", "p1:VCC"),
                pair("mcu:2", "p1:CS"),
                pair("mcu:3", "p1:RST"),
                pair("mcu:4", "p1:D/C"),
                pair("mcu:51", "p1:MOSI"),
                pair("mcu:50", "p1:MISO"),
                pair("mcu:52", "p1:SCK"),
            ]
        );
    }

    #[test]
    fn test_sd_card_on_uno() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "wokwi-microsd-card");
        assert_eq!(
            pairs(&wires),
            vec![
                pair("mcu:GND.1", "p1:GND"),
                pair("mcu:5V", "p1:VCC"),
                pair("mcu:2", "p1:CS"),
                pair("mcu:11", "p1:DI"),
                pair("mcu:12", "p1:DO"),
                pair("mcu:13", "p1:SCK"),
            ]
        );
    }

    #[test]
    fn test_led_anode_and_cathode() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "wokwi-led");
        assert_eq!(
            pairs(&wires),
            vec![pair("mcu:2", "p1:A"), pair("mcu:GND.1", "p1:C")]
        );
        assert_eq!(wires[0].color, "red");
        assert_eq!(wires[1].color, "black");
    }

    #[test]
    fn test_servo_gets_pwm_pin() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "wokwi-servo");
        assert_eq!(
            pairs(&wires),
            vec![
                pair("mcu:GND.1", "p1:GND"),
                pair("mcu:5V", "p1:V+"),
                pair("mcu:3", "p1:PWM"),
            ]
        );
    }

    #[test]
    fn test_potentiometer_gets_analog_pin() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "wokwi-potentiometer");
        assert_eq!(wires[2].source.pin, "A0");
        assert_eq!(wires[2].target.pin, "SIG");
    }

    #[test]
    fn test_ultrasonic_trigger_and_echo() {
        let wires = run(McuFamily::ArduinoNano, "wokwi-arduino-nano", "wokwi-hc-sr04");
        let targets: Vec<_> = wires.iter().map(|c| c.target.pin.as_str()).collect();
        assert_eq!(targets, vec!["GND", "VCC", "TRIG", "ECHO"]);
        assert_ne!(wires[2].source.pin, wires[3].source.pin);
    }

    #[test]
    fn test_standalone_resistor_uses_two_gpios() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "wokwi-resistor");
        assert_eq!(
            pairs(&wires),
            vec![pair("mcu:2", "p1:1"), pair("mcu:3", "p1:2")]
        );
    }

    #[test]
    fn test_unknown_part_gets_ground_and_signal() {
        let wires = run(McuFamily::ArduinoUno, "wokwi-arduino-uno", "mystery-module");
        assert_eq!(
            pairs(&wires),
            vec![pair("mcu:GND.1", "p1:GND"), pair("mcu:2", "p1:SIG")]
        );
    }
}
