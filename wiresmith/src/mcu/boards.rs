//! Built-in pin inventories for the supported development boards.
//!
//! Pin names follow the Wokwi part definitions. Bus pins (I2C, SPI) are
//! kept out of the general pools so they can be shared by every device on
//! the bus without colliding with allocated GPIOs.

/// Static pin inventory of one microcontroller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardProfile {
    pub name: &'static str,
    pub digital: &'static [&'static str],
    pub analog: &'static [&'static str],
    pub pwm: &'static [&'static str],
    pub grounds: &'static [&'static str],
    pub power_5v: Option<&'static str>,
    pub power_3v3: Option<&'static str>,
    pub i2c_sda: &'static str,
    pub i2c_scl: &'static str,
    pub spi: SpiPins,
    pub fallback_digital: &'static str,
    pub fallback_analog: &'static str,
    pub fallback_pwm: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiPins {
    pub mosi: &'static str,
    pub miso: &'static str,
    pub sck: &'static str,
}

pub const ARDUINO_UNO: BoardProfile = BoardProfile {
    name: "Arduino Uno",
    // 0/1 are the serial port, 11-13 are SPI.
    digital: &["2", "3", "4", "5", "6", "7", "8", "9", "10"],
    // A4/A5 double as SDA/SCL.
    analog: &["A0", "A1", "A2", "A3"],
    pwm: &["3", "5", "6", "9", "10"],
    grounds: &["GND.1", "GND.2", "GND.3"],
    power_5v: Some("5V"),
    power_3v3: Some("3.3V"),
    i2c_sda: "A4",
    i2c_scl: "A5",
    spi: SpiPins {
        mosi: "11",
        miso: "12",
        sck: "13",
    },
    fallback_digital: "2",
    fallback_analog: "A0",
    fallback_pwm: "3",
};

pub const ARDUINO_MEGA: BoardProfile = BoardProfile {
    name: "Arduino Mega",
    digital: &[
        "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
        "18", "19", "22", "23", "24", "25", "26", "27", "28", "29", "30", "31", "32", "33", "34",
        "35", "36", "37", "38", "39", "40", "41", "42", "43", "44", "45", "46", "47", "48", "49",
    ],
    analog: &[
        "A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12", "A13",
        "A14", "A15",
    ],
    pwm: &[
        "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "44", "45", "46",
    ],
    grounds: &["GND.1", "GND.2", "GND.3", "GND.4"],
    power_5v: Some("5V"),
    power_3v3: Some("3.3V"),
    i2c_sda: "20",
    i2c_scl: "21",
    spi: SpiPins {
        mosi: "51",
        miso: "50",
        sck: "52",
    },
    fallback_digital: "2",
    fallback_analog: "A0",
    fallback_pwm: "2",
};

pub const ARDUINO_NANO: BoardProfile = BoardProfile {
    name: "Arduino Nano",
    digital: &["2", "3", "4", "5", "6", "7", "8", "9", "10"],
    analog: &["A0", "A1", "A2", "A3", "A6", "A7"],
    pwm: &["3", "5", "6", "9", "10"],
    grounds: &["GND.1", "GND.2"],
    power_5v: Some("5V"),
    power_3v3: Some("3.3V"),
    i2c_sda: "A4",
    i2c_scl: "A5",
    spi: SpiPins {
        mosi: "11",
        miso: "12",
        sck: "13",
    },
    fallback_digital: "2",
    fallback_analog: "A0",
    fallback_pwm: "3",
};

pub const ESP32_DEVKIT: BoardProfile = BoardProfile {
    name: "ESP32 DevKit",
    // Strapping-safe outputs first; 21/22 are I2C and 18/19/23 are SPI.
    digital: &[
        "2", "4", "5", "12", "13", "14", "15", "16", "17", "25", "26", "27", "32", "33",
    ],
    // 34/35/36/39 are input-only ADC1 channels.
    analog: &["34", "35", "VP", "VN"],
    // Any output-capable GPIO drives LEDC PWM.
    pwm: &[
        "2", "4", "5", "12", "13", "14", "15", "16", "17", "25", "26", "27", "32", "33",
    ],
    grounds: &["GND.1", "GND.2", "GND.3"],
    power_5v: Some("5V"),
    power_3v3: Some("3V3"),
    i2c_sda: "21",
    i2c_scl: "22",
    spi: SpiPins {
        mosi: "23",
        miso: "19",
        sck: "18",
    },
    fallback_digital: "2",
    fallback_analog: "34",
    fallback_pwm: "2",
};
