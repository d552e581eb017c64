//! GPIO / ADC assignments for the greenhouse controller board.
//!
//! Single source of truth: the config defaults reference this module
//! rather than hard-coding pin numbers.  All GPIO numbers are BCM.

// ---------------------------------------------------------------------------
// Actuator relays (digital outputs, active HIGH)
// ---------------------------------------------------------------------------

/// Grow lights.
pub const LED_GPIO: u8 = 19;
/// Ventilation fan.
pub const FAN_GPIO: u8 = 23;
/// Cooler.
pub const COOLER_GPIO: u8 = 24;
/// Irrigation pump / valve.
pub const WATER_GPIO: u8 = 18;
/// Heater.
pub const HEATER_GPIO: u8 = 5;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line.
pub const DHT_GPIO: u8 = 4;

/// MCP3008 channel wired to the capacitive soil-moisture probe.
pub const SOIL_ADC_CHANNEL: u8 = 0;
/// MCP3008 channel wired to the MG-811 CO2 sensor (via divider R1/R2).
pub const CO2_ADC_CHANNEL: u8 = 1;

// ---------------------------------------------------------------------------
// SPI (MCP3008)
// ---------------------------------------------------------------------------

/// SPI clock for the ADC.
pub const SPI_CLOCK_HZ: u32 = 1_000_000;
