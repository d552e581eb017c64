//! One-shot hardware bring-up for the Raspberry Pi.
//!
//! Claims the relay GPIOs, the MCP3008 on SPI0/CE0 and the DHT11 data
//! pin, and bundles them into one owned [`HardwareContext`].  Dropping the
//! context drives every relay low, so all exit paths leave the greenhouse
//! in the safe state.

use log::{error, info, warn};
use rppal::gpio::{Gpio, IoPin, Mode, OutputPin};
use rppal::hal::Delay;
use rppal::spi::{Bus, Mode as SpiMode, SlaveSelect, Spi};

use embedded_dht_rs::dht11::Dht11;

use crate::app::ports::{AdcPort, ClimatePort, ClimateSample, OutputPort};
use crate::config::PinMap;
use crate::error::{HardwareFault, Result};
use crate::pins;
use crate::sensors::adc;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioUnavailable,
    PinUnavailable(u8),
    SpiUnavailable,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioUnavailable => write!(f, "GPIO controller unavailable"),
            Self::PinUnavailable(pin) => write!(f, "GPIO {} unavailable or busy", pin),
            Self::SpiUnavailable => write!(f, "SPI0/CE0 unavailable"),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── Context ───────────────────────────────────────────────────

pub struct HardwareContext {
    outputs: Vec<(u8, OutputPin)>,
    spi: Spi,
    dht: Dht11<IoPin, Delay>,
}

impl HardwareContext {
    pub fn open(pins: &PinMap) -> core::result::Result<Self, HwInitError> {
        let gpio = Gpio::new().map_err(|e| {
            error!("hw_init: {}", e);
            HwInitError::GpioUnavailable
        })?;

        let claim = |pin: u8| {
            gpio.get(pin).map_err(|e| {
                error!("hw_init: GPIO {}: {}", pin, e);
                HwInitError::PinUnavailable(pin)
            })
        };

        let mut outputs = Vec::with_capacity(5);
        for pin in [pins.led, pins.fan, pins.cooler, pins.water, pins.heater] {
            let mut out = claim(pin)?.into_output_low();
            out.set_reset_on_drop(false);
            outputs.push((pin, out));
        }

        let mut dht_pin = claim(pins.dht)?.into_io(Mode::Output);
        dht_pin.set_high();
        let dht = Dht11::new(dht_pin, Delay::new());

        let spi = Spi::new(
            Bus::Spi0,
            SlaveSelect::Ss0,
            pins::SPI_CLOCK_HZ,
            SpiMode::Mode0,
        )
        .map_err(|e| {
            error!("hw_init: {}", e);
            HwInitError::SpiUnavailable
        })?;

        info!("hw_init: all peripherals configured");
        Ok(Self { outputs, spi, dht })
    }

    fn drive_all_low(&mut self) {
        for (_, out) in &mut self.outputs {
            out.set_low();
        }
    }
}

impl AdcPort for HardwareContext {
    fn read_channel(&mut self, channel: u8) -> Result<u16> {
        let tx = adc::command_frame(channel)?;
        let mut rx = [0u8; 3];
        match self.spi.transfer(&mut rx, &tx) {
            Ok(3) => Ok(adc::decode_frame(&rx)),
            Ok(n) => {
                warn!("MCP3008 short transfer ({} bytes)", n);
                Err(HardwareFault::AdcTransfer.into())
            }
            Err(e) => {
                warn!("MCP3008 transfer failed: {}", e);
                Err(HardwareFault::AdcTransfer.into())
            }
        }
    }
}

impl ClimatePort for HardwareContext {
    fn read_climate(&mut self) -> core::result::Result<ClimateSample, HardwareFault> {
        let reading = self.dht.read().map_err(|e| {
            log::debug!("DHT11 read error: {:?}", e);
            HardwareFault::ClimateRead
        })?;
        Ok(ClimateSample {
            temperature_c: f32::from(reading.temperature),
            humidity_pct: f32::from(reading.humidity),
        })
    }
}

impl OutputPort for HardwareContext {
    fn write_output(&mut self, pin: u8, on: bool) -> core::result::Result<(), HardwareFault> {
        let (_, out) = self
            .outputs
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(HardwareFault::UnknownPin(pin))?;
        if on {
            out.set_high();
        } else {
            out.set_low();
        }
        Ok(())
    }
}

impl Drop for HardwareContext {
    fn drop(&mut self) {
        self.drive_all_low();
        info!("hw_init: outputs driven low, hardware released");
    }
}
