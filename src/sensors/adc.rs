//! MCP3008 10-bit SPI ADC framing.
//!
//! Single-ended conversion uses a 3-byte full-duplex transfer:
//!
//! ```text
//!  MOSI: 0000_0001  1ccc_0000  xxxx_xxxx     (start bit, SGL + channel)
//!  MISO: xxxx_xxxx  xxxx_x0bb  bbbb_bbbb     (null bit + 10 data bits)
//! ```
//!
//! The SPI transfer itself lives in the hardware adapter; this module
//! only builds and decodes frames so it can be tested on the host.

use crate::error::{Error, Result};

/// Number of single-ended channels.
pub const CHANNELS: u8 = 8;

/// Largest code the converter produces.
pub const MAX_CODE: u16 = 1023;

/// Reject channels the converter does not have.
pub fn check_channel(channel: u8) -> Result<()> {
    if channel < CHANNELS {
        Ok(())
    } else {
        Err(Error::InvalidChannel(channel))
    }
}

/// Build the transmit frame for a single-ended read of `channel`.
pub fn command_frame(channel: u8) -> Result<[u8; 3]> {
    check_channel(channel)?;
    Ok([0x01, (0x08 | channel) << 4, 0x00])
}

/// Extract the 10-bit code from a received frame.
pub fn decode_frame(rx: &[u8; 3]) -> u16 {
    (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2])
}
