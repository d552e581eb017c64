//! Unified error types for the greenhouse controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the cycle and logged without allocation.
//!
//! | Variant               | Policy                                      |
//! |-----------------------|---------------------------------------------|
//! | `InvalidChannel`      | programming error, fatal at the call site   |
//! | `Hardware`            | transient, degrade and continue             |
//! | `CalibrationNotReady` | fatal at startup                            |
//! | `Delivery`            | logged, never retried, never propagated     |
//! | `ConfigInconsistency` | fatal at startup unless defaults reseeded   |
//! | `Storage`             | escalated out of the cycle                  |

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// ADC channel outside `0..=7`.
    InvalidChannel(u8),
    /// A sensor or output pin misbehaved.
    Hardware(HardwareFault),
    /// No usable CO2 EMF baseline could be measured.
    CalibrationNotReady,
    /// A report could not be delivered to the remote service.
    Delivery(DeliveryFailure),
    /// Persisted state is missing or contradicts itself.
    ConfigInconsistency(&'static str),
    /// The persisted-state store failed.
    Storage(StorageError),
    /// A device name outside the five known actuators.
    UnknownDevice,
    /// Controller configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(ch) => write!(f, "invalid ADC channel {ch}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::CalibrationNotReady => write!(f, "CO2 calibration not ready"),
            Self::Delivery(e) => write!(f, "delivery: {e}"),
            Self::ConfigInconsistency(msg) => write!(f, "config inconsistency: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::UnknownDevice => write!(f, "unknown device"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareFault {
    /// SPI transfer to the ADC failed.
    AdcTransfer,
    /// The temperature/humidity sensor returned no valid frame.
    ClimateRead,
    /// Writing a digital output failed.
    OutputWrite,
    /// The pin is not part of the hardware context.
    UnknownPin(u8),
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcTransfer => write!(f, "ADC transfer failed"),
            Self::ClimateRead => write!(f, "climate sensor read failed"),
            Self::OutputWrite => write!(f, "output write failed"),
            Self::UnknownPin(pin) => write!(f, "pin {pin} not configured"),
        }
    }
}

impl From<HardwareFault> for Error {
    fn from(e: HardwareFault) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Delivery failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The service answered with something other than 200.
    Status(u16),
    /// Connection, DNS or TLS failure.
    Transport,
    /// The request did not complete within the agent timeout.
    Timeout,
    /// The payload could not be serialised.
    Encode,
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Transport => write!(f, "transport error"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Encode => write!(f, "payload encoding failed"),
        }
    }
}

impl From<DeliveryFailure> for Error {
    fn from(e: DeliveryFailure) -> Self {
        Self::Delivery(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested row does not exist.
    NotFound,
    /// Stored document failed to deserialise.
    Corrupted,
    /// Generic I/O error from the backing file.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::Corrupted => write!(f, "stored state corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
