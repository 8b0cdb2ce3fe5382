#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! # NCV7718 Half-Bridge Driver Interface
//!
//! This crate provides a bisync-based driver for the onsemi NCV7718 hex half-bridge
//! driver IC. The six half-bridges are driven in pairs ("axes"), each pair
//! producing forward, reverse or off on one load. It supports both asynchronous
//! (`async`) and blocking operation through a unified API, using the
//! [`bisync`](https://docs.rs/bisync) crate for seamless compatibility with both
//! `embedded-hal` and `embedded-hal-async` traits.
//!
//! ## Features
//!
//! *   **Portable Frame Encoding:** Command and status frames are built with explicit
//!     shifts and masks on a `u16`, see [`CommandWord`] and [`Status`].
//! *   **Unified Async/Blocking Support:** Write your code once and use it in both async
//!     and blocking contexts via bisync.
//! *   **Verified Apply:** Every output update is written, re-sent and checked against the
//!     configuration the device reports back before it is considered applied.
//! *   **Typed Fault Reporting:** Thermal warning, supply failure, overcurrent and
//!     under-load are distinct [`Ncv7718Error`] variants.
//! *   **`defmt` and `log` Integration:** Optional support for logging and debugging.
//! *   **Linux `spidev` Binding:** With the `linux` feature, [`linux::SpidevBinder`]
//!     opens `/dev/spidevB.C` through `linux-embedded-hal` with either the native
//!     chip-select or a gpiochip line driven by `ExclusiveDevice`.
//!
//! ## Getting Started
//!
//! Instantiate `Ncv7718` (blocking) or `Ncv7718Async` (async) with your SPI device,
//! configured for SPI mode 1, 8-bit words, MSB first:
//!
//! ```rust,no_run
//! use embedded_hal::spi::SpiDevice;
//! use ncv7718_dd::{Ncv7718, Ncv7718Error};
//!
//! fn drive<SPI: SpiDevice>(spi: SPI) -> Result<SPI, Ncv7718Error<SPI::Error>> {
//!     let mut hb = Ncv7718::new(spi);
//!     hb.init()?;
//!
//!     // Axis 0 forward, axis 1 reverse
//!     hb.set_output(0, 1)?;
//!     hb.set_output(1, -1)?;
//!     let _status = hb.apply()?;
//!
//!     // All outputs off, SPI device handed back
//!     Ok(hb.close())
//! }
//! ```
//!
//! For async environments, use `Ncv7718Async` (re-exported from the `asynchronous` module):
//!
//! ```rust,no_run
//! use embedded_hal_async::spi::SpiDevice;
//! use ncv7718_dd::{Ncv7718Async, Ncv7718Error};
//!
//! async fn drive<SPI: SpiDevice>(spi: SPI) -> Result<SPI, Ncv7718Error<SPI::Error>> {
//!     let mut hb = Ncv7718Async::new(spi);
//!     hb.init().await?;
//!     hb.set_output(0, 1)?;
//!     hb.apply().await?;
//!     Ok(hb.close().await)
//! }
//! ```
//!
//! ## Warning!
//!
//! ***Caution!*** This chip switches inductive loads such as motors and valves.
//! A reported fault means the requested output state is **not** confirmed.
//! Always consult the NCV7718 datasheet.

#[macro_use]
pub(crate) mod fmt;

mod frame;
mod state;

#[cfg(feature = "linux")]
pub mod linux;

pub use frame::{CommandWord, Fault, HALF_BRIDGE_MASK, Status};
pub use state::{AXIS_COUNT, ArgumentError, Direction, OutputState};

use embedded_hal::spi::{ErrorType, MODE_1, Mode};
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ncv7718Error<SpiErr> {
    #[error("SPI error")]
    Spi(SpiErr),
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("Device has not been initialized")]
    NotInitialized,
    #[error("Half-bridge configuration mismatch: sent {sent:#04x}, reported {reported:#04x}")]
    ConfigMismatch { sent: u8, reported: u8 },
    #[error("Thermal warning")]
    ThermalWarning(Status),
    #[error("Power supply failure")]
    PowerSupplyFailure(Status),
    #[error("Overcurrent shutoff")]
    OvercurrentShutoff(Status),
    #[error("Under-load detected")]
    UnderLoad(Status),
}

impl<SpiErr> Ncv7718Error<SpiErr> {
    pub(crate) fn from_fault(fault: Fault, status: Status) -> Self {
        match fault {
            Fault::ThermalWarning => Ncv7718Error::ThermalWarning(status),
            Fault::PowerSupplyFailure => Ncv7718Error::PowerSupplyFailure(status),
            Fault::OvercurrentShutoff => Ncv7718Error::OvercurrentShutoff(status),
            Fault::UnderLoad => Ncv7718Error::UnderLoad(status),
        }
    }

    /// Hardware fault carried by this error, if any.
    pub fn fault(&self) -> Option<Fault> {
        match self {
            Ncv7718Error::ThermalWarning(_) => Some(Fault::ThermalWarning),
            Ncv7718Error::PowerSupplyFailure(_) => Some(Fault::PowerSupplyFailure),
            Ncv7718Error::OvercurrentShutoff(_) => Some(Fault::OvercurrentShutoff),
            Ncv7718Error::UnderLoad(_) => Some(Fault::UnderLoad),
            _ => None,
        }
    }
}

/// Chip-select line of the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// Chip-select driven by the SPI controller.
    Native(u8),
    /// Chip-select driven through a general-purpose output. The controller
    /// line `cs` is only used to pick the device node.
    Gpio { cs: u8, gpio: u32 },
}

/// Where and how to bind the SPI transport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub bus: u8,
    pub chip_select: ChipSelect,
    /// Clock rate in Hz, `None` keeps the transport default.
    pub clock_hz: Option<u32>,
}

impl BusConfig {
    /// CPOL = 0, CPHA = 1.
    pub const MODE: Mode = MODE_1;
    pub const BITS_PER_WORD: u8 = 8;
    pub const LSB_FIRST: bool = false;

    /// `gpio_cs > 0` selects a GPIO chip-select, anything else the native line `cs`.
    pub fn new(bus: u8, cs: u8, gpio_cs: i32) -> Self {
        let chip_select = match u32::try_from(gpio_cs) {
            Ok(gpio) if gpio > 0 => ChipSelect::Gpio { cs, gpio },
            _ => ChipSelect::Native(cs),
        };
        Self {
            bus,
            chip_select,
            clock_hz: None,
        }
    }

    pub fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = Some(clock_hz);
        self
    }
}

/// Opens the SPI transport described by a [`BusConfig`].
///
/// The returned device must already be configured for [`BusConfig::MODE`],
/// [`BusConfig::BITS_PER_WORD`] and MSB-first bit order.
pub trait SpiBinder {
    type Device: ErrorType;

    fn bind(
        &mut self,
        config: &BusConfig,
    ) -> Result<Self::Device, <Self::Device as ErrorType>::Error>;
}

/// Lifecycle of a device handle. Closing consumes the handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    Uninitialized,
    Ready,
}

#[path = "."]
mod asynchronous {
    use bisync::asynchronous::*;
    use embedded_hal_async::spi::SpiDevice;
    mod driver;
    pub use driver::*;
}
pub use asynchronous::Ncv7718 as Ncv7718Async;

#[path = "."]
mod blocking {
    use bisync::synchronous::*;
    use embedded_hal::spi::SpiDevice;
    #[allow(clippy::duplicate_mod)]
    mod driver;
    pub use driver::*;
}
pub use blocking::Ncv7718;
