//! Linux userspace SPI transport on top of `linux-embedded-hal`.
//!
//! The device node is `/dev/spidev<bus>.<cs>`. With [`ChipSelect::Gpio`] the
//! kernel chip-select is disabled (`SPI_NO_CS`), the node is opened as a bus
//! and the GPIO line, requested through the gpiochip character device, is
//! driven by [`ExclusiveDevice`].

use std::io;
use std::path::PathBuf;

use embedded_hal::spi::{self, ErrorType, Operation, SpiDevice};
use embedded_hal_bus::spi::{DeviceError, ExclusiveDevice};
use linux_embedded_hal::gpio_cdev::{self, Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, CdevPinError, Delay, SPIError, SpidevBus, SpidevDevice};
use thiserror::Error;

use crate::{BusConfig, ChipSelect, SpiBinder};

const CONSUMER: &str = "ncv7718-cs";

#[derive(Debug, Error)]
pub enum LinuxSpiError {
    #[error("spidev error: {0:?}")]
    Spi(SPIError),
    #[error("spidev I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("GPIO line request failed: {0}")]
    Gpio(#[from] gpio_cdev::errors::Error),
    #[error("chip-select GPIO error: {0:?}")]
    ChipSelect(CdevPinError),
}

impl From<SPIError> for LinuxSpiError {
    fn from(e: SPIError) -> Self {
        LinuxSpiError::Spi(e)
    }
}

impl From<DeviceError<SPIError, CdevPinError>> for LinuxSpiError {
    fn from(e: DeviceError<SPIError, CdevPinError>) -> Self {
        match e {
            DeviceError::Spi(e) => LinuxSpiError::Spi(e),
            DeviceError::Cs(e) => LinuxSpiError::ChipSelect(e),
        }
    }
}

impl spi::Error for LinuxSpiError {
    fn kind(&self) -> spi::ErrorKind {
        match self {
            LinuxSpiError::Spi(e) => spi::Error::kind(e),
            LinuxSpiError::ChipSelect(_) => spi::ErrorKind::ChipSelectFault,
            _ => spi::ErrorKind::Other,
        }
    }
}

/// Binds [`LinuxSpiDevice`]s. GPIO chip-select lines are requested from
/// `gpio_chip`.
#[derive(Clone, Debug)]
pub struct SpidevBinder {
    pub gpio_chip: PathBuf,
}

impl Default for SpidevBinder {
    fn default() -> Self {
        Self {
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
        }
    }
}

impl SpidevBinder {
    pub fn with_gpio_chip(gpio_chip: impl Into<PathBuf>) -> Self {
        Self {
            gpio_chip: gpio_chip.into(),
        }
    }
}

impl SpiBinder for SpidevBinder {
    type Device = LinuxSpiDevice;

    fn bind(&mut self, config: &BusConfig) -> Result<LinuxSpiDevice, LinuxSpiError> {
        let options = spidev_options(config);
        match config.chip_select {
            ChipSelect::Native(cs) => {
                let mut spi = SpidevDevice::open(node_path(config.bus, cs))?;
                spi.0.configure(&options)?;
                Ok(LinuxSpiDevice::Native(spi))
            }
            ChipSelect::Gpio { cs, gpio } => {
                let mut bus = SpidevBus::open(node_path(config.bus, cs))?;
                bus.0.configure(&options)?;
                // Requested high so the device stays deselected until the first transaction.
                let line = Chip::new(&self.gpio_chip)?
                    .get_line(gpio)?
                    .request(LineRequestFlags::OUTPUT, 1, CONSUMER)?;
                let pin = CdevPin::new(line)?;
                let device =
                    ExclusiveDevice::new(bus, pin, Delay).map_err(LinuxSpiError::ChipSelect)?;
                Ok(LinuxSpiDevice::Gpio(device))
            }
        }
    }
}

/// A bound `spidev` node, with the kernel or a GPIO driving chip-select.
pub enum LinuxSpiDevice {
    Native(SpidevDevice),
    Gpio(ExclusiveDevice<SpidevBus, CdevPin, Delay>),
}

impl ErrorType for LinuxSpiDevice {
    type Error = LinuxSpiError;
}

impl SpiDevice for LinuxSpiDevice {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        match self {
            LinuxSpiDevice::Native(spi) => spi.transaction(operations).map_err(Into::into),
            LinuxSpiDevice::Gpio(spi) => spi.transaction(operations).map_err(Into::into),
        }
    }
}

fn node_path(bus: u8, cs: u8) -> PathBuf {
    PathBuf::from(format!("/dev/spidev{bus}.{cs}"))
}

fn spidev_options(config: &BusConfig) -> SpidevOptions {
    let mut mode = SpiModeFlags::SPI_MODE_1;
    if matches!(config.chip_select, ChipSelect::Gpio { .. }) {
        mode |= SpiModeFlags::SPI_NO_CS;
    }
    let mut options = SpidevOptions::new();
    options
        .bits_per_word(BusConfig::BITS_PER_WORD)
        .lsb_first(BusConfig::LSB_FIRST)
        .mode(mode);
    if let Some(hz) = config.clock_hz {
        options.max_speed_hz(hz);
    }
    options.build()
}
