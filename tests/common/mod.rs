//! Simulated NCV7718 for driver tests.
#![allow(dead_code)]

use embedded_hal::spi::{self, ErrorType, Operation};
use ncv7718_dd::{BusConfig, SpiBinder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl spi::Error for SimError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Answers every frame with the status of the previous one.
///
/// The status echoes `HBEN`/`HBCNF` of the received command into `HBST`/`HBCR`
/// and ORs in `fault_bits`. `hbcr_override` replaces the echoed configuration.
#[derive(Debug, Default)]
pub struct SimChip {
    /// Words received, in order.
    pub received: Vec<u16>,
    /// Status shifted out on the next transfer.
    pub pending: u16,
    pub fault_bits: u16,
    pub hbcr_override: Option<u8>,
    /// Transaction indices (0-based) that fail.
    pub fail_on: Vec<usize>,
    pub fail_all: bool,
    transactions: usize,
}

impl SimChip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(fault_bits: u16) -> Self {
        Self {
            fault_bits,
            ..Self::default()
        }
    }

    pub fn with_hbcr(hbcr: u8) -> Self {
        Self {
            hbcr_override: Some(hbcr),
            ..Self::default()
        }
    }

    pub fn failing_on(indices: &[usize]) -> Self {
        Self {
            fail_on: indices.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    fn clock_frame(&mut self, word: u16) -> u16 {
        self.received.push(word);
        let reply = self.pending;

        let hben = (word >> 7) & 0x3F;
        let hbcnf = match self.hbcr_override {
            Some(hbcr) => u16::from(hbcr) & 0x3F,
            None => (word >> 1) & 0x3F,
        };
        self.pending = (hben << 7) | (hbcnf << 1) | self.fault_bits;
        reply
    }
}

impl ErrorType for SimChip {
    type Error = SimError;
}

impl spi::SpiDevice for SimChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SimError> {
        let index = self.transactions;
        self.transactions += 1;
        if self.fail_all || self.fail_on.contains(&index) {
            return Err(SimError);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(buf) => {
                    assert_eq!(buf.len(), 2, "NCV7718 frames are 16 bits");
                    self.clock_frame(u16::from_be_bytes([buf[0], buf[1]]));
                }
                Operation::Transfer(read, write) => {
                    assert_eq!(write.len(), 2, "NCV7718 frames are 16 bits");
                    let reply = self.clock_frame(u16::from_be_bytes([write[0], write[1]]));
                    read.copy_from_slice(&reply.to_be_bytes());
                }
                Operation::TransferInPlace(buf) => {
                    let reply = self.clock_frame(u16::from_be_bytes([buf[0], buf[1]]));
                    buf.copy_from_slice(&reply.to_be_bytes());
                }
                Operation::Read(buf) => {
                    let reply = self.clock_frame(0);
                    buf.copy_from_slice(&reply.to_be_bytes());
                }
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

impl embedded_hal_async::spi::SpiDevice for SimChip {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SimError> {
        spi::SpiDevice::transaction(self, operations)
    }
}

/// Hands out a prepared [`SimChip`] and records the requested configuration.
#[derive(Debug, Default)]
pub struct SimBinder {
    pub chip: Option<SimChip>,
    pub requested: Option<BusConfig>,
}

impl SimBinder {
    pub fn new(chip: SimChip) -> Self {
        Self {
            chip: Some(chip),
            requested: None,
        }
    }

    /// A binder whose bus cannot be opened.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl SpiBinder for SimBinder {
    type Device = SimChip;

    fn bind(&mut self, config: &BusConfig) -> Result<SimChip, SimError> {
        self.requested = Some(*config);
        self.chip.take().ok_or(SimError)
    }
}
