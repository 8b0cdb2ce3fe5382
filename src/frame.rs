//! NCV7718 SPI frame layout.
//!
//! Every transfer is a single 16-bit frame, shifted out MSB first. The command
//! frame written on SI and the status frame clocked back on SO share the same
//! 6-bit half-bridge field positions:
//!
//! ```text
//!          15    14     13    12..7   6..1    0
//! command  SRR   HBSEL  ULDSC HBEN    HBCNF   OVLO
//! status   OCS   PSF    ULD   HBST    HBCR    TW
//! ```

/// Width mask of the per-half-bridge fields (`HBEN`, `HBCNF`, `HBST`, `HBCR`).
pub const HALF_BRIDGE_MASK: u8 = 0x3F;

const FIELD_MASK: u16 = HALF_BRIDGE_MASK as u16;
const ENABLE_SHIFT: u16 = 7;
const CONFIG_SHIFT: u16 = 1;

const SRR: u16 = 1 << 15;
const HBSEL: u16 = 1 << 14;
const ULDSC: u16 = 1 << 13;
const OVLO: u16 = 1 << 0;

const OCS: u16 = 1 << 15;
const PSF: u16 = 1 << 14;
const ULD: u16 = 1 << 13;
const TW: u16 = 1 << 0;

/// A 16-bit command frame sent to the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandWord {
    raw: u16,
}

impl CommandWord {
    /// Build a command frame.
    ///
    /// `hben` and `hbcnf` are truncated to their low 6 bits. `HBSEL`, `ULDSC`
    /// and `OVLO` are always left at 0.
    pub const fn encode(hben: u8, hbcnf: u8, reset: bool) -> Self {
        let mut raw = ((hben as u16 & FIELD_MASK) << ENABLE_SHIFT)
            | ((hbcnf as u16 & FIELD_MASK) << CONFIG_SHIFT);
        if reset {
            raw |= SRR;
        }
        Self { raw }
    }

    /// Status-register reset with every output disabled.
    pub const fn reset() -> Self {
        Self::encode(0, 0, true)
    }

    /// Output configuration frame without the reset strobe.
    pub const fn outputs(hben: u8, hbcnf: u8) -> Self {
        Self::encode(hben, hbcnf, false)
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Frame bytes in wire order.
    pub const fn to_be_bytes(&self) -> [u8; 2] {
        self.raw.to_be_bytes()
    }

    /// Status register reset strobe.
    pub const fn srr(&self) -> bool {
        self.raw & SRR != 0
    }

    /// Half-bridge selection bit, must be 0.
    pub const fn hbsel(&self) -> bool {
        self.raw & HBSEL != 0
    }

    /// Under-load detection shutdown.
    pub const fn uldsc(&self) -> bool {
        self.raw & ULDSC != 0
    }

    /// Half-bridge enables, HB1 in bit 0.
    pub const fn hben(&self) -> u8 {
        ((self.raw >> ENABLE_SHIFT) & FIELD_MASK) as u8
    }

    /// Half-bridge configuration, 1 = high side on.
    pub const fn hbcnf(&self) -> u8 {
        ((self.raw >> CONFIG_SHIFT) & FIELD_MASK) as u8
    }

    /// Over-voltage lockout control.
    pub const fn ovlo(&self) -> bool {
        self.raw & OVLO != 0
    }
}

/// Hardware fault reported in a status frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    ThermalWarning,
    PowerSupplyFailure,
    OvercurrentShutoff,
    UnderLoad,
}

/// A 16-bit status frame received from the device.
///
/// Because of the device's shift-register timing, the status clocked out
/// during a transfer describes the frame written in the previous transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    raw: u16,
}

impl Status {
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self {
            raw: u16::from_be_bytes(bytes),
        }
    }

    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Overcurrent shutdown.
    pub const fn ocs(&self) -> bool {
        self.raw & OCS != 0
    }

    /// Power supply failure (under- or over-voltage on VS).
    pub const fn psf(&self) -> bool {
        self.raw & PSF != 0
    }

    /// Under-load detected on at least one enabled half-bridge.
    pub const fn uld(&self) -> bool {
        self.raw & ULD != 0
    }

    /// Half-bridge enable status, HB1 in bit 0.
    pub const fn hbst(&self) -> u8 {
        ((self.raw >> ENABLE_SHIFT) & FIELD_MASK) as u8
    }

    /// Half-bridge configuration report, HB1 in bit 0.
    pub const fn hbcr(&self) -> u8 {
        ((self.raw >> CONFIG_SHIFT) & FIELD_MASK) as u8
    }

    /// Thermal warning.
    pub const fn tw(&self) -> bool {
        self.raw & TW != 0
    }

    /// Highest-priority fault flagged in this frame.
    ///
    /// Priority is thermal warning, power supply failure, overcurrent
    /// shutdown, then under-load.
    pub const fn fault(&self) -> Option<Fault> {
        if self.tw() {
            Some(Fault::ThermalWarning)
        } else if self.psf() {
            Some(Fault::PowerSupplyFailure)
        } else if self.ocs() {
            Some(Fault::OvercurrentShutoff)
        } else if self.uld() {
            Some(Fault::UnderLoad)
        } else {
            None
        }
    }

    pub const fn has_fault(&self) -> bool {
        self.fault().is_some()
    }
}
