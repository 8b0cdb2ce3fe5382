//! Staged output intent for the four channel pairs.

use thiserror::Error;

use crate::CommandWord;

/// Number of channel pairs (axes) the driver manages.
pub const AXIS_COUNT: u8 = 4;

/// Drive direction of a channel pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i8)]
pub enum Direction {
    /// Even half-bridge high, odd half-bridge low.
    Reverse = -1,
    /// Pair enabled with both high sides off.
    Off = 0,
    /// Odd half-bridge high, even half-bridge low.
    Forward = 1,
}

impl TryFrom<i8> for Direction {
    type Error = ArgumentError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Reverse),
            0 => Ok(Direction::Off),
            1 => Ok(Direction::Forward),
            other => Err(ArgumentError::Direction(other)),
        }
    }
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    #[error("axis {0} out of range 0..=3")]
    Axis(u8),
    #[error("direction {0} is not one of -1, 0, 1")]
    Direction(i8),
}

/// Enable and configuration masks waiting to be applied.
///
/// Each axis owns the bit pair `2 * axis` and `2 * axis + 1` in both masks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    out_en: u8,
    out_conf: u8,
}

impl OutputState {
    pub const fn new() -> Self {
        Self {
            out_en: 0,
            out_conf: 0,
        }
    }

    pub const fn out_en(&self) -> u8 {
        self.out_en
    }

    pub const fn out_conf(&self) -> u8 {
        self.out_conf
    }

    /// Stage `direction` (-1, 0 or 1) for `axis`.
    ///
    /// Nothing is modified when either argument is out of range.
    pub fn set_output(&mut self, axis: u8, direction: i8) -> Result<(), ArgumentError> {
        let direction = Direction::try_from(direction)?;
        self.set_direction(axis, direction)
    }

    /// Stage `direction` for `axis`.
    ///
    /// The pair is enabled even for [`Direction::Off`].
    pub fn set_direction(&mut self, axis: u8, direction: Direction) -> Result<(), ArgumentError> {
        if axis >= AXIS_COUNT {
            return Err(ArgumentError::Axis(axis));
        }
        let shift = axis * 2;
        let pair: u8 = 0b11 << shift;

        self.out_en |= pair;
        self.out_conf &= !pair;
        self.out_conf |= match direction {
            Direction::Forward => 0b01u8 << shift,
            Direction::Reverse => 0b10u8 << shift,
            Direction::Off => 0,
        };
        Ok(())
    }

    /// Staged direction of `axis`, `None` if the pair is disabled or out of range.
    pub fn direction(&self, axis: u8) -> Option<Direction> {
        if axis >= AXIS_COUNT {
            return None;
        }
        let shift = axis * 2;
        if (self.out_en >> shift) & 0b11 == 0 {
            return None;
        }
        match (self.out_conf >> shift) & 0b11 {
            0b01 => Some(Direction::Forward),
            0b10 => Some(Direction::Reverse),
            _ => Some(Direction::Off),
        }
    }

    /// Disable every output.
    pub fn clear(&mut self) {
        self.out_en = 0;
        self.out_conf = 0;
    }

    /// Command frame carrying the staged masks.
    pub const fn command(&self) -> CommandWord {
        CommandWord::outputs(self.out_en, self.out_conf)
    }
}
