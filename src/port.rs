//! Hardware access
//!
//! The driver never touches registers itself. Everything chip specific sits
//! behind [`HardwarePort`], so the same solver runs against real timers and
//! against the [`SimulatedPort`](crate::sim::SimulatedPort) in tests.

use core::convert::TryFrom;

use crate::error::Error;
use crate::prescaler::DividerTable;

/// Output pin of channel A
pub const PIN_A: u8 = 9;
/// Output pin of channel B
pub const PIN_B: u8 = 10;

/// One of the two compare outputs sharing the timer's period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Compare output A, pin 9
    A,
    /// Compare output B, pin 10
    B,
}

impl Channel {
    /// Both channels
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];

    /// Pin number the channel drives
    pub const fn pin(self) -> u8 {
        match self {
            Channel::A => PIN_A,
            Channel::B => PIN_B,
        }
    }

    /// Look up the channel driving `pin`.
    pub const fn from_pin(pin: u8) -> Result<Self, Error> {
        match pin {
            PIN_A => Ok(Channel::A),
            PIN_B => Ok(Channel::B),
            _ => Err(Error::UnknownChannel { pin }),
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(pin: u8) -> Result<Self, Self::Error> {
        Channel::from_pin(pin)
    }
}

/// Counting mode selected at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Mode {
    /// Count up from 0 to the boundary register and wrap. Outputs go high at
    /// 0 and low on compare match.
    FastPwm,
}

/// Register level access to a 16-bit timer with two compare outputs.
///
/// Implementations are plain register writes. Ordering and atomicity are the
/// driver's business: it calls the configuration methods inside
/// [`interrupt_free`](HardwarePort::interrupt_free).
pub trait HardwarePort {
    /// Dividers the clock-select field supports, smallest first.
    const DIVIDERS: DividerTable;

    /// Stop the counter, clear mode and clock-select bits and zero the counter.
    fn reset_counter(&mut self);

    /// Select the counting mode.
    fn set_mode(&mut self, mode: Mode);

    /// Write the period boundary (the counter top).
    fn set_boundary(&mut self, top: u16);

    /// Select `divider` as the counter clock, which starts the counter.
    ///
    /// `divider` is always one of [`DIVIDERS`](HardwarePort::DIVIDERS).
    fn set_clock_select(&mut self, divider: u16);

    /// Write the compare register of `channel`.
    fn set_compare(&mut self, channel: Channel, value: u16);

    /// Read the compare register of `channel` back.
    fn compare(&self, channel: Channel) -> u16;

    /// Drive the pins of both channels as outputs.
    fn configure_outputs(&mut self);

    /// Connect or disconnect the compare output of `channel` from its pin.
    fn set_output_enabled(&mut self, channel: Channel, enabled: bool);

    /// Run `f` with interrupts masked.
    ///
    /// The default masks interrupts through [`critical_section::with`], which
    /// restores the previous state however `f` returns.
    fn interrupt_free<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        critical_section::with(|_| f(self))
    }
}
