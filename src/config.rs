//! Types for configuring the PWM driver.

use crate::time::{Hertz, U32Ext};

/// Configuration struct for [`Pwm`](crate::pwm::Pwm).
///
/// Create a configuration by using `default` in combination with the builder
/// methods. The following snippet describes a timer clocked at 8 MHz which
/// starts out accepting 8-bit duty cycles:
/// ```
/// # use timer16_pwm::config::Config;
/// # use timer16_pwm::time::{Hertz, U32Ext};
/// let config = Config::default().clock(8.mhz()).resolution_bits(8);
///
/// assert!(config.clock == Hertz(8_000_000));
/// assert!(config.resolution_bits == 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Frequency of the clock feeding the timer, before the divider
    pub clock: Hertz,
    /// Duty cycle bit width in effect until
    /// [`set_resolution`](crate::pwm::Pwm::set_resolution) is called
    pub resolution_bits: u8,
}

impl Config {
    /// Sets the timer input clock.
    pub fn clock(mut self, clock: impl Into<Hertz>) -> Self {
        self.clock = clock.into();
        self
    }

    /// Sets the initial duty cycle bit width.
    pub fn resolution_bits(mut self, bits: u8) -> Self {
        self.resolution_bits = bits;
        self
    }
}

impl Default for Config {
    /// A 16 MHz timer clock with 10-bit duty cycles, the usual ATmega328P board
    /// setup.
    fn default() -> Config {
        Config {
            clock: 16.mhz().into(),
            resolution_bits: 10,
        }
    }
}

impl<T: Into<Hertz>> From<T> for Config {
    fn from(clock: T) -> Config {
        Config {
            clock: clock.into(),
            ..Default::default()
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Config {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Pwm {{ clock: {} Hz, resolution: {} bits }}",
            self.clock.0,
            self.resolution_bits,
        );
    }
}
