//! Errors reported by the PWM driver

use derive_more::{Display, Error};

/// PWM configuration error
///
/// None of these leave the timer half configured, the caller can retry
/// with different parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// No divider of the port's table fits the period into the 16-bit counter.
    ///
    /// The period is either longer than the largest divider can count, or so
    /// short (zero included) that not even a single tick fits.
    #[display("period of {period_us} us is not representable by any divider")]
    UnrepresentablePeriod {
        /// The requested period in microseconds
        period_us: u32,
    },
    /// The pin number does not belong to one of the two PWM channels.
    #[display("pin {pin} is not a PWM channel output")]
    UnknownChannel {
        /// The rejected pin number
        pin: u8,
    },
    /// The duty cycle resolution is zero, there is no duty scale to map from.
    #[display("duty cycle resolution is zero")]
    ZeroResolution,
}

/// Result alias with the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            Error::UnrepresentablePeriod { period_us: 5 }.to_string(),
            "period of 5 us is not representable by any divider"
        );
        assert_eq!(
            Error::UnknownChannel { pin: 11 }.to_string(),
            "pin 11 is not a PWM channel output"
        );
        assert_eq!(
            Error::ZeroResolution.to_string(),
            "duty cycle resolution is zero"
        );
    }
}
