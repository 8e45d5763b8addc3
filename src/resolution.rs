//! Duty cycle resolution
//!
//! A resolution of `k` bits accepts duty cycles `0..=2^k - 1`. It can never be
//! finer than the counter itself: with a top of `t` the counter only has
//! `floor(log2(t))` full bits.

use crate::error::{Error, Result};

/// Widest duty cycle accepted by the API
pub const MAX_BITS: u8 = 16;

/// Number of full bits `top` can represent, `floor(log2(top))`, and 0 for 0.
pub const fn achievable_bits(top: u16) -> u8 {
    if top == 0 {
        return 0;
    }
    (u16::BITS - 1 - top.leading_zeros()) as u8
}

/// `2^bits - 1`, with `bits` capped at [`MAX_BITS`]
pub const fn mask(bits: u8) -> u16 {
    let bits = if bits > MAX_BITS { MAX_BITS } else { bits };
    ((1u32 << bits) - 1) as u16
}

/// The bit width granted for a request against the counter `top`.
pub fn negotiate(requested_bits: u8, top: u16) -> u8 {
    requested_bits.min(MAX_BITS).min(achievable_bits(top))
}

/// Scale `duty`, clamped to `0..=resolution`, onto the compare range `0..=top`.
///
/// The product is formed in `u32` and rounded down. The result never exceeds
/// `top`.
pub fn scale(duty: u16, top: u16, resolution: u16) -> Result<u16> {
    if resolution == 0 {
        return Err(Error::ZeroResolution);
    }
    let duty = duty.min(resolution);
    let value = u32::from(duty) * u32::from(top) / u32::from(resolution);
    // duty <= resolution keeps value <= top
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn achievable_bits_is_floor_log2() {
        assert_eq!(achievable_bits(0), 0);
        assert_eq!(achievable_bits(1), 0);
        assert_eq!(achievable_bits(2), 1);
        assert_eq!(achievable_bits(3), 1);
        assert_eq!(achievable_bits(4999), 12);
        assert_eq!(achievable_bits(8191), 12);
        assert_eq!(achievable_bits(8192), 13);
        assert_eq!(achievable_bits(u16::MAX), 15);
    }

    #[test]
    fn mask_is_one_less_than_a_power_of_two() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 1);
        assert_eq!(mask(10), 1023);
        assert_eq!(mask(12), 4095);
        assert_eq!(mask(16), u16::MAX);
        assert_eq!(mask(200), u16::MAX);
    }

    #[test]
    fn negotiation_takes_the_smaller_width() {
        assert_eq!(negotiate(16, 4999), 12);
        assert_eq!(negotiate(8, 4999), 8);
        assert_eq!(negotiate(255, u16::MAX), 15);
        assert_eq!(negotiate(10, 0), 0);
    }

    #[test]
    fn scale_hits_both_ends() {
        assert_eq!(scale(0, 4999, 4095), Ok(0));
        assert_eq!(scale(4095, 4999, 4095), Ok(4999));
        assert_eq!(scale(4095 + 100, 4999, 4095), Ok(4999));
        assert_eq!(scale(u16::MAX, u16::MAX, 1023), Ok(u16::MAX));
    }

    #[test]
    fn scale_is_monotonic() {
        let mut previous = 0;
        for duty in 0..=4095 {
            let value = scale(duty, 4999, 4095).unwrap();
            assert!(value >= previous);
            assert!(value <= 4999);
            previous = value;
        }
    }

    #[test]
    fn scale_rejects_zero_resolution() {
        assert_eq!(scale(0, 4999, 0), Err(Error::ZeroResolution));
        assert_eq!(scale(7, 0, 0), Err(Error::ZeroResolution));
    }
}
