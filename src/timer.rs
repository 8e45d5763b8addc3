//! # Period solver
//!
//! Finds the clock divider and counter top which realize a requested period on a
//! 16-bit counter, and keeps the negotiated values in a [`TimerConfiguration`].
//!
//! With a timer clock `f` the counter advances `f / divider` times per second, so
//! a period of `p` microseconds spans
//!
//! ```text
//! ticks = f * p / 1_000_000 / divider
//! top   = ticks - 1
//! ```
//!
//! The dividers are tried smallest first and the first one that keeps `top`
//! inside `0..=65535` wins, which gives the finest available time resolution.

use crate::error::{Error, Result};
use crate::prescaler::DividerTable;
use crate::resolution;
use crate::time::{Hertz, MicroSeconds};

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Largest counter value of the 16-bit timer
pub const MAX_TOP: u16 = u16::MAX;

/// A divider / top pair realizing a period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Solution {
    /// Clock divider written to the clock-select field
    pub divider: u16,
    /// Counter top written to the period boundary register
    pub top: u16,
}

impl Solution {
    /// The period actually produced by this solution, rounded down to whole
    /// microseconds.
    pub fn period(&self, clock: Hertz) -> MicroSeconds {
        if clock.0 == 0 {
            return MicroSeconds(0);
        }
        let ticks = (u64::from(self.top) + 1) * u64::from(self.divider);
        let micros = ticks * MICROS_PER_SECOND / u64::from(clock.0);
        MicroSeconds(u32::try_from(micros).unwrap_or(u32::MAX))
    }
}

/// Search `dividers` for the smallest one that fits `period` into the counter.
///
/// The product `clock * period` is formed in `u64` and cannot overflow for any
/// input.
pub fn solve(clock: Hertz, period: MicroSeconds, dividers: &DividerTable) -> Result<Solution> {
    let clock_ticks = u64::from(clock.0) * u64::from(period.0) / MICROS_PER_SECOND;

    for divider in dividers.iter() {
        let ticks = clock_ticks / u64::from(divider);
        trace!("divider {=u16}: {=u64} ticks", divider, ticks);

        // Zero ticks would underflow the top. Larger dividers only give fewer
        // ticks, so keep going just to let the loop end.
        let top = match ticks.checked_sub(1) {
            Some(top) => top,
            None => continue,
        };

        if let Ok(top) = u16::try_from(top) {
            return Ok(Solution { divider, top });
        }
    }

    Err(Error::UnrepresentablePeriod {
        period_us: period.0,
    })
}

/// The negotiated state of one timer.
///
/// Starts out unconfigured with a top of zero. Only [`apply`](Self::apply)
/// changes the top, which the driver calls once per successful solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfiguration {
    top: u16,
    divider: Option<u16>,
    resolution: u16,
}

impl TimerConfiguration {
    /// An unconfigured timer accepting duty cycles of `resolution_bits` bits.
    pub const fn new(resolution_bits: u8) -> Self {
        TimerConfiguration {
            top: 0,
            divider: None,
            resolution: resolution::mask(resolution_bits),
        }
    }

    /// Record a solution the hardware has been programmed with.
    pub fn apply(&mut self, solution: Solution) {
        self.top = solution.top;
        self.divider = Some(solution.divider);
    }

    /// Counter value of one full period, 0 while unconfigured
    pub const fn top(&self) -> u16 {
        self.top
    }

    /// Divider of the last successful solve
    pub const fn divider(&self) -> Option<u16> {
        self.divider
    }

    /// Largest accepted duty cycle, always `2^k - 1`
    pub const fn resolution(&self) -> u16 {
        self.resolution
    }

    /// Whether a solution has been applied
    pub const fn is_configured(&self) -> bool {
        self.divider.is_some()
    }

    /// The solution currently in effect
    pub fn solution(&self) -> Option<Solution> {
        self.divider.map(|divider| Solution {
            divider,
            top: self.top,
        })
    }

    /// Negotiate a duty cycle bit width against the current top and return the
    /// width in effect.
    pub fn set_resolution(&mut self, requested_bits: u8) -> u8 {
        let bits = resolution::negotiate(requested_bits, self.top);
        self.resolution = resolution::mask(bits);
        bits
    }

    /// Map a duty cycle of the current resolution onto a compare value.
    pub fn compare_value(&self, duty: u16) -> Result<u16> {
        resolution::scale(duty, self.top, self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOCK: Hertz = Hertz(16_000_000);
    const TABLE: DividerTable = DividerTable::ATMEGA328P;

    #[test]
    fn twenty_milliseconds_pick_divider_8() {
        // 1 -> 319_999 is out of range, 8 -> 39_999 fits
        let solution = solve(CLOCK, MicroSeconds(20_000), &TABLE).unwrap();
        assert_eq!(
            solution,
            Solution {
                divider: 8,
                top: 39_999
            }
        );
    }

    #[test]
    fn divider_64_once_8_overflows() {
        // 8 -> 65_535 still fits at 32_768 us, one more microsecond does not
        let solution = solve(CLOCK, MicroSeconds(32_768), &TABLE).unwrap();
        assert_eq!(solution, Solution { divider: 8, top: 65_535 });

        let solution = solve(CLOCK, MicroSeconds(32_769), &TABLE).unwrap();
        assert_eq!(solution, Solution { divider: 64, top: 8_191 });
    }

    #[test]
    fn short_period_keeps_finest_divider() {
        let solution = solve(CLOCK, MicroSeconds(1_000), &TABLE).unwrap();
        assert_eq!(
            solution,
            Solution {
                divider: 1,
                top: 15_999
            }
        );
    }

    #[test]
    fn full_counter_range_at_each_divider_boundary() {
        // 4096 us at 16 MHz is exactly 65536 ticks
        let at_edge = solve(CLOCK, MicroSeconds(4_096), &TABLE).unwrap();
        assert_eq!(at_edge, Solution { divider: 1, top: 65_535 });

        let past_edge = solve(CLOCK, MicroSeconds(4_097), &TABLE).unwrap();
        assert_eq!(past_edge, Solution { divider: 8, top: 8_193 });
    }

    #[test]
    fn chosen_divider_is_the_smallest_that_fits() {
        for period in [1u32, 50, 999, 4_096, 4_097, 20_000, 262_144, 1_000_000, 4_194_304] {
            let solution = solve(CLOCK, MicroSeconds(period), &TABLE).unwrap();
            let ticks = u64::from(CLOCK.0) * u64::from(period) / 1_000_000;
            for smaller in TABLE.iter().take_while(|&d| d < solution.divider) {
                assert!(ticks / u64::from(smaller) > 65_536, "{} fits at {}", period, smaller);
            }
        }
    }

    #[test]
    fn longest_period_of_largest_divider() {
        // 1024 * 65536 ticks at 16 MHz
        let solution = solve(CLOCK, MicroSeconds(4_194_367), &TABLE).unwrap();
        assert_eq!(solution, Solution { divider: 1024, top: 65_535 });

        assert_eq!(
            solve(CLOCK, MicroSeconds(4_194_368), &TABLE),
            Err(Error::UnrepresentablePeriod {
                period_us: 4_194_368
            })
        );
    }

    #[test]
    fn huge_period_does_not_overflow() {
        assert_eq!(
            solve(Hertz(u32::MAX), MicroSeconds(u32::MAX), &TABLE),
            Err(Error::UnrepresentablePeriod {
                period_us: u32::MAX
            })
        );
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(
            solve(CLOCK, MicroSeconds(0), &TABLE),
            Err(Error::UnrepresentablePeriod { period_us: 0 })
        );
    }

    #[test]
    fn single_tick_period_gives_top_zero() {
        // 1 MHz clock, 1 us is one tick
        let solution = solve(Hertz(1_000_000), MicroSeconds(1), &TABLE).unwrap();
        assert_eq!(solution, Solution { divider: 1, top: 0 });
    }

    #[test]
    fn fractional_megahertz_clock_keeps_precision() {
        // 14.7456 MHz: 294_912 ticks in 20 ms
        let solution = solve(Hertz(14_745_600), MicroSeconds(20_000), &TABLE).unwrap();
        assert_eq!(
            solution,
            Solution {
                divider: 8,
                top: 36_863
            }
        );
    }

    #[test]
    fn solution_reports_realized_period() {
        let solution = Solution {
            divider: 8,
            top: 39_999,
        };
        assert_eq!(solution.period(CLOCK), MicroSeconds(20_000));
        assert_eq!(solution.period(Hertz(0)), MicroSeconds(0));
    }

    #[test]
    fn configuration_starts_unconfigured() {
        let config = TimerConfiguration::new(10);
        assert_eq!(config.top(), 0);
        assert_eq!(config.divider(), None);
        assert_eq!(config.resolution(), 1023);
        assert!(!config.is_configured());
        assert_eq!(config.solution(), None);
    }

    #[test]
    fn apply_then_negotiate() {
        let mut config = TimerConfiguration::new(10);
        config.apply(Solution {
            divider: 64,
            top: 4999,
        });
        assert_eq!(config.set_resolution(16), 12);
        assert_eq!(config.resolution(), 4095);
        assert_eq!(config.compare_value(4095), Ok(4999));
        assert_eq!(config.compare_value(0), Ok(0));
    }
}
