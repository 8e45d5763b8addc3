/*!
  # Pulse width modulation

  A 16-bit timer drives two outputs, channel A and channel B, which share a
  period but have independent duty cycles.

  ## Choosing the period

  [`Pwm::initialize`] searches the port's divider table for the smallest divider
  that still fits the period into the 16-bit counter and programs the timer with
  it. The counter top it settles on decides how fine the duty cycle can be.

  ```
    use timer16_pwm::prelude::*;
    use timer16_pwm::pwm::Pwm;
    use timer16_pwm::sim::SimulatedPort;

    let mut pwm = Pwm::new(SimulatedPort::new(), 16.mhz());
    pwm.initialize(2_000.us()).unwrap();

    assert_eq!(pwm.divider(), Some(1));
    assert_eq!(pwm.top(), 31_999);
  ```

  ## Setting duty cycles

  [`Pwm::write`] takes a duty cycle in units of the current resolution, which
  defaults to 10 bits and is renegotiated with [`Pwm::set_resolution`].
  [`Pwm::write_fraction`] takes a fraction of the period instead and
  [`Pwm::channel`] hands out an [`embedded_hal::PwmPin`] working on raw compare
  values.

  ```
    # use timer16_pwm::prelude::*;
    # use timer16_pwm::pwm::Pwm;
    # use timer16_pwm::sim::SimulatedPort;
    use timer16_pwm::port::Channel;

    let mut pwm = Pwm::new(SimulatedPort::new(), 16.mhz());
    pwm.initialize(2_000.us()).unwrap();

    // Half of 1023
    pwm.write(Channel::A, 512).unwrap();
    // A quarter of the period
    pwm.write_fraction(Channel::B, 0.25);

    let mut b = pwm.channel(Channel::B);
    assert_eq!(b.get_duty(), 7_999);
    b.set_duty(b.get_max_duty());
  ```
*/

use embedded_hal::PwmPin;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::port::{Channel, HardwarePort, Mode};
use crate::time::{Hertz, MicroSeconds};
use crate::timer::{self, Solution, TimerConfiguration};

/// Two-channel PWM driver over a [`HardwarePort`]
#[derive(Debug)]
pub struct Pwm<P> {
    port: P,
    clock: Hertz,
    timer: TimerConfiguration,
}

impl<P> Pwm<P>
where
    P: HardwarePort,
{
    /// Creates an unconfigured driver.
    ///
    /// Nothing is written to the port until [`initialize`](Self::initialize).
    pub fn new(port: P, config: impl Into<Config>) -> Self {
        let config = config.into();
        Pwm {
            port,
            clock: config.clock,
            timer: TimerConfiguration::new(config.resolution_bits),
        }
    }

    /// Configure the timer for `period`.
    ///
    /// Picks the smallest divider of [`P::DIVIDERS`](HardwarePort::DIVIDERS)
    /// representing the period, then resets the counter, selects
    /// [`Mode::FastPwm`], writes the top and the divider and configures both
    /// output pins, all with interrupts masked.
    ///
    /// If no divider fits, nothing is written and the previous configuration
    /// stays in effect.
    pub fn initialize(&mut self, period: impl Into<MicroSeconds>) -> Result<Solution> {
        let period = period.into();
        let solution = match timer::solve(self.clock, period, &P::DIVIDERS) {
            Ok(solution) => solution,
            Err(error) => {
                warn!("no divider represents {=u32} us", period.0);
                return Err(error);
            }
        };

        self.port.interrupt_free(|port| {
            port.reset_counter();
            port.set_mode(Mode::FastPwm);
            port.set_boundary(solution.top);
            port.set_clock_select(solution.divider);
            port.configure_outputs();
        });
        self.timer.apply(solution);

        debug!(
            "{=u32} us: divider {=u16}, top {=u16}",
            period.0,
            solution.divider,
            solution.top
        );
        Ok(solution)
    }

    /// Set the duty cycle bit width, limited to 16 bits and to what the current
    /// top can represent.
    ///
    /// Returns the width in effect. Before [`initialize`](Self::initialize) the
    /// top is 0 and so is the returned width.
    pub fn set_resolution(&mut self, bits: u8) -> u8 {
        let actual = self.timer.set_resolution(bits);
        if actual < bits {
            debug!("resolution {=u8} bits reduced to {=u8}", bits, actual);
        }
        actual
    }

    /// Largest duty cycle accepted by [`write`](Self::write)
    pub fn resolution(&self) -> u16 {
        self.timer.resolution()
    }

    /// Width of [`resolution`](Self::resolution) in bits
    pub fn resolution_bits(&self) -> u8 {
        (u16::BITS - self.timer.resolution().leading_zeros()) as u8
    }

    /// The counter top, 0 while unconfigured
    pub fn top(&self) -> u16 {
        self.timer.top()
    }

    /// The divider in effect, `None` while unconfigured
    pub fn divider(&self) -> Option<u16> {
        self.timer.divider()
    }

    /// The period the timer actually produces
    pub fn period(&self) -> Option<MicroSeconds> {
        self.timer
            .solution()
            .map(|solution| solution.period(self.clock))
    }

    /// The negotiated timer state
    pub fn configuration(&self) -> &TimerConfiguration {
        &self.timer
    }

    /// Set the duty cycle of `channel` in units of the current resolution.
    ///
    /// Values above [`resolution`](Self::resolution) are clamped. Returns the
    /// compare value written.
    pub fn write(&mut self, channel: Channel, duty: u16) -> Result<u16> {
        let value = match self.timer.compare_value(duty) {
            Ok(value) => value,
            Err(error) => {
                warn!("duty cycle dropped on {}: zero resolution", channel);
                return Err(error);
            }
        };
        self.port.set_compare(channel, value);
        trace!("{} duty {=u16} -> compare {=u16}", channel, duty, value);
        Ok(value)
    }

    /// Like [`write`](Self::write), addressing the channel by its pin number.
    ///
    /// A pin without a channel is reported as [`Error::UnknownChannel`] and
    /// nothing is written.
    pub fn write_pin(&mut self, pin: u8, duty: u16) -> Result<u16> {
        let channel = Channel::from_pin(pin).map_err(|error: Error| {
            warn!("pin {=u8} has no PWM channel", pin);
            error
        })?;
        self.write(channel, duty)
    }

    /// Set the duty cycle of `channel` as a fraction of the period.
    ///
    /// The compare value is `fraction * top`, without clamping to the period or
    /// looking at the resolution. Fractions above 1.0 keep the output high for
    /// the whole period. The conversion saturates at the compare register range,
    /// negative fractions and NaN write 0. Returns the compare value written.
    pub fn write_fraction(&mut self, channel: Channel, fraction: f32) -> u16 {
        let value = (fraction * f32::from(self.timer.top())) as u16;
        self.port.set_compare(channel, value);
        value
    }

    /// Compare value currently programmed for `channel`
    pub fn duty(&self, channel: Channel) -> u16 {
        self.port.compare(channel)
    }

    /// Connect `channel` to its output pin.
    pub fn enable(&mut self, channel: Channel) {
        self.port.set_output_enabled(channel, true);
    }

    /// Disconnect `channel` from its output pin.
    pub fn disable(&mut self, channel: Channel) {
        self.port.set_output_enabled(channel, false);
    }

    /// Borrow one channel as an [`embedded_hal::PwmPin`].
    pub fn channel(&mut self, channel: Channel) -> PwmChannel<'_, P> {
        PwmChannel { pwm: self, channel }
    }

    /// Shared access to the port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Releases the port
    pub fn free(self) -> P {
        self.port
    }
}

/// A single channel of a [`Pwm`], working on raw compare values.
///
/// The maximum duty is the counter top, independent of the resolution set on
/// the driver.
#[derive(Debug)]
pub struct PwmChannel<'a, P> {
    pwm: &'a mut Pwm<P>,
    channel: Channel,
}

impl<P> PwmChannel<'_, P> {
    /// The channel this handle drives
    pub fn id(&self) -> Channel {
        self.channel
    }
}

impl<P> PwmPin for PwmChannel<'_, P>
where
    P: HardwarePort,
{
    type Duty = u16;

    fn disable(&mut self) {
        self.pwm.disable(self.channel);
    }

    fn enable(&mut self) {
        self.pwm.enable(self.channel);
    }

    fn get_duty(&self) -> Self::Duty {
        self.pwm.duty(self.channel)
    }

    fn get_max_duty(&self) -> Self::Duty {
        self.pwm.top()
    }

    fn set_duty(&mut self, duty: Self::Duty) {
        self.pwm.port.set_compare(self.channel, duty);
    }
}
